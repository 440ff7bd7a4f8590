//! Chat session executor
//!
//! Owns the transcript, the exchange state and the unsent input for one
//! mounted chat screen. Events go through the pure transition function;
//! this type executes the resulting effects and notifies subscribers.

use super::traits::ResponseGenerator;
use super::{SessionEvent, SessionSnapshot};
use crate::locale::Language;
use crate::state_machine::{transition, Effect, Event, SessionState, TransitionError};
use crate::transcript::Transcript;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Suggestion chips are offered until the conversation gets going
const SUGGESTION_THRESHOLD: usize = 3;

const BROADCAST_CAPACITY: usize = 64;

struct SessionInner {
    state: SessionState,
    transcript: Transcript,
    input: String,
}

/// An accepted exchange waiting for its reply
#[derive(Debug)]
#[must_use = "an accepted exchange stays pending until completed"]
pub struct PendingExchange {
    utterance: String,
    language: Language,
}

impl PendingExchange {
    pub fn utterance(&self) -> &str {
        &self.utterance
    }
}

/// Conversation store for one chat screen
pub struct ChatSession {
    id: String,
    inner: Mutex<SessionInner>,
    generator: Arc<dyn ResponseGenerator>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
}

impl ChatSession {
    pub fn new(id: impl Into<String>, generator: Arc<dyn ResponseGenerator>) -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            id: id.into(),
            inner: Mutex::new(SessionInner {
                state: SessionState::default(),
                transcript: Transcript::new(),
                input: String::new(),
            }),
            generator,
            broadcast_tx,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Receive every transcript append, status change and input change
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Seed the greeting for `language` if the transcript is still empty
    pub async fn initialize(&self, language: Language) {
        let greeting = language.chat_strings().welcome.to_string();
        let mut inner = self.inner.lock().await;
        if let Err(e) = self.apply(&mut inner, Event::Initialize { greeting }) {
            tracing::warn!(session_id = %self.id, error = %e, "Initialize rejected");
        }
    }

    /// Prefill the input box; never touches the transcript or status
    pub async fn suggest(&self, text: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        if let Err(e) = self.apply(&mut inner, Event::Suggest { text: text.into() }) {
            tracing::warn!(session_id = %self.id, error = %e, "Suggestion rejected");
        }
    }

    /// Run one full exchange. Returns `false` when the send was a no-op
    /// (blank utterance or an exchange already pending).
    pub async fn send(&self, utterance: &str, language: Language) -> bool {
        match self.begin(utterance, language).await {
            Some(exchange) => {
                self.complete(exchange).await;
                true
            }
            None => false,
        }
    }

    /// First half of [`send`](Self::send): append the user message and mark
    /// the exchange pending. The caller must pass the ticket to
    /// [`complete`](Self::complete).
    pub async fn begin(&self, utterance: &str, language: Language) -> Option<PendingExchange> {
        let mut inner = self.inner.lock().await;
        let event = Event::UserMessage {
            text: utterance.to_string(),
            language,
        };
        match self.apply(&mut inner, event) {
            Ok(exchange) => exchange,
            Err(e) => {
                tracing::debug!(session_id = %self.id, reason = %e, "Send ignored");
                None
            }
        }
    }

    /// Second half of [`send`](Self::send): wait for the reply outside the
    /// lock, then append it and return to idle
    pub async fn complete(&self, exchange: PendingExchange) {
        tracing::debug!(
            session_id = %self.id,
            language = %exchange.language,
            chars = exchange.utterance().chars().count(),
            "Requesting reply"
        );
        let reply = self
            .generator
            .generate(&exchange.utterance, exchange.language)
            .await;

        let mut inner = self.inner.lock().await;
        if let Err(e) = self.apply(&mut inner, Event::AssistantReply { text: reply }) {
            tracing::warn!(session_id = %self.id, error = %e, "Reply dropped");
        }
    }

    #[cfg(test)]
    pub async fn status(&self) -> crate::state_machine::ExchangeStatus {
        self.inner.lock().await.state.status()
    }

    pub async fn input(&self) -> String {
        self.inner.lock().await.input.clone()
    }

    pub async fn snapshot(&self, language: Language) -> SessionSnapshot {
        let inner = self.inner.lock().await;
        let messages = inner.transcript.messages();
        SessionSnapshot {
            session_id: self.id.clone(),
            language,
            direction: language.direction(),
            messages: messages.to_vec(),
            last_message_id: messages.last().map(|m| m.id),
            status: inner.state.status(),
            input: inner.input.clone(),
            show_suggestions: messages.len() < SUGGESTION_THRESHOLD,
            strings: language.chat_strings(),
        }
    }

    fn apply(
        &self,
        inner: &mut SessionInner,
        event: Event,
    ) -> Result<Option<PendingExchange>, TransitionError> {
        let result = transition(inner.state, event)?;
        inner.state = result.new_state;

        let mut exchange = None;
        for effect in result.effects {
            match effect {
                Effect::AppendMessage { role, text } => {
                    let message = inner.transcript.push(role, text).clone();
                    tracing::debug!(
                        session_id = %self.id,
                        message_id = message.id,
                        role = ?message.role,
                        "Message appended"
                    );
                    self.notify(SessionEvent::Message { message });
                }
                Effect::SetInput { text } => {
                    inner.input.clone_from(&text);
                    self.notify(SessionEvent::InputChange { text });
                }
                Effect::NotifyStatus { status } => {
                    self.notify(SessionEvent::StatusChange { status });
                }
                Effect::RequestResponse {
                    utterance,
                    language,
                } => {
                    exchange = Some(PendingExchange {
                        utterance,
                        language,
                    });
                }
            }
        }
        Ok(exchange)
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.broadcast_tx.send(event);
    }
}
