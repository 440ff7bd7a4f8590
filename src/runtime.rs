//! Runtime for the companion chat
//!
//! One chat screen is live at a time. Mounting it creates a fresh session
//! seeded with the greeting; unmounting discards the transcript.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ChatSession;
pub use traits::*;

use crate::locale::{ChatStrings, Language, LanguageSelector, TextDirection};
use crate::state_machine::ExchangeStatus;
use crate::transcript::Message;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Change notifications pushed to subscribers of a session
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Message { message: Message },
    StatusChange { status: ExchangeStatus },
    InputChange { text: String },
}

impl SessionEvent {
    /// SSE event name
    pub fn event_name(&self) -> &'static str {
        match self {
            SessionEvent::Message { .. } => "message",
            SessionEvent::StatusChange { .. } => "status",
            SessionEvent::InputChange { .. } => "input",
        }
    }
}

/// Everything the chat screen renders
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub language: Language,
    pub direction: TextDirection,
    pub messages: Vec<Message>,
    /// Id of the newest message in `messages`. Subscribers that attach
    /// before taking the snapshot drop `message` events at or below it.
    pub last_message_id: Option<u64>,
    pub status: ExchangeStatus,
    pub input: String,
    pub show_suggestions: bool,
    pub strings: &'static ChatStrings,
}

/// Owns the live chat session and the process-wide language
pub struct SessionManager {
    generator: Arc<dyn ResponseGenerator>,
    language: LanguageSelector,
    current: RwLock<Option<Arc<ChatSession>>>,
}

impl SessionManager {
    pub fn new(generator: Arc<dyn ResponseGenerator>, language: LanguageSelector) -> Self {
        Self {
            generator,
            language,
            current: RwLock::new(None),
        }
    }

    pub fn language(&self) -> Language {
        self.language.current()
    }

    /// Switch the active language. A mounted session that has not been
    /// seeded yet picks up the new greeting; existing messages are untouched.
    pub async fn set_language(&self, language: Language) {
        let previous = self.language.set(language);
        if previous != language {
            tracing::info!(from = %previous, to = %language, "Language changed");
        }
        if let Some(session) = self.current().await {
            session.initialize(language).await;
        }
    }

    /// Open the chat screen with a fresh, seeded session
    pub async fn mount(&self) -> Arc<ChatSession> {
        let id = uuid::Uuid::new_v4().to_string();
        let language = self.language();
        let session = Arc::new(ChatSession::new(id, self.generator.clone()));
        session.initialize(language).await;

        let replaced = self.current.write().await.replace(session.clone());
        if let Some(old) = replaced {
            tracing::info!(session_id = %old.id(), "Discarding previous session");
        }
        tracing::info!(session_id = %session.id(), %language, "Session mounted");
        session
    }

    /// Close the chat screen. Returns whether a session was mounted.
    ///
    /// An in-flight exchange keeps its own handle and completes into the
    /// discarded session, never into a later one.
    pub async fn unmount(&self) -> bool {
        match self.current.write().await.take() {
            Some(session) => {
                tracing::info!(session_id = %session.id(), "Session unmounted");
                true
            }
            None => false,
        }
    }

    pub async fn current(&self) -> Option<Arc<ChatSession>> {
        self.current.read().await.clone()
    }
}
