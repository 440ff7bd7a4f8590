//! Pure state transition function
//!
//! Given the same state and event this always produces the same result,
//! with no I/O. The session executes the returned effects.

use super::{Effect, Event, ExchangeStatus, SessionState};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons an event is refused
///
/// The first three mirror a disabled send control: the session swallows
/// them silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Utterance is empty")]
    EmptyUtterance,
    #[error("An exchange is already pending")]
    ExchangePending,
    #[error("Session has no greeting yet")]
    NotSeeded,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(state: SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Seed the greeting exactly once
        (SessionState::Unseeded, Event::Initialize { greeting }) => {
            Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::append_assistant(greeting)))
        }
        (SessionState::Idle | SessionState::Pending, Event::Initialize { .. }) => {
            Ok(TransitionResult::new(state))
        }

        // Idle + UserMessage -> Pending
        (SessionState::Idle, Event::UserMessage { text, language }) => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyUtterance);
            }
            Ok(TransitionResult::new(SessionState::Pending)
                .with_effect(Effect::append_user(text.clone()))
                .with_effect(Effect::clear_input())
                .with_effect(Effect::NotifyStatus {
                    status: ExchangeStatus::Pending,
                })
                .with_effect(Effect::RequestResponse {
                    utterance: text,
                    language,
                }))
        }
        (SessionState::Pending, Event::UserMessage { .. }) => Err(TransitionError::ExchangePending),
        (SessionState::Unseeded, Event::UserMessage { .. }) => Err(TransitionError::NotSeeded),

        // Pending + AssistantReply -> Idle
        (SessionState::Pending, Event::AssistantReply { text }) => {
            Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::append_assistant(text))
                .with_effect(Effect::NotifyStatus {
                    status: ExchangeStatus::Idle,
                }))
        }

        // Suggestions only touch the input box
        (_, Event::Suggest { text }) => {
            Ok(TransitionResult::new(state).with_effect(Effect::SetInput { text }))
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}
