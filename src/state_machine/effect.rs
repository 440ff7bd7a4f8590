//! Effects produced by state transitions

use super::state::ExchangeStatus;
use crate::locale::Language;
use crate::transcript::Role;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage { role: Role, text: String },

    /// Replace the pending (unsent) input text
    SetInput { text: String },

    /// Ask the response gateway for a reply
    RequestResponse { utterance: String, language: Language },

    /// Tell subscribers the exchange status changed
    NotifyStatus { status: ExchangeStatus },
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn append_assistant(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn clear_input() -> Self {
        Effect::SetInput {
            text: String::new(),
        }
    }
}
