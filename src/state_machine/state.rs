//! Session state types

use serde::{Deserialize, Serialize};

/// State of a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// Screen mounted, greeting not yet seeded
    #[default]
    Unseeded,

    /// Greeting present, ready for user input
    Idle,

    /// One exchange in flight, waiting for the response gateway
    Pending,
}

impl SessionState {
    /// Status as shown to the presentation layer
    pub fn status(self) -> ExchangeStatus {
        match self {
            SessionState::Unseeded | SessionState::Idle => ExchangeStatus::Idle,
            SessionState::Pending => ExchangeStatus::Pending,
        }
    }
}

/// UI-visible exchange status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStatus {
    Idle,
    Pending,
}
