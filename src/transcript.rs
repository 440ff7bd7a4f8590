//! Chat transcript types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One immutable turn of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered, append-only list of messages
///
/// Ids are sequence numbers, so they are unique and increase in insertion
/// order. Timestamps never decrease even if the wall clock steps backwards.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current time
    pub fn push(&mut self, role: Role, text: impl Into<String>) -> &Message {
        self.push_at(role, text, Utc::now())
    }

    pub fn push_at(&mut self, role: Role, text: impl Into<String>, now: DateTime<Utc>) -> &Message {
        let timestamp = self.messages.last().map_or(now, |last| last.timestamp.max(now));
        let id = self.messages.len() as u64;
        self.messages.push(Message {
            id,
            role,
            text: text.into(),
            timestamp,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}
