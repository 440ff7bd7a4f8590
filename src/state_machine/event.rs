//! Events that can occur in a chat session

use crate::locale::Language;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// Screen (re)mounted or language changed; seeds the greeting once
    Initialize { greeting: String },

    /// User pressed send
    UserMessage { text: String, language: Language },

    /// Response gateway resolved for the in-flight exchange
    AssistantReply { text: String },

    /// Suggestion chip tapped
    Suggest { text: String },
}
