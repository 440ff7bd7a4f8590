//! Common types for LLM interactions

/// LLM request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: Vec<SystemContent>,
    pub messages: Vec<LlmMessage>,
}

impl LlmRequest {
    /// A stateless request: one system instruction and one user prompt
    pub fn single_turn(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: vec![SystemContent::new(system)],
            messages: vec![LlmMessage::user(prompt)],
        }
    }

    /// All system text joined for providers that take a single instruction
    pub fn system_text(&self) -> Option<String> {
        if self.system.is_empty() {
            return None;
        }
        Some(
            self.system
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        )
    }
}

/// System prompt content
#[derive(Debug, Clone)]
pub struct SystemContent {
    pub text: String,
}

impl SystemContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A user turn; requests never carry assistant history
#[derive(Debug, Clone)]
pub struct LlmMessage {
    pub text: String,
}

impl LlmMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// LLM response
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Text parts in the order the provider returned them
    pub parts: Vec<String>,
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

impl LlmResponse {
    #[cfg(test)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![text.into()],
            finish_reason: Some("STOP".to_string()),
            usage: Usage::default(),
        }
    }

    /// Concatenated text, or `None` when the model produced nothing usable
    pub fn text(&self) -> Option<String> {
        let text = self.parts.concat();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Usage statistics
#[derive(Debug, Clone, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
