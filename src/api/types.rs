//! API request and response types

use crate::locale::{Language, TextDirection};
use serde::{Deserialize, Serialize};

/// Request to change the active language
#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    /// Parsed by hand so an unknown code is a 400, not a 422
    pub language: String,
}

/// Current language and its reading direction
#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub language: Language,
    pub direction: TextDirection,
}

impl From<Language> for LanguageResponse {
    fn from(language: Language) -> Self {
        Self {
            language,
            direction: language.direction(),
        }
    }
}

/// Request to send a chat message; no text sends the current input
#[derive(Debug, Default, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// Hold the response until the reply is in the transcript
    #[serde(default)]
    pub wait: bool,
}

/// Response for send action
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub accepted: bool,
}

/// Request to prefill the input with a suggestion
#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub text: String,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
