//! Trait abstractions for runtime I/O
//!
//! The chat session depends on the response gateway only through
//! [`ResponseGenerator`], so tests can swap in mocks.

use crate::locale::Language;
use async_trait::async_trait;
use std::sync::Arc;

/// Produces an assistant reply for a user utterance
///
/// Implementations must always resolve with text; failures are mapped to
/// fallback replies before they reach the session.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, utterance: &str, language: Language) -> String;
}

#[async_trait]
impl<T: ResponseGenerator + ?Sized> ResponseGenerator for Arc<T> {
    async fn generate(&self, utterance: &str, language: Language) -> String {
        (**self).generate(utterance, language).await
    }
}
