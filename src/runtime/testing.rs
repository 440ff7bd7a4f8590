//! Mock implementations for testing
//!
//! These mocks let the session and gateway be exercised without network I/O.

use super::traits::*;
use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService};
use crate::locale::Language;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

// ============================================================================
// Mock LLM Service
// ============================================================================

/// Mock LLM service that returns queued responses
pub struct MockLlmService {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Mock Response Generator
// ============================================================================

/// Generator that replies from a queue and records what it was asked
#[derive(Default)]
pub struct MockGenerator {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, Language)>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(reply.into());
    }

    pub fn recorded_calls(&self) -> Vec<(String, Language)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseGenerator for MockGenerator {
    async fn generate(&self, utterance: &str, language: Language) -> String {
        self.calls
            .lock()
            .unwrap()
            .push((utterance.to_string(), language));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("echo: {utterance}"))
    }
}

// ============================================================================
// Gated Response Generator (for pending-state testing)
// ============================================================================

/// Generator that blocks until the test releases it
pub struct GatedGenerator {
    /// Notified when a call starts waiting on the gate
    pub started: Notify,
    gate: Notify,
    reply: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl GatedGenerator {
    pub fn new() -> Self {
        Self {
            started: Notify::new(),
            gate: Notify::new(),
            reply: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Let one waiting call finish with `reply`
    pub fn release(&self, reply: impl Into<String>) {
        *self.reply.lock().unwrap() = Some(reply.into());
        self.gate.notify_one();
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for GatedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseGenerator for GatedGenerator {
    async fn generate(&self, _utterance: &str, _language: Language) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.gate.notified().await;
        self.reply.lock().unwrap().take().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_llm_service_drains_queue_in_order() {
        let mock = MockLlmService::new("mock");
        mock.queue_response(LlmResponse::from_text("first"));
        mock.queue_error(LlmError::rate_limit("slow down"));

        let request = LlmRequest::single_turn("system", "hi");
        let first = mock.complete(&request).await.unwrap();
        assert_eq!(first.text().as_deref(), Some("first"));
        assert!(mock.complete(&request).await.is_err());
        // Exhausted queue behaves like a network failure
        assert!(mock.complete(&request).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_generator_falls_back_to_echo() {
        let generator = MockGenerator::new();
        generator.queue_reply("queued");
        assert_eq!(generator.generate("a", Language::En).await, "queued");
        assert_eq!(generator.generate("b", Language::Ar).await, "echo: b");
        assert_eq!(generator.recorded_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_gated_generator_waits_for_release() {
        let generator = std::sync::Arc::new(GatedGenerator::new());
        let task = {
            let generator = generator.clone();
            tokio::spawn(async move { generator.generate("x", Language::En).await })
        };
        generator.started.notified().await;
        assert!(!task.is_finished());

        generator.release("done");
        assert_eq!(task.await.unwrap(), "done");
        assert_eq!(generator.call_count(), 1);
    }
}
