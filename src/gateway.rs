//! Response gateway
//!
//! Turns a user utterance into an assistant utterance by calling the hosted
//! model. Every failure is absorbed here and replaced by a fixed, localized
//! fallback, so callers always get text back.

use crate::llm::{LlmError, LlmRequest, LlmService, ModelRegistry};
use crate::locale::Language;
use crate::runtime::ResponseGenerator;
use crate::system_prompt::system_instruction;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failures absorbed by the gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no API credential configured")]
    ConfigurationMissing,
    #[error("model returned no usable text")]
    EmptyResponse,
    #[error("transport failure: {0}")]
    TransportFailure(#[from] LlmError),
}

impl GatewayError {
    /// User-facing replacement text, rendered as an ordinary assistant message
    pub fn fallback_text(&self, language: Language) -> &'static str {
        match (self, language) {
            (GatewayError::ConfigurationMissing, Language::En) => {
                "API Key is missing. Please check configuration."
            }
            (GatewayError::ConfigurationMissing, Language::Ar) => {
                "مفتاح API مفقود. يرجى التحقق من الإعدادات."
            }
            (GatewayError::EmptyResponse, Language::En) => "I'm having trouble thinking right now.",
            (GatewayError::EmptyResponse, Language::Ar) => "أواجه مشكلة في التفكير الآن.",
            (GatewayError::TransportFailure(_), Language::En) => {
                "I am currently offline. Please check your connection."
            }
            (GatewayError::TransportFailure(_), Language::Ar) => {
                "أنا غير متصل حاليًا. يرجى التحقق من اتصالك."
            }
        }
    }
}

/// Stateless, single-turn gateway to the hosted model
///
/// No prior transcript is sent: each call stands alone from the model's
/// point of view even though the user sees a running conversation.
#[derive(Clone)]
pub struct ResponseGateway {
    service: Option<Arc<dyn LlmService>>,
}

impl ResponseGateway {
    /// `None` means no credential is configured
    pub fn new(service: Option<Arc<dyn LlmService>>) -> Self {
        Self { service }
    }

    pub fn from_registry(registry: &ModelRegistry) -> Self {
        Self::new(registry.default())
    }

    pub fn is_configured(&self) -> bool {
        self.service.is_some()
    }

    async fn try_generate(&self, utterance: &str, language: Language) -> Result<String, GatewayError> {
        let service = self
            .service
            .as_ref()
            .ok_or(GatewayError::ConfigurationMissing)?;

        let request = LlmRequest::single_turn(system_instruction(language), utterance);
        let response = service.complete(&request).await?;

        response.text().ok_or(GatewayError::EmptyResponse)
    }
}

#[async_trait]
impl ResponseGenerator for ResponseGateway {
    async fn generate(&self, utterance: &str, language: Language) -> String {
        match self.try_generate(utterance, language).await {
            Ok(text) => text,
            Err(e) => {
                match &e {
                    GatewayError::ConfigurationMissing => {
                        tracing::warn!(%language, "No API credential configured, skipping request");
                    }
                    GatewayError::EmptyResponse => {
                        tracing::warn!(%language, "Model returned no text");
                    }
                    GatewayError::TransportFailure(err) => {
                        tracing::error!(
                            %language,
                            error = %err,
                            kind = ?err.kind,
                            transient = err.kind.is_transient(),
                            "Model request failed"
                        );
                    }
                }
                e.fallback_text(language).to_string()
            }
        }
    }
}
