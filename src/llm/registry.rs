//! Model registry: builds the configured LLM service from the environment

use super::gemini::IMPLICIT_KEY;
use super::{all_models, LlmService, LoggingService};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the LLM provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub gemini_api_key: Option<String>,
    /// Proxy base URL that injects credentials (e.g., `http://169.254.169.254/gateway/llm`)
    pub gateway: Option<String>,
    /// Default model ID
    pub default_model: Option<String>,
    /// Transport timeout; the conversation core enforces none of its own
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gateway: None,
            default_model: None,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .or_else(|| std::env::var("API_KEY").ok()),
            gateway: std::env::var("LLM_GATEWAY").ok(),
            default_model: std::env::var("MINDRO_MODEL").ok(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Registry of available LLM models
pub struct ModelRegistry {
    services: HashMap<String, Arc<dyn LlmService>>,
    default_model: String,
}

impl ModelRegistry {
    pub fn new(config: &LlmConfig) -> Self {
        let mut services: HashMap<String, Arc<dyn LlmService>> = HashMap::new();

        // In gateway mode the gateway handles authentication
        let api_key = if config.gateway.is_some() {
            Some(IMPLICIT_KEY.to_string())
        } else {
            config
                .gemini_api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
        };

        if let Some(api_key) = api_key {
            for model_def in all_models() {
                match (model_def.factory)(&api_key, config.gateway.as_deref(), config.request_timeout) {
                    Ok(service) => {
                        tracing::debug!(
                            model = model_def.id,
                            description = model_def.description,
                            "Registered model"
                        );
                        services.insert(
                            model_def.id.to_string(),
                            Arc::new(LoggingService::new(service)),
                        );
                    }
                    Err(e) => {
                        tracing::warn!(model = model_def.id, error = %e, "Skipping model");
                    }
                }
            }
        }

        let default_model = config
            .default_model
            .clone()
            .filter(|id| {
                let known = services.contains_key(id);
                if !known {
                    tracing::warn!(model = %id, "Configured default model unavailable");
                }
                known
            })
            .unwrap_or_else(|| all_models()[0].id.to_string());

        Self {
            services,
            default_model,
        }
    }

    /// Get a model by ID
    pub fn get(&self, model_id: &str) -> Option<Arc<dyn LlmService>> {
        self.services.get(model_id).cloned()
    }

    /// Get the default model; `None` when no credential is configured
    pub fn default(&self) -> Option<Arc<dyn LlmService>> {
        self.get(&self.default_model)
    }

    pub fn default_model_id(&self) -> &str {
        &self.default_model
    }

    /// List all available model IDs
    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.services.keys().cloned().collect();
        models.sort();
        models
    }
}
