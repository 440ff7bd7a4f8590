//! Centralized model definitions

use super::gemini::{GeminiModel, GeminiService};
use super::LlmService;
use std::sync::Arc;
use std::time::Duration;

/// Model definition with metadata
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// Model ID as accepted in configuration (e.g., "gemini-2.5-flash")
    pub id: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create the service
    pub factory: fn(&str, Option<&str>, Duration) -> Result<Arc<dyn LlmService>, String>,
}

fn gemini_factory(
    model: GeminiModel,
    api_key: &str,
    gateway: Option<&str>,
    timeout: Duration,
) -> Result<Arc<dyn LlmService>, String> {
    // Accept any non-empty key (including "implicit" for gateway mode)
    if api_key.is_empty() {
        return Err(format!(
            "{} requires GEMINI_API_KEY or gateway",
            model.api_name()
        ));
    }
    GeminiService::new(api_key.to_string(), model, gateway, timeout)
        .map(|service| Arc::new(service) as Arc<dyn LlmService>)
        .map_err(|e| e.to_string())
}

/// Get all available model definitions; the first one is the default
pub fn all_models() -> &'static [ModelDef] {
    &[
        ModelDef {
            id: "gemini-2.5-flash",
            description: "Gemini 2.5 Flash (fast, default)",
            factory: |api_key, gateway, timeout| {
                gemini_factory(GeminiModel::Gemini25Flash, api_key, gateway, timeout)
            },
        },
        ModelDef {
            id: "gemini-2.5-pro",
            description: "Gemini 2.5 Pro (most capable, slower)",
            factory: |api_key, gateway, timeout| {
                gemini_factory(GeminiModel::Gemini25Pro, api_key, gateway, timeout)
            },
        },
        ModelDef {
            id: "gemini-2.0-flash",
            description: "Gemini 2.0 Flash (legacy)",
            factory: |api_key, gateway, timeout| {
                gemini_factory(GeminiModel::Gemini20Flash, api_key, gateway, timeout)
            },
        },
    ]
}
