//! Mindro companion - chat backend for the Mindro-V1 assistant
//!
//! Serves a single bilingual chat screen whose replies come from a hosted
//! Gemini model, with every model failure turned into a friendly fallback.

mod api;
mod gateway;
mod llm;
mod locale;
mod runtime;
mod state_machine;
mod system_prompt;
mod transcript;

use api::{create_router, AppState};
use gateway::ResponseGateway;
use llm::{LlmConfig, ModelRegistry};
use locale::{Language, LanguageSelector};
use runtime::SessionManager;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 8000;

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq)]
struct ServerConfig {
    port: u16,
    language: Language,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("MINDRO_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let language = match lookup("MINDRO_LANGUAGE") {
            Some(code) => code.parse::<Language>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to English");
                Language::En
            }),
            None => Language::default(),
        };

        Self { port, language }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindro_companion=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ServerConfig::from_env();

    // Initialize LLM registry
    let llm_config = LlmConfig::from_env();
    let llm_registry = ModelRegistry::new(&llm_config);
    let gateway = ResponseGateway::from_registry(&llm_registry);

    if gateway.is_configured() {
        tracing::info!(
            models = ?llm_registry.available_models(),
            default = %llm_registry.default_model_id(),
            "LLM registry initialized"
        );
    } else {
        tracing::warn!(
            "No Gemini credential configured. Set GEMINI_API_KEY or LLM_GATEWAY; replies will be fallbacks."
        );
    }

    // Create application state
    let sessions = SessionManager::new(Arc::new(gateway), LanguageSelector::new(config.language));
    let state = AppState::new(sessions);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(language = %config.language, "Mindro companion listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
