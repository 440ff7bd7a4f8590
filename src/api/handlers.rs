//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ErrorResponse, LanguageRequest, LanguageResponse, SendRequest, SendResponse, SuccessResponse,
    SuggestRequest,
};
use super::AppState;
use crate::locale::Language;
use crate::runtime::{ChatSession, SessionSnapshot};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Process-wide language
        .route("/api/language", get(get_language).put(set_language))
        // Chat screen lifecycle
        .route("/api/chat/mount", post(mount_chat))
        .route("/api/chat", get(get_chat).delete(unmount_chat))
        // User actions
        .route("/api/chat/send", post(send_message))
        .route("/api/chat/suggest", post(suggest))
        // SSE streaming
        .route("/api/chat/stream", get(stream_chat))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Language
// ============================================================

async fn get_language(State(state): State<AppState>) -> Json<LanguageResponse> {
    Json(state.sessions.language().into())
}

async fn set_language(
    State(state): State<AppState>,
    Json(req): Json<LanguageRequest>,
) -> Result<Json<LanguageResponse>, AppError> {
    let language: Language = req
        .language
        .parse()
        .map_err(|e: crate::locale::LocaleError| AppError::BadRequest(e.to_string()))?;

    state.sessions.set_language(language).await;
    Ok(Json(language.into()))
}

// ============================================================
// Chat lifecycle
// ============================================================

async fn mount_chat(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let session = state.sessions.mount().await;
    Json(session.snapshot(state.sessions.language()).await)
}

async fn unmount_chat(State(state): State<AppState>) -> Json<SuccessResponse> {
    Json(SuccessResponse {
        success: state.sessions.unmount().await,
    })
}

async fn get_chat(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, AppError> {
    let session = mounted(&state).await?;
    Ok(Json(session.snapshot(state.sessions.language()).await))
}

// ============================================================
// User actions
// ============================================================

/// Accepts the message and returns immediately; the reply arrives over SSE.
/// With `wait` the response is held until the reply has been appended.
async fn send_message(
    State(state): State<AppState>,
    payload: Option<Json<SendRequest>>,
) -> Result<Json<SendResponse>, AppError> {
    let session = mounted(&state).await?;
    let req = payload.map(|Json(req)| req).unwrap_or_default();
    let text = match req.text {
        Some(text) => text,
        None => session.input().await,
    };
    let language = state.sessions.language();

    if req.wait {
        let accepted = session.send(&text, language).await;
        return Ok(Json(SendResponse { accepted }));
    }

    let Some(exchange) = session.begin(&text, language).await else {
        return Ok(Json(SendResponse { accepted: false }));
    };

    tokio::spawn(async move {
        session.complete(exchange).await;
    });

    Ok(Json(SendResponse { accepted: true }))
}

async fn suggest(
    State(state): State<AppState>,
    Json(req): Json<SuggestRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let session = mounted(&state).await?;
    session.suggest(req.text).await;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// SSE streaming
// ============================================================

async fn stream_chat(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let session = mounted(&state).await?;

    // Subscribe before taking the snapshot so no change is lost. Changes
    // in between arrive twice; clients skip messages with ids at or below
    // the snapshot's `last_message_id`.
    let broadcast_rx = session.subscribe();
    let init = session.snapshot(state.sessions.language()).await;

    Ok(sse_stream(init, broadcast_rx))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("mindro-companion ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

async fn mounted(state: &AppState) -> Result<Arc<ChatSession>, AppError> {
    state
        .sessions
        .current()
        .await
        .ok_or_else(|| AppError::NotFound("Chat screen is not mounted".to_string()))
}

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
