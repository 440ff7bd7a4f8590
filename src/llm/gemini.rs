//! Google Gemini provider implementation

use super::types::{LlmRequest, LlmResponse, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DIRECT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Key placeholder used when a gateway handles authentication
pub const IMPLICIT_KEY: &str = "implicit";

/// Gemini models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiModel {
    Gemini25Flash,
    Gemini25Pro,
    Gemini20Flash,
}

impl GeminiModel {
    pub fn api_name(self) -> &'static str {
        match self {
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
            GeminiModel::Gemini20Flash => "gemini-2.0-flash",
        }
    }
}

/// Gemini service implementation
pub struct GeminiService {
    client: Client,
    api_key: String,
    url: String,
    model_id: String,
}

impl GeminiService {
    pub fn new(
        api_key: String,
        model: GeminiModel,
        gateway: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let url = match gateway {
            Some(gw) => format!(
                "{}/gemini/v1beta/models/{}:generateContent",
                gw.trim_end_matches('/'),
                model.api_name()
            ),
            None => format!(
                "{DIRECT_BASE_URL}/models/{}:generateContent",
                model.api_name()
            ),
        };

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            url,
            model_id: model.api_name().to_string(),
        })
    }

    fn translate_request(request: &LlmRequest) -> GeminiRequest {
        let system_instruction = request.system_text().map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart { text: Some(text) }],
        });

        let contents = request
            .messages
            .iter()
            .filter(|msg| !msg.text.is_empty())
            .map(|msg| GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(msg.text.clone()),
                }],
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction,
        }
    }

    /// A response without candidates or text is still well-formed; the
    /// caller decides what an empty answer means.
    fn normalize_response(resp: GeminiResponse) -> LlmResponse {
        let candidate = resp.candidates.into_iter().next();

        let finish_reason = candidate.as_ref().and_then(|c| c.finish_reason.clone());
        let parts = candidate
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let usage = resp
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u64::from(u.prompt_token_count),
                output_tokens: u64::from(u.candidates_token_count),
            })
            .unwrap_or_default();

        LlmResponse {
            parts,
            finish_reason,
            usage,
        }
    }
}

#[async_trait]
impl LlmService for GeminiService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let gemini_request = Self::translate_request(request);

        let mut builder = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        // Gateway mode: the gateway injects credentials
        if self.api_key != IMPLICIT_KEY {
            builder = builder.header("x-goog-api-key", &self.api_key);
        }

        let response = builder
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map_or(body, |error_resp| error_resp.error.message);
            return Err(LlmError::from_status(status, &message));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::unknown(format!("Failed to parse response: {e}")))?;

        Ok(Self::normalize_response(gemini_response))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ResponseGateway;
    use crate::llm::LlmErrorKind;
    use crate::locale::Language;
    use crate::runtime::ResponseGenerator;
    use axum::http::{HeaderMap, StatusCode};
    use axum::Router;
    use serde_json::json;
    use std::sync::Arc;

    /// Serve `status` + `body` for every request on an ephemeral local port
    async fn fake_gemini(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().fallback(move || async move { (status, body) });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn client_for(base: &str) -> GeminiService {
        GeminiService::new(
            IMPLICIT_KEY.to_string(),
            GeminiModel::Gemini25Flash,
            Some(base),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    async fn complete_err(base: &str) -> LlmError {
        let request = LlmRequest::single_turn("Be calm.", "Where am I?");
        client_for(base).complete(&request).await.unwrap_err()
    }

    #[test]
    fn test_request_carries_system_instruction_and_prompt() {
        let request = LlmRequest::single_turn("Be reassuring.", "Where am I?");
        let wire = serde_json::to_value(GeminiService::translate_request(&request)).unwrap();

        assert_eq!(
            wire,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Where am I?" }] }],
                "systemInstruction": { "parts": [{ "text": "Be reassuring." }] }
            })
        );
    }

    #[test]
    fn test_normalize_text_response() {
        let resp: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "You are " }, { "text": "at home." }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 4, "totalTokenCount": 16 }
        }))
        .unwrap();

        let normalized = GeminiService::normalize_response(resp);
        assert_eq!(normalized.text().as_deref(), Some("You are at home."));
        assert_eq!(normalized.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(normalized.usage.input_tokens, 12);
        assert_eq!(normalized.usage.output_tokens, 4);
    }

    #[test]
    fn test_normalize_blocked_response_has_no_text() {
        // Safety-blocked candidates come back without content
        let resp: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert!(GeminiService::normalize_response(resp).text().is_none());

        let resp: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(GeminiService::normalize_response(resp).text().is_none());
    }

    #[test]
    fn test_urls() {
        let direct = GeminiService::new(
            "key".to_string(),
            GeminiModel::Gemini25Flash,
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            direct.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );

        let gateway = GeminiService::new(
            IMPLICIT_KEY.to_string(),
            GeminiModel::Gemini25Pro,
            Some("http://gw.local/llm/"),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            gateway.url,
            "http://gw.local/llm/gemini/v1beta/models/gemini-2.5-pro:generateContent"
        );
        assert_eq!(gateway.model_id(), "gemini-2.5-pro");
    }

    #[tokio::test]
    async fn test_complete_success_sends_api_key() {
        let app = Router::new().fallback(|headers: HeaderMap| async move {
            let key = headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            axum::Json(json!({
                "candidates": [{ "content": { "parts": [{ "text": key }] }, "finishReason": "STOP" }]
            }))
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let service = GeminiService::new(
            "secret".to_string(),
            GeminiModel::Gemini25Flash,
            Some(format!("http://{addr}").as_str()),
            Duration::from_secs(5),
        )
        .unwrap();
        let response = service
            .complete(&LlmRequest::single_turn("s", "p"))
            .await
            .unwrap();
        assert_eq!(response.text().as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_complete_malformed_body_is_unknown() {
        let base = fake_gemini(StatusCode::OK, "not json").await;
        let err = complete_err(&base).await;
        assert_eq!(err.kind, LlmErrorKind::Unknown);
        assert!(err.message.starts_with("Failed to parse response"), "{}", err.message);
    }

    #[tokio::test]
    async fn test_complete_server_error_uses_gemini_message() {
        let base = fake_gemini(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":{"code":500,"message":"boom","status":"INTERNAL"}}"#,
        )
        .await;
        let err = complete_err(&base).await;
        assert_eq!(err.kind, LlmErrorKind::ServerError);
        assert_eq!(err.message, "Server error: boom");
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let base = fake_gemini(StatusCode::TOO_MANY_REQUESTS, "quota exhausted").await;
        let err = complete_err(&base).await;
        assert_eq!(err.kind, LlmErrorKind::RateLimit);
        assert!(err.message.contains("quota exhausted"));
    }

    #[tokio::test]
    async fn test_complete_connection_refused_is_network() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = complete_err(&format!("http://{addr}")).await;
        assert_eq!(err.kind, LlmErrorKind::Network);
    }

    #[tokio::test]
    async fn test_transport_failure_reaches_user_as_offline_fallback() {
        let base = fake_gemini(StatusCode::SERVICE_UNAVAILABLE, "down").await;
        let gateway = ResponseGateway::new(Some(Arc::new(client_for(&base)) as Arc<dyn LlmService>));

        assert_eq!(
            gateway.generate("Where am I?", Language::En).await,
            "I am currently offline. Please check your connection."
        );
        assert_eq!(
            gateway.generate("Where am I?", Language::Ar).await,
            "أنا غير متصل حاليًا. يرجى التحقق من اتصالك."
        );
    }
}
