use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CompletionService, UpstreamError};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client. The API key travels in a header, never in the URL.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(client: Client, api_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                api_url.trim_end_matches('/'),
                model
            ),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingApiKey("GEMINI_API_KEY"))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest {
                contents: vec![RequestContent {
                    parts: vec![RequestPart { text: prompt }],
                }],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {status}");
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = response.json().await?;
        let text = generated
            .text()
            .ok_or_else(|| UpstreamError::Malformed("response has no candidate text".to_string()))?;

        debug!("Gemini completion returned {} characters", text.len());
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::tests::serve;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    const PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn client_for(base: &str, key: Option<&str>) -> GeminiClient {
        GeminiClient::new(
            crate::clients::build_http_client(Duration::from_secs(5)).unwrap(),
            base,
            "gemini-1.5-flash",
            key.map(String::from),
        )
    }

    #[test]
    fn test_response_text_takes_first_part() {
        let parsed: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "RESUME ANALYSIS: good"}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "second candidate"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.text(), Some("RESUME ANALYSIS: good"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let parsed: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parsed.text(), None);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_a_request() {
        let err = client_for("http://127.0.0.1:9", None)
            .complete("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::MissingApiKey("GEMINI_API_KEY")));
    }

    #[tokio::test]
    async fn test_sends_prompt_and_returns_text() {
        let router = Router::new().fallback(
            |uri: Uri, headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(uri.path(), PATH);
                assert_eq!(headers["x-goog-api-key"], "gm_test");
                assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze this");
                Json(json!({
                    "candidates": [{"content": {"parts": [{"text": "MISSING KEYWORDS: [Kafka]"}]}}]
                }))
            },
        );
        let base = serve(router).await;

        let text = client_for(&base, Some("gm_test"))
            .complete("Analyze this")
            .await
            .unwrap();
        assert_eq!(text, "MISSING KEYWORDS: [Kafka]");
    }

    #[tokio::test]
    async fn test_error_body_message_is_surfaced() {
        let router = Router::new().fallback(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"code": 401, "message": "API key not valid"}})),
            )
        });
        let base = serve(router).await;

        let err = client_for(&base, Some("bad")).complete("p").await.unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(err.to_string(), "API error (status 401): API key not valid");
    }

    #[tokio::test]
    async fn test_empty_candidates_is_malformed() {
        let router = Router::new().fallback(|| async { Json(json!({"candidates": []})) });
        let base = serve(router).await;

        let err = client_for(&base, Some("k")).complete("p").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }
}
