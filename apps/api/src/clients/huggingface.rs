use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::{SimilarityService, UpstreamError};

#[derive(Debug, Serialize)]
struct SimilarityRequest<'a> {
    inputs: SimilarityInputs<'a>,
}

#[derive(Debug, Serialize)]
struct SimilarityInputs<'a> {
    source_sentence: &'a str,
    sentences: &'a [String],
}

/// Hugging Face inference API, sentence-similarity task.
#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HuggingFaceClient {
    pub fn new(client: Client, api_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: format!("{}/models/{}", api_url.trim_end_matches('/'), model),
            api_key,
        }
    }
}

#[async_trait]
impl SimilarityService for HuggingFaceClient {
    fn name(&self) -> &str {
        "Hugging Face"
    }

    async fn similarity(&self, source: &str, candidates: &[String]) -> Result<Vec<f64>, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingApiKey("HF_API_KEY"))?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&SimilarityRequest {
                inputs: SimilarityInputs {
                    source_sentence: source,
                    sentences: candidates,
                },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Hugging Face API returned {status}");
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let scores: Vec<f64> = response.json().await?;
        debug!("Hugging Face similarity returned {} scores", scores.len());
        Ok(scores)
    }
}

/// Pulls `error` out of an inference API error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
