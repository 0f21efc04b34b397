//! External AI collaborators: semantic similarity and text completion.
//!
//! The analyzer only sees the traits below; live HTTP clients implement them
//! and tests substitute in-memory fakes.
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

pub mod gemini;
pub mod huggingface;

pub use gemini::GeminiClient;
pub use huggingface::HuggingFaceClient;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("{0} is not set")]
    MissingApiKey(&'static str),
}

impl UpstreamError {
    /// True for an HTTP 401 from the upstream.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, UpstreamError::Api { status: 401, .. })
    }

    /// The upstream's own error text for API errors, the full display otherwise.
    pub fn detail(&self) -> String {
        match self {
            UpstreamError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Scores a source text against candidate texts; one value in [0, 1] per candidate.
#[async_trait]
pub trait SimilarityService: Send + Sync {
    /// Display name used in warnings, e.g. "Hugging Face".
    fn name(&self) -> &str;

    async fn similarity(&self, source: &str, candidates: &[String]) -> Result<Vec<f64>, UpstreamError>;
}

/// Single-prompt text completion.
#[async_trait]
pub trait CompletionService: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;
}

/// Shared HTTP client for upstream calls. One round trip per call, no retries.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}
