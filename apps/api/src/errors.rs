use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::models::DegradedAnalysis;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// 500 carrying both a user-facing message and the underlying error text.
    #[error("{message}: {details}")]
    Processing { message: String, details: String },

    #[error("{message}")]
    UpstreamAuth {
        message: String,
        fallback: DegradedAnalysis,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("No route for {path}") }),
            ),
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            AppError::PayloadTooLarge(message) => {
                (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": message }))
            }
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
            AppError::Processing { message, details } => {
                tracing::error!("{message}: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message, "details": details }),
                )
            }
            AppError::UpstreamAuth { message, fallback } => {
                tracing::error!("Upstream authentication failed for every service");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message, "fallback": fallback }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn render(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_400_with_error_only() {
        let (status, body) = render(AppError::Validation("No file uploaded".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No file uploaded" }));
    }

    #[tokio::test]
    async fn test_processing_includes_details() {
        let (status, body) = render(AppError::Processing {
            message: "Failed to process PDF file.".to_string(),
            details: "pdf-extract: bad xref".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to process PDF file.");
        assert_eq!(body["details"], "pdf-extract: bad xref");
    }

    #[tokio::test]
    async fn test_upstream_auth_embeds_fallback() {
        let (status, body) = render(AppError::UpstreamAuth {
            message: "API authentication failed. Please check your API keys.".to_string(),
            fallback: DegradedAnalysis {
                score: 42,
                suggestions: "s".to_string(),
                missing_keywords: vec!["API unavailable".to_string()],
            },
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["fallback"]["score"], 42);
        assert_eq!(body["fallback"]["missingKeywords"], json!(["API unavailable"]));
    }

    #[tokio::test]
    async fn test_method_not_allowed_body() {
        let (status, body) = render(AppError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Method not allowed" }));
    }
}
