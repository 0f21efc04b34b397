pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_match;
use crate::errors::AppError;
use crate::extraction::handlers::handle_extract_text;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

pub fn build_router(state: AppState) -> Router {
    let upload_body_limit = usize::try_from(state.config.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/extract-text",
            post(handle_extract_text)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route(
            "/api/match",
            post(handle_match).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
}
