use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::analysis::analyzer::AnalysisError;
use crate::analysis::models::{MatchRequestBody, MatchResult};
use crate::errors::AppError;
use crate::state::AppState;

pub const MISSING_FIELDS_MESSAGE: &str = "Resume and job description are required";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Please try again later.";

/// POST /api/match
pub async fn handle_match(
    State(state): State<AppState>,
    body: Result<Json<MatchRequestBody>, JsonRejection>,
) -> Result<Json<MatchResult>, AppError> {
    let Json(body) = body.map_err(|rejection| AppError::Processing {
        message: ANALYSIS_FAILED_MESSAGE.to_string(),
        details: rejection.body_text(),
    })?;

    let request = body
        .into_request()
        .ok_or_else(|| AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()))?;

    let result = state.analyzer.analyze(&request).await?;
    Ok(Json(result))
}

impl From<AnalysisError> for AppError {
    fn from(error: AnalysisError) -> Self {
        let message = error.to_string();
        match error {
            AnalysisError::UpstreamAuth(fallback) => AppError::UpstreamAuth { message, fallback },
        }
    }
}
