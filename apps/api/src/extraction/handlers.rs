//! Axum route handler for the extraction endpoint.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::warn;

use crate::errors::AppError;
use crate::extraction::document::ExtractionResult;
use crate::extraction::extractor::ExtractionError;
use crate::extraction::upload::{parse_upload, UploadFailure, UploadOutcome};
use crate::state::AppState;

/// POST /api/extract-text
///
/// Accepts a multipart body with a single `file` field and returns its normalized text.
pub async fn handle_extract_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResult>, AppError> {
    let outcome = match multipart {
        Ok(multipart) => parse_upload(multipart, state.extractor.config()).await,
        Err(rejection) => {
            warn!("Extraction request is not multipart: {rejection}");
            UploadOutcome::Failure(UploadFailure::NoFile)
        }
    };

    let result = state
        .extractor
        .extract(outcome)
        .await
        .map_err(AppError::from)?;

    Ok(Json(result))
}

impl From<ExtractionError> for AppError {
    fn from(error: ExtractionError) -> Self {
        let message = error.to_string();
        match error {
            ExtractionError::NoFile
            | ExtractionError::InvalidUpload
            | ExtractionError::StorageMissing
            | ExtractionError::EmptyFile
            | ExtractionError::UnsupportedType(_)
            | ExtractionError::InsufficientText { .. } => AppError::Validation(message),
            ExtractionError::SizeLimit { .. } => AppError::PayloadTooLarge(message),
            ExtractionError::Parse { details, .. } | ExtractionError::Upload { details } => {
                AppError::Processing { message, details }
            }
        }
    }
}
