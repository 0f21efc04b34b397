//! Multipart upload boundary: turns a request body into an `UploadOutcome`
//! in one awaited call, staging the file into scoped scratch storage.

use std::io;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extraction::document::{extension_of, ExtractorConfig, ScratchFile, UploadedDocument};

/// Name of the multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

#[derive(Debug)]
pub enum UploadOutcome {
    Success(UploadedDocument),
    Failure(UploadFailure),
}

#[derive(Debug, Error)]
pub enum UploadFailure {
    #[error("no 'file' field in upload")]
    NoFile,

    #[error("'file' field has no file name")]
    InvalidUpload,

    #[error("upload exceeds the {limit}-byte limit")]
    SizeLimit { limit: u64 },

    #[error("malformed multipart body: {0}")]
    Malformed(String),

    #[error("could not stage upload: {0}")]
    Storage(#[from] io::Error),
}

/// Reads the first `file` field into a scratch file, enforcing the size limit while streaming.
/// Other fields are skipped.
pub async fn parse_upload(mut multipart: Multipart, config: &ExtractorConfig) -> UploadOutcome {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return UploadOutcome::Failure(UploadFailure::NoFile),
            Err(e) => return UploadOutcome::Failure(classify_multipart_error(e, config)),
        };

        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let Some(file_name) = field
            .file_name()
            .map(str::to_owned)
            .filter(|name| !name.trim().is_empty())
        else {
            return UploadOutcome::Failure(UploadFailure::InvalidUpload);
        };

        return match stage_field(field, file_name, config).await {
            Ok(document) => UploadOutcome::Success(document),
            Err(failure) => UploadOutcome::Failure(failure),
        };
    }
}

async fn stage_field(
    mut field: Field<'_>,
    file_name: String,
    config: &ExtractorConfig,
) -> Result<UploadedDocument, UploadFailure> {
    let upload_id = Uuid::new_v4();
    let (mut storage, file) = ScratchFile::create(&config.upload_dir, &extension_of(&file_name))?;
    let mut file = tokio::fs::File::from_std(file);
    let mut written: u64 = 0;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                storage.release();
                return Err(classify_multipart_error(e, config));
            }
        };

        written += chunk.len() as u64;
        if written > config.max_upload_bytes {
            storage.release();
            warn!(%upload_id, "Upload {file_name} rejected: over {} bytes", config.max_upload_bytes);
            return Err(UploadFailure::SizeLimit {
                limit: config.max_upload_bytes,
            });
        }

        if let Err(e) = file.write_all(&chunk).await {
            storage.release();
            return Err(UploadFailure::Storage(e));
        }
    }

    if let Err(e) = file.flush().await {
        storage.release();
        return Err(UploadFailure::Storage(e));
    }

    info!(%upload_id, "Staged upload {file_name} ({written} bytes)");
    Ok(UploadedDocument::new(upload_id, file_name, written, storage))
}

fn classify_multipart_error(error: MultipartError, config: &ExtractorConfig) -> UploadFailure {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadFailure::SizeLimit {
            limit: config.max_upload_bytes,
        }
    } else {
        UploadFailure::Malformed(error.body_text())
    }
}
