use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::document::{DocumentKind, ExtractionResult, ExtractorConfig, UploadedDocument};
use crate::extraction::normalize::normalize_text;
use crate::extraction::parsers::{
    DocumentParser, DocxParser, FailureCategory, ParseError, PdfParser, PlainTextParser,
};
use crate::extraction::upload::{UploadFailure, UploadOutcome};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Invalid file upload")]
    InvalidUpload,

    #[error("Uploaded file not found")]
    StorageMissing,

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Unsupported file type: {0}. Please upload PDF, DOC, DOCX, or TXT files.")]
    UnsupportedType(String),

    #[error("File size exceeds the {limit_label} limit. Please upload a smaller file.")]
    SizeLimit { limit_label: String },

    #[error(
        "Could not extract meaningful text from the file. \
         Please ensure the file contains readable text (minimum {min_chars} characters)."
    )]
    InsufficientText { min_chars: usize },

    #[error("{}", .category.user_message())]
    Parse {
        category: FailureCategory,
        details: String,
    },

    #[error("Failed to process uploaded file. Please try again.")]
    Upload { details: String },
}

impl From<ParseError> for ExtractionError {
    fn from(error: ParseError) -> Self {
        ExtractionError::Parse {
            category: error.category(),
            details: error.message().to_string(),
        }
    }
}

/// Turns one upload into normalized text.
///
/// Parsers are injected so each format can be swapped or mocked independently.
pub struct TextExtractor {
    config: ExtractorConfig,
    pdf: Arc<dyn DocumentParser>,
    word: Arc<dyn DocumentParser>,
    text: Arc<dyn DocumentParser>,
}

impl TextExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self::with_parsers(
            config,
            Arc::new(PdfParser),
            Arc::new(DocxParser),
            Arc::new(PlainTextParser),
        )
    }

    pub fn with_parsers(
        config: ExtractorConfig,
        pdf: Arc<dyn DocumentParser>,
        word: Arc<dyn DocumentParser>,
        text: Arc<dyn DocumentParser>,
    ) -> Self {
        Self {
            config,
            pdf,
            word,
            text,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Runs the validation gate and the format parser. The scratch file is
    /// released on every path before this returns.
    pub async fn extract(&self, outcome: UploadOutcome) -> Result<ExtractionResult, ExtractionError> {
        let mut document = match outcome {
            UploadOutcome::Success(document) => document,
            UploadOutcome::Failure(failure) => return Err(self.upload_error(failure)),
        };

        let result = self.extract_document(&mut document).await;
        document.release();

        match &result {
            Ok(extracted) => info!(
                upload_id = %document.upload_id,
                bytes = document.size_bytes,
                "Extracted {} characters from {}",
                extracted.text_length,
                document.file_name
            ),
            Err(e) => warn!(
                upload_id = %document.upload_id,
                "Extraction from {} failed: {e}",
                document.file_name
            ),
        }

        result
    }

    async fn extract_document(
        &self,
        document: &mut UploadedDocument,
    ) -> Result<ExtractionResult, ExtractionError> {
        let Some(size) = document.stored_len().await else {
            return Err(ExtractionError::StorageMissing);
        };

        if size == 0 {
            document.release();
            return Err(ExtractionError::EmptyFile);
        }

        let Some(kind) = DocumentKind::classify(&document.extension, &self.config.allowed_extensions)
        else {
            document.release();
            return Err(ExtractionError::UnsupportedType(document.extension.clone()));
        };

        info!(
            upload_id = %document.upload_id,
            "Processing {} ({size} bytes, {kind:?})",
            document.file_name
        );

        let read = document.read_content().await;
        document.release();
        let bytes = read.map_err(|e| ExtractionError::Parse {
            category: FailureCategory::ExtractionFailure,
            details: e.to_string(),
        })?;

        let raw = self.parse(kind, bytes).await?;
        let text = normalize_text(&raw);
        let text_length = text.chars().count();

        if text_length < self.config.min_text_chars {
            return Err(ExtractionError::InsufficientText {
                min_chars: self.config.min_text_chars,
            });
        }

        Ok(ExtractionResult {
            text,
            file_type: document.extension.clone(),
            file_name: document.file_name.clone(),
            text_length,
        })
    }

    async fn parse(&self, kind: DocumentKind, bytes: Vec<u8>) -> Result<String, ParseError> {
        let (parser, tag) = match kind {
            DocumentKind::Pdf => (Arc::clone(&self.pdf), "pdf-extract"),
            DocumentKind::Word => (Arc::clone(&self.word), "docx reader"),
            DocumentKind::Text => (Arc::clone(&self.text), "text decoder"),
        };

        tokio::task::spawn_blocking(move || parser.extract(&bytes))
            .await
            .map_err(|e| ParseError::new(format!("{tag}: parser aborted: {e}")))?
    }

    fn upload_error(&self, failure: UploadFailure) -> ExtractionError {
        match failure {
            UploadFailure::NoFile => ExtractionError::NoFile,
            UploadFailure::InvalidUpload => ExtractionError::InvalidUpload,
            UploadFailure::SizeLimit { .. } => ExtractionError::SizeLimit {
                limit_label: self.config.upload_limit_label(),
            },
            UploadFailure::Malformed(details) => ExtractionError::Upload { details },
            UploadFailure::Storage(e) => ExtractionError::Upload {
                details: e.to_string(),
            },
        }
    }
}
