//! Document parsers behind a common trait, plus the failure classification
//! used to pick a user-facing message when a parser gives up.
//!
//! Parsers are synchronous; the extractor runs them on the blocking pool.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use zip::ZipArchive;

/// Failure raised by a parser. The message is prefixed with the library tag
/// (`pdf-extract:`, `docx reader:`) so classification can see which one failed.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> FailureCategory {
        FailureCategory::classify(&self.message)
    }
}

/// Extracts raw (un-normalized) text from a document's bytes.
pub trait DocumentParser: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ParseError>;
}

/// User-facing bucket for a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    PasswordProtected,
    Corrupted,
    WordFormatFailure,
    PdfFormatFailure,
    ExtractionFailure,
}

impl FailureCategory {
    /// Heuristic substring match over a parser error message, checked in order.
    /// A message that mentions "password" or "pdf" for unrelated reasons will
    /// land in the wrong bucket; the raw message is always returned alongside.
    pub fn classify(message: &str) -> Self {
        let message = message.to_lowercase();
        if message.contains("password") {
            FailureCategory::PasswordProtected
        } else if message.contains("corrupted") {
            FailureCategory::Corrupted
        } else if message.contains("docx") {
            FailureCategory::WordFormatFailure
        } else if message.contains("pdf") {
            FailureCategory::PdfFormatFailure
        } else {
            FailureCategory::ExtractionFailure
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            FailureCategory::PasswordProtected => {
                "The file appears to be password-protected. Please remove the password and try again."
            }
            FailureCategory::Corrupted => {
                "The file appears to be corrupted. Please try uploading a different copy."
            }
            FailureCategory::WordFormatFailure => {
                "Failed to process Word document. The file might be corrupted or in an unsupported format."
            }
            FailureCategory::PdfFormatFailure => {
                "Failed to process PDF. The file might be corrupted, password-protected, or contain only images."
            }
            FailureCategory::ExtractionFailure => "Failed to extract text from file.",
        }
    }
}

/// PDF text via `pdf-extract`, all pages concatenated.
pub struct PdfParser;

impl DocumentParser for PdfParser {
    fn extract(&self, bytes: &[u8]) -> Result<String, ParseError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ParseError::new(format!("pdf-extract: {e}")))
    }
}

/// Reads `word/document.xml` out of an OOXML package.
///
/// Only run text is kept: paragraphs end in a newline, `w:tab` becomes a tab
/// and `w:br`/`w:cr` a newline. Legacy binary `.doc` files are not zip
/// archives and fail here.
pub struct DocxParser;

const DOCUMENT_PART: &str = "word/document.xml";

impl DocumentParser for DocxParser {
    fn extract(&self, bytes: &[u8]) -> Result<String, ParseError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ParseError::new(format!("docx reader: {e}")))?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| ParseError::new(format!("docx reader: {DOCUMENT_PART}: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| ParseError::new(format!("docx reader: {DOCUMENT_PART}: {e}")))?;

        document_text(&xml)
    }
}

fn document_text(xml: &str) -> Result<String, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;
    // <w:tabs> holds tab-stop definitions, which are also named w:tab
    let mut in_tab_stops = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            ParseError::new(format!(
                "docx reader: malformed {DOCUMENT_PART} at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = true,
                b"tabs" => in_tab_stops = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"tabs" => in_tab_stops = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if !in_tab_stops => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                let unescaped = t.unescape().map_err(|e| {
                    ParseError::new(format!("docx reader: bad text in {DOCUMENT_PART}: {e}"))
                })?;
                text.push_str(&unescaped);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// UTF-8 text. Invalid sequences become U+FFFD; a leading byte-order mark is dropped.
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn extract(&self, bytes: &[u8]) -> Result<String, ParseError> {
        let text = String::from_utf8_lossy(bytes);
        Ok(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
    }
}
