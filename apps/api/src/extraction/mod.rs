// Text extraction: multipart upload → scratch file → format parser → normalized text.

pub mod document;
pub mod extractor;
pub mod handlers;
pub mod normalize;
pub mod parsers;
pub mod upload;

pub use document::ExtractorConfig;
pub use extractor::TextExtractor;
