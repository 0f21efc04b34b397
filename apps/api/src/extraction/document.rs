use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempPath;
use tracing::warn;
use uuid::Uuid;

/// Document families the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
    Text,
}

impl DocumentKind {
    /// Maps a lowercased, dot-prefixed extension to a document kind.
    /// Returns `None` when the extension is unknown or not in `allowed`.
    pub fn classify(extension: &str, allowed: &[String]) -> Option<Self> {
        if !allowed.iter().any(|a| a == extension) {
            return None;
        }
        match extension {
            ".pdf" => Some(DocumentKind::Pdf),
            ".doc" | ".docx" => Some(DocumentKind::Word),
            ".txt" => Some(DocumentKind::Text),
            _ => None,
        }
    }
}

/// Construction-time settings for the upload boundary and the extractor.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub max_upload_bytes: u64,
    pub allowed_extensions: Vec<String>,
    /// Normalized text shorter than this is treated as a failed extraction.
    pub min_text_chars: usize,
    pub upload_dir: PathBuf,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            allowed_extensions: [".pdf", ".doc", ".docx", ".txt"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            min_text_chars: 10,
            upload_dir: std::env::temp_dir(),
        }
    }
}

impl ExtractorConfig {
    /// Human-readable upload limit, e.g. "10MB", "512KB" or "16 bytes".
    pub fn upload_limit_label(&self) -> String {
        const KIB: u64 = 1024;
        const MIB: u64 = 1024 * KIB;

        let bytes = self.max_upload_bytes;
        let (value, unit) = if bytes >= MIB {
            (bytes as f64 / MIB as f64, "MB")
        } else if bytes >= KIB {
            (bytes as f64 / KIB as f64, "KB")
        } else {
            return format!("{bytes} bytes");
        };

        if value.fract() == 0.0 {
            format!("{}{unit}", value as u64)
        } else {
            format!("{value:.1}{unit}")
        }
    }
}

/// Temporary file backing one upload.
///
/// `release` deletes the file; calling it again, or after the file vanished,
/// is a no-op. Anything still held on drop is removed by `TempPath`.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl ScratchFile {
    pub fn create(dir: &Path, extension: &str) -> io::Result<(Self, std::fs::File)> {
        let named = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(extension)
            .tempfile_in(dir)?;
        let (file, temp) = named.into_parts();
        let path = temp.to_path_buf();
        Ok((
            Self {
                path,
                temp: Some(temp),
            },
            file,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_released(&self) -> bool {
        self.temp.is_none()
    }

    pub fn release(&mut self) {
        let Some(temp) = self.temp.take() else {
            return;
        };
        match temp.close() {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete upload scratch file {}: {e}", self.path.display()),
        }
    }
}

/// A validated upload, alive for the duration of one extraction call.
#[derive(Debug)]
pub struct UploadedDocument {
    pub upload_id: Uuid,
    pub file_name: String,
    /// Lowercased with its leading dot, or empty when the name has no extension.
    pub extension: String,
    pub size_bytes: u64,
    storage: ScratchFile,
}

impl UploadedDocument {
    pub fn new(upload_id: Uuid, file_name: String, size_bytes: u64, storage: ScratchFile) -> Self {
        let extension = extension_of(&file_name);
        Self {
            upload_id,
            file_name,
            extension,
            size_bytes,
            storage,
        }
    }

    /// Writes `content` to a fresh scratch file under `dir`.
    #[cfg(test)]
    pub fn stage(dir: &Path, file_name: &str, content: &[u8]) -> io::Result<Self> {
        use std::io::Write;

        let (storage, mut file) = ScratchFile::create(dir, &extension_of(file_name))?;
        file.write_all(content)?;
        Ok(Self::new(
            Uuid::new_v4(),
            file_name.to_string(),
            content.len() as u64,
            storage,
        ))
    }

    #[cfg(test)]
    pub fn storage_path(&self) -> &Path {
        self.storage.path()
    }

    #[cfg(test)]
    pub fn is_released(&self) -> bool {
        self.storage.is_released()
    }

    /// Size of the backing file on disk, or `None` if it does not exist.
    pub async fn stored_len(&self) -> Option<u64> {
        if self.storage.is_released() {
            return None;
        }
        tokio::fs::metadata(self.storage.path())
            .await
            .ok()
            .filter(|m| m.is_file())
            .map(|m| m.len())
    }

    pub async fn read_content(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.storage.path()).await
    }

    pub fn release(&mut self) {
        self.storage.release();
    }
}

/// Successful extraction, serialized as the endpoint's 200 body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub text: String,
    pub file_type: String,
    pub file_name: String,
    pub text_length: usize,
}

pub(crate) fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}
