use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::extraction::ExtractorConfig;

const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_HF_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Upstream API keys are optional: without one, that step always uses its local fallback.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub hf_api_key: Option<String>,
    pub hf_api_url: String,
    pub hf_similarity_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub upstream_timeout: Duration,
    pub max_upload_bytes: u64,
    pub upload_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            hf_api_key: get("HF_API_KEY"),
            hf_api_url: get("HF_API_URL").unwrap_or_else(|| DEFAULT_HF_API_URL.to_string()),
            hf_similarity_model: get("HF_SIMILARITY_MODEL")
                .unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_api_url: get("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            upstream_timeout: Duration::from_secs(
                get("UPSTREAM_TIMEOUT_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?
                    .unwrap_or(60),
            ),
            max_upload_bytes: get("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
        })
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            max_upload_bytes: self.max_upload_bytes,
            upload_dir: self.upload_dir.clone(),
            ..ExtractorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.hf_api_key.is_none());
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.hf_similarity_model, DEFAULT_HF_MODEL);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.upstream_timeout, Duration::from_secs(60));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("HF_API_KEY", "hf_test"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("UPLOAD_DIR", "/var/tmp/uploads"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.hf_api_key.as_deref(), Some("hf_test"));
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.upload_dir, PathBuf::from("/var/tmp/uploads"));
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let config = config_from(&[("GEMINI_API_KEY", "  ")]).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
    }

    #[test]
    fn test_invalid_upload_limit_is_rejected() {
        assert!(config_from(&[("MAX_UPLOAD_BYTES", "ten megs")]).is_err());
    }

    #[test]
    fn test_extractor_config_carries_upload_settings() {
        let config = config_from(&[("MAX_UPLOAD_BYTES", "2048")]).unwrap();
        let extractor = config.extractor_config();
        assert_eq!(extractor.max_upload_bytes, 2048);
        assert_eq!(extractor.min_text_chars, 10);
    }
}
