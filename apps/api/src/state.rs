use std::sync::Arc;

use crate::analysis::MatchAnalyzer;
use crate::config::Config;
use crate::extraction::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: Arc<TextExtractor>,
    /// Upstream clients live behind the analyzer's step traits; tests swap in fakes.
    pub analyzer: Arc<MatchAnalyzer>,
}
