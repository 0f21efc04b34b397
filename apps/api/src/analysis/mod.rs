// Resume / job description matching: similarity score, written feedback, derived metrics.

pub mod analyzer;
pub mod feedback;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod prompts;
pub mod scoring;
pub mod tokens;

pub use analyzer::MatchAnalyzer;
