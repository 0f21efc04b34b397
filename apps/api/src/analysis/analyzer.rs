//! Match analysis pipeline.
//!
//! Step 1 scores the pair, step 2 produces written feedback, step 3 derives
//! metrics from both. Steps 1 and 2 each have a live implementation and a
//! local one; `resolve` swaps in the local result when the live call fails.
//! Steps run in order because the step-2 fallback quotes the step-1 score.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::feedback::{FeedbackAnalyst, GenerativeAnalyst, KeywordAnalyst};
use crate::analysis::metrics::{derive_metrics, recommendations};
use crate::analysis::models::{Analysis, DegradedAnalysis, MatchRequest, MatchResult};
use crate::analysis::scoring::{MatchScorer, OverlapScorer, SemanticScorer};
use crate::clients::{CompletionService, SimilarityService, UpstreamError};

const SCORING_METHOD: &str = "scoring";
const ANALYSIS_METHOD: &str = "analysis";

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Both upstreams rejected their credentials.
    #[error("API authentication failed. Please check your API keys.")]
    UpstreamAuth(DegradedAnalysis),
}

/// Why a step fell back to its local implementation.
#[derive(Debug)]
pub struct StepFallback {
    pub warning: String,
    pub auth_failure: bool,
}

/// Keeps `primary` if it succeeded, otherwise computes `fallback` and
/// describes the failure.
pub fn resolve<T>(
    service: &str,
    method: &str,
    primary: Result<T, UpstreamError>,
    fallback: impl FnOnce() -> T,
) -> (T, Option<StepFallback>) {
    match primary {
        Ok(value) => (value, None),
        Err(error) => {
            warn!("{service} {method} failed, using local fallback: {error}");
            let step = StepFallback {
                warning: format!(
                    "{service} API: {}. Using fallback {method} method.",
                    error.detail()
                ),
                auth_failure: error.is_auth_failure(),
            };
            (fallback(), Some(step))
        }
    }
}

pub struct MatchAnalyzer {
    scorer: Arc<dyn MatchScorer>,
    analyst: Arc<dyn FeedbackAnalyst>,
}

impl MatchAnalyzer {
    pub fn new(similarity: Arc<dyn SimilarityService>, completion: Arc<dyn CompletionService>) -> Self {
        Self::with_steps(
            Arc::new(SemanticScorer::new(similarity)),
            Arc::new(GenerativeAnalyst::new(completion)),
        )
    }

    pub fn with_steps(scorer: Arc<dyn MatchScorer>, analyst: Arc<dyn FeedbackAnalyst>) -> Self {
        Self { scorer, analyst }
    }

    pub async fn analyze(&self, request: &MatchRequest) -> Result<MatchResult, AnalysisError> {
        let (score, score_fallback) = resolve(
            self.scorer.label(),
            SCORING_METHOD,
            self.scorer.score(request).await,
            || OverlapScorer.overlap_score(request),
        );

        let (feedback, feedback_fallback) = resolve(
            self.analyst.label(),
            ANALYSIS_METHOD,
            self.analyst.analyze(request, score).await,
            || KeywordAnalyst.feedback(request, score),
        );

        let both_unauthorized = matches!(
            (&score_fallback, &feedback_fallback),
            (Some(scoring), Some(analysis)) if scoring.auth_failure && analysis.auth_failure
        );
        if both_unauthorized {
            warn!("Both upstream services rejected their API keys");
            return Err(AnalysisError::UpstreamAuth(DegradedAnalysis::generate(
                &mut rand::thread_rng(),
            )));
        }

        let warnings: Vec<String> = [score_fallback, feedback_fallback]
            .into_iter()
            .flatten()
            .map(|step| step.warning)
            .collect();

        let metrics = derive_metrics(request, score, &feedback.missing_keywords);
        let recommendations = recommendations(score, &feedback.missing_keywords);

        info!(
            score,
            missing_keywords = feedback.missing_keywords.len(),
            fallbacks = warnings.len(),
            "Match analysis complete"
        );

        Ok(MatchResult {
            score,
            analysis: Analysis {
                overall: feedback.overall,
                suggestions: feedback.suggestions,
                action_items: feedback.action_items,
            },
            missing_keywords: feedback.missing_keywords,
            metrics,
            recommendations,
            warnings,
        })
    }
}
