//! Similarity scoring, step 1 of the analysis.
//!
//! `SemanticScorer` asks the similarity service; `OverlapScorer` is the local
//! Jaccard fallback. Both produce an integer 0–100.

use std::sync::Arc;

use async_trait::async_trait;

use crate::analysis::models::MatchRequest;
use crate::analysis::tokens::token_set;
use crate::clients::{SimilarityService, UpstreamError};

/// Tokens must be longer than this to take part in the overlap score.
const OVERLAP_MIN_CHARS: usize = 2;

#[async_trait]
pub trait MatchScorer: Send + Sync {
    /// Name used in warnings when this scorer fails.
    fn label(&self) -> &str;

    async fn score(&self, request: &MatchRequest) -> Result<u32, UpstreamError>;
}

pub struct SemanticScorer {
    service: Arc<dyn SimilarityService>,
}

impl SemanticScorer {
    pub fn new(service: Arc<dyn SimilarityService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl MatchScorer for SemanticScorer {
    fn label(&self) -> &str {
        self.service.name()
    }

    async fn score(&self, request: &MatchRequest) -> Result<u32, UpstreamError> {
        let candidates = [request.job_description_text.clone()];
        let values = self
            .service
            .similarity(&request.resume_text, &candidates)
            .await?;
        let first = values
            .first()
            .copied()
            .ok_or_else(|| UpstreamError::Malformed("similarity response was empty".to_string()))?;
        similarity_to_score(first)
    }
}

/// `round(value × 100)`, clamped to 0–100. Non-finite values are malformed.
pub fn similarity_to_score(value: f64) -> Result<u32, UpstreamError> {
    if !value.is_finite() {
        return Err(UpstreamError::Malformed(format!(
            "similarity value {value} is not a number"
        )));
    }
    Ok((value * 100.0).round().clamp(0.0, 100.0) as u32)
}

/// Jaccard similarity over lowercased token sets. Infallible.
pub struct OverlapScorer;

impl OverlapScorer {
    pub fn overlap_score(&self, request: &MatchRequest) -> u32 {
        jaccard_score(&request.resume_text, &request.job_description_text)
    }
}

#[async_trait]
impl MatchScorer for OverlapScorer {
    fn label(&self) -> &str {
        "Word overlap"
    }

    async fn score(&self, request: &MatchRequest) -> Result<u32, UpstreamError> {
        Ok(self.overlap_score(request))
    }
}

/// `round(|A ∩ B| / |A ∪ B| × 100)`; 0 when both token sets are empty.
pub fn jaccard_score(resume: &str, job_description: &str) -> u32 {
    let resume_tokens = token_set(resume, OVERLAP_MIN_CHARS);
    let job_tokens = token_set(job_description, OVERLAP_MIN_CHARS);

    let intersection = resume_tokens.intersection(&job_tokens).count();
    let union = resume_tokens.union(&job_tokens).count();
    if union == 0 {
        return 0;
    }
    ((intersection as f64 / union as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSimilarity(Result<Vec<f64>, u16>);

    #[async_trait]
    impl SimilarityService for FixedSimilarity {
        fn name(&self) -> &str {
            "Fixed"
        }

        async fn similarity(
            &self,
            _source: &str,
            candidates: &[String],
        ) -> Result<Vec<f64>, UpstreamError> {
            assert_eq!(candidates.len(), 1);
            self.0.clone().map_err(|status| UpstreamError::Api {
                status,
                message: "nope".to_string(),
            })
        }
    }

    fn request(resume: &str, job: &str) -> MatchRequest {
        MatchRequest {
            resume_text: resume.to_string(),
            job_description_text: job.to_string(),
        }
    }

    #[test]
    fn test_jaccard_reference_case() {
        // {engineer, python, data} vs {python, data, scientist}: 2 / 4
        assert_eq!(jaccard_score("engineer python data", "python data scientist"), 50);
    }

    #[test]
    fn test_jaccard_ignores_case_and_short_tokens() {
        assert_eq!(jaccard_score("Rust is ok", "rust IS ok"), 100);
    }

    #[test]
    fn test_jaccard_both_empty_is_zero() {
        assert_eq!(jaccard_score("", ""), 0);
        assert_eq!(jaccard_score("a an", "to be"), 0);
    }

    #[test]
    fn test_jaccard_disjoint_is_zero() {
        assert_eq!(jaccard_score("kubernetes helm", "accounting ledger"), 0);
    }

    #[test]
    fn test_jaccard_rounds_to_nearest() {
        // 1 shared of 3 distinct → 33.3
        assert_eq!(jaccard_score("rust java", "rust python"), 33);
        // 2 shared of 3 distinct → 66.7
        assert_eq!(jaccard_score("rust java python", "rust java"), 67);
    }

    #[test]
    fn test_similarity_to_score_rounds_and_clamps() {
        assert_eq!(similarity_to_score(0.834).unwrap(), 83);
        assert_eq!(similarity_to_score(0.836).unwrap(), 84);
        assert_eq!(similarity_to_score(1.2).unwrap(), 100);
        assert_eq!(similarity_to_score(-0.1).unwrap(), 0);
        assert!(similarity_to_score(f64::NAN).is_err());
    }

    #[tokio::test]
    async fn test_semantic_scorer_takes_first_value() {
        let scorer = SemanticScorer::new(Arc::new(FixedSimilarity(Ok(vec![0.72, 0.1]))));
        assert_eq!(scorer.score(&request("a", "b")).await.unwrap(), 72);
        assert_eq!(scorer.label(), "Fixed");
    }

    #[tokio::test]
    async fn test_semantic_scorer_empty_response_is_malformed() {
        let scorer = SemanticScorer::new(Arc::new(FixedSimilarity(Ok(vec![]))));
        let err = scorer.score(&request("a", "b")).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_semantic_scorer_propagates_upstream_error() {
        let scorer = SemanticScorer::new(Arc::new(FixedSimilarity(Err(401))));
        let err = scorer.score(&request("a", "b")).await.unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_overlap_scorer_never_fails() {
        let scorer = OverlapScorer;
        let score = scorer
            .score(&request("engineer python data", "python data scientist"))
            .await
            .unwrap();
        assert_eq!(score, 50);
    }
}
