use crate::analysis::models::{MatchRequest, Metrics, Priority, Recommendations};
use crate::analysis::tokens::word_count;

const MAX_FOCUS_AREAS: usize = 5;

/// 100 with nothing missing, minus 10 per missing keyword, floored at 0.
pub fn keyword_density(missing: usize) -> u32 {
    100u32.saturating_sub(10 * missing.min(10) as u32)
}

pub fn priority_for(score: u32) -> Priority {
    match score {
        0..=49 => Priority::High,
        50..=74 => Priority::Medium,
        _ => Priority::Low,
    }
}

pub fn derive_metrics(request: &MatchRequest, score: u32, missing_keywords: &[String]) -> Metrics {
    Metrics {
        resume_word_count: word_count(&request.resume_text),
        job_description_word_count: word_count(&request.job_description_text),
        keyword_density: keyword_density(missing_keywords.len()),
        similarity_score: score,
    }
}

pub fn recommendations(score: u32, missing_keywords: &[String]) -> Recommendations {
    Recommendations {
        priority: priority_for(score),
        estimated_improvement: 100u32.saturating_sub(score),
        focus_areas: missing_keywords.iter().take(MAX_FOCUS_AREAS).cloned().collect(),
    }
}
