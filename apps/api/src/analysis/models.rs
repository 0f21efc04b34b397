use rand::Rng;
use serde::{Deserialize, Serialize};

/// Raw JSON body of the analysis endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MatchRequestBody {
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default, rename = "jobDesc")]
    pub job_desc: Option<String>,
}

impl MatchRequestBody {
    /// Both texts must be present and not blank.
    pub fn into_request(self) -> Option<MatchRequest> {
        let present = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Some(MatchRequest {
            resume_text: present(self.resume)?,
            job_description_text: present(self.job_desc)?,
        })
    }
}

/// A validated analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRequest {
    pub resume_text: String,
    pub job_description_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub score: u32,
    pub analysis: Analysis,
    pub missing_keywords: Vec<String>,
    pub metrics: Metrics,
    pub recommendations: Recommendations,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub overall: String,
    pub suggestions: String,
    pub action_items: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub resume_word_count: usize,
    pub job_description_word_count: usize,
    pub keyword_density: u32,
    pub similarity_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub priority: Priority,
    pub estimated_improvement: u32,
    pub focus_areas: Vec<String>,
}

/// Placeholder result embedded in the authentication-failure response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DegradedAnalysis {
    pub score: u32,
    pub suggestions: String,
    pub missing_keywords: Vec<String>,
}

impl DegradedAnalysis {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            score: rng.gen_range(30..70),
            suggestions: "Unable to generate AI suggestions due to API issues. \
                Please ensure your resume highlights relevant skills and experience."
                .to_string(),
            missing_keywords: vec!["API unavailable".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn body(value: serde_json::Value) -> MatchRequestBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_body_with_both_fields_validates() {
        let request = body(json!({"resume": "Rust dev", "jobDesc": "Rust role"}))
            .into_request()
            .unwrap();
        assert_eq!(request.resume_text, "Rust dev");
        assert_eq!(request.job_description_text, "Rust role");
    }

    #[test]
    fn test_missing_or_blank_fields_are_rejected() {
        assert!(body(json!({"resume": "Rust dev"})).into_request().is_none());
        assert!(body(json!({"jobDesc": "Rust role"})).into_request().is_none());
        assert!(body(json!({"resume": "", "jobDesc": "Rust role"})).into_request().is_none());
        assert!(body(json!({"resume": "Rust dev", "jobDesc": "  \n"})).into_request().is_none());
        assert!(body(json!({})).into_request().is_none());
    }

    #[test]
    fn test_priority_serializes_as_plain_name() {
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), json!("High"));
        assert_eq!(serde_json::to_value(Priority::Medium).unwrap(), json!("Medium"));
        assert_eq!(serde_json::to_value(Priority::Low).unwrap(), json!("Low"));
    }

    #[test]
    fn test_match_result_uses_camel_case_keys() {
        let result = MatchResult {
            score: 64,
            analysis: Analysis {
                overall: "o".to_string(),
                suggestions: "s".to_string(),
                action_items: "a".to_string(),
            },
            missing_keywords: vec!["kafka".to_string()],
            metrics: Metrics {
                resume_word_count: 120,
                job_description_word_count: 80,
                keyword_density: 90,
                similarity_score: 64,
            },
            recommendations: Recommendations {
                priority: Priority::Medium,
                estimated_improvement: 36,
                focus_areas: vec!["kafka".to_string()],
            },
            warnings: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["analysis"]["actionItems"], "a");
        assert_eq!(value["missingKeywords"], json!(["kafka"]));
        assert_eq!(value["metrics"]["resumeWordCount"], 120);
        assert_eq!(value["metrics"]["jobDescriptionWordCount"], 80);
        assert_eq!(value["metrics"]["keywordDensity"], 90);
        assert_eq!(value["metrics"]["similarityScore"], 64);
        assert_eq!(value["recommendations"]["estimatedImprovement"], 36);
        assert_eq!(value["recommendations"]["focusAreas"], json!(["kafka"]));
        assert_eq!(value["warnings"], json!([]));
    }

    #[test]
    fn test_degraded_score_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let degraded = DegradedAnalysis::generate(&mut rng);
            assert!((30..70).contains(&degraded.score), "{}", degraded.score);
        }
    }

    #[test]
    fn test_degraded_payload_shape() {
        let degraded = DegradedAnalysis::generate(&mut StdRng::seed_from_u64(1));
        let value = serde_json::to_value(&degraded).unwrap();
        assert_eq!(value["missingKeywords"], json!(["API unavailable"]));
        assert!(value["suggestions"].as_str().unwrap().contains("API issues"));
    }
}
