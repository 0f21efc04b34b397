//! Qualitative feedback, step 2 of the analysis.
//!
//! `GenerativeAnalyst` prompts the completion service and parses its labeled
//! sections. `KeywordAnalyst` is the local fallback built from token frequencies.

use std::sync::Arc;

use async_trait::async_trait;

use crate::analysis::models::MatchRequest;
use crate::analysis::prompts::{
    analysis_prompt, ACTION_ITEMS_LABEL, DETAILED_SUGGESTIONS_LABEL, MISSING_KEYWORDS_LABEL,
    RESUME_ANALYSIS_LABEL,
};
use crate::analysis::tokens::FrequencyMap;
use crate::clients::{CompletionService, UpstreamError};

pub const ANALYSIS_PLACEHOLDER: &str = "Analysis not available.";
pub const SUGGESTIONS_PLACEHOLDER: &str = "Suggestions not available.";
pub const ACTION_ITEMS_PLACEHOLDER: &str = "Action items not available.";

/// Tokens must be longer than this to count as keywords in the fallback.
const KEYWORD_MIN_CHARS: usize = 3;
const MAX_FALLBACK_KEYWORDS: usize = 10;
const KEYWORDS_IN_TEXT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub overall: String,
    pub suggestions: String,
    pub action_items: String,
    pub missing_keywords: Vec<String>,
}

#[async_trait]
pub trait FeedbackAnalyst: Send + Sync {
    fn label(&self) -> &str;

    /// `score` is the step-1 result; analysts may use it in their wording.
    async fn analyze(&self, request: &MatchRequest, score: u32) -> Result<Feedback, UpstreamError>;
}

pub struct GenerativeAnalyst {
    service: Arc<dyn CompletionService>,
}

impl GenerativeAnalyst {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl FeedbackAnalyst for GenerativeAnalyst {
    fn label(&self) -> &str {
        self.service.name()
    }

    async fn analyze(&self, request: &MatchRequest, _score: u32) -> Result<Feedback, UpstreamError> {
        let prompt = analysis_prompt(&request.resume_text, &request.job_description_text);
        let completion = self.service.complete(&prompt).await?;
        Ok(parse_sections(&completion))
    }
}

/// Splits a completion into its four labeled sections.
///
/// Each section runs from its label to the next expected label, or to the end
/// of the text. Absent or empty sections get the placeholder text.
pub fn parse_sections(text: &str) -> Feedback {
    let overall = section(text, RESUME_ANALYSIS_LABEL, Some(DETAILED_SUGGESTIONS_LABEL));
    let suggestions = section(text, DETAILED_SUGGESTIONS_LABEL, Some(MISSING_KEYWORDS_LABEL));
    let keywords = section(text, MISSING_KEYWORDS_LABEL, Some(ACTION_ITEMS_LABEL));
    let action_items = section(text, ACTION_ITEMS_LABEL, None);

    Feedback {
        overall: overall.unwrap_or(ANALYSIS_PLACEHOLDER).to_string(),
        suggestions: suggestions.unwrap_or(SUGGESTIONS_PLACEHOLDER).to_string(),
        action_items: action_items.unwrap_or(ACTION_ITEMS_PLACEHOLDER).to_string(),
        missing_keywords: keywords.map(parse_keyword_list).unwrap_or_default(),
    }
}

fn section<'a>(text: &'a str, label: &str, next_label: Option<&str>) -> Option<&'a str> {
    let start = text.find(label)? + label.len();
    let rest = &text[start..];
    let end = next_label
        .and_then(|next| rest.find(next))
        .unwrap_or(rest.len());
    Some(rest[..end].trim()).filter(|s| !s.is_empty())
}

/// `[a, b, , c]` → `["a", "b", "c"]`.
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    raw.replace(['[', ']'], "")
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

/// Template feedback from token frequencies; never fails.
pub struct KeywordAnalyst;

impl KeywordAnalyst {
    pub fn feedback(&self, request: &MatchRequest, score: u32) -> Feedback {
        let resume = FrequencyMap::build(&request.resume_text, KEYWORD_MIN_CHARS);
        let job = FrequencyMap::build(&request.job_description_text, KEYWORD_MIN_CHARS);

        let missing_keywords: Vec<String> = job
            .distinct()
            .filter(|token| !resume.contains(token))
            .take(MAX_FALLBACK_KEYWORDS)
            .map(String::from)
            .collect();
        let common: Vec<&str> = resume
            .distinct()
            .filter(|token| job.contains(token))
            .take(KEYWORDS_IN_TEXT)
            .collect();
        let top_missing: Vec<&str> = missing_keywords
            .iter()
            .take(KEYWORDS_IN_TEXT)
            .map(String::as_str)
            .collect();

        let overall = format!(
            "Your resume has a {score}% match with the job description.\n\n\
             Key observations:\n\
             - Resume word count: {}\n\
             - Job description word count: {}\n\
             - Common keywords: {}",
            resume.total(),
            job.total(),
            join_or_none(&common),
        );

        let suggestions = format!(
            "Improvement suggestions:\n\
             - Add missing keywords: {}\n\
             - Ensure your resume highlights relevant experience\n\
             - Use industry-specific terminology from the job description\n\
             - Quantify achievements where possible",
            join_or_none(&top_missing),
        );

        let action_items = "Immediate actions:\n\
             - Review and incorporate missing keywords\n\
             - Align resume language with job description\n\
             - Highlight relevant skills and experience\n\
             - Consider adding specific examples that match job requirements"
            .to_string();

        Feedback {
            overall,
            suggestions,
            action_items,
            missing_keywords,
        }
    }
}

#[async_trait]
impl FeedbackAnalyst for KeywordAnalyst {
    fn label(&self) -> &str {
        "Keyword"
    }

    async fn analyze(&self, request: &MatchRequest, score: u32) -> Result<Feedback, UpstreamError> {
        Ok(self.feedback(request, score))
    }
}

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
