// Prompt text for the generative feedback step.
// Section labels here must match the ones `feedback::parse_sections` looks for.

pub const RESUME_ANALYSIS_LABEL: &str = "RESUME ANALYSIS:";
pub const DETAILED_SUGGESTIONS_LABEL: &str = "DETAILED SUGGESTIONS:";
pub const MISSING_KEYWORDS_LABEL: &str = "MISSING KEYWORDS:";
pub const ACTION_ITEMS_LABEL: &str = "ACTION ITEMS:";

/// Builds the feedback prompt for one resume / job description pair.
pub fn analysis_prompt(resume: &str, job_description: &str) -> String {
    format!(
        r#"Analyze this resume against the job description and provide comprehensive feedback.

Resume:
{resume}

Job Description:
{job_description}

Please provide a detailed analysis in the following format:

{RESUME_ANALYSIS_LABEL}
- Overall match quality: [Excellent/Good/Fair/Poor]
- Key strengths: [List 3-5 strengths]
- Areas for improvement: [List 3-5 specific improvements]

{DETAILED_SUGGESTIONS_LABEL}
- Content improvements: [Specific suggestions for resume content]
- Format improvements: [Suggestions for resume structure/layout]
- Skill highlighting: [How to better showcase relevant skills]

{MISSING_KEYWORDS_LABEL} [keyword1, keyword2, keyword3, ...]

{ACTION_ITEMS_LABEL}
- Immediate actions: [What to do right away]
- Long-term improvements: [What to work on over time]

Be specific, actionable, and professional in your feedback."#
    )
}
