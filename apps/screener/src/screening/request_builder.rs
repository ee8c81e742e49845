use crate::llm_client::prompts::{INLINE_RESUME_MARKER, JSON_ONLY_INSTRUCTION};
use crate::screening::models::AnalysisMode;
use crate::screening::prompts::{
    ALIGNMENT_PROMPT_TEMPLATE, REVIEW_PROMPT_TEMPLATE, SCREENING_PROMPT_TEMPLATE,
};
use crate::screening::schema::SchemaDescriptor;

/// Prompt plus the schema the reply must conform to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub prompt: String,
    pub schema: SchemaDescriptor,
}

/// Selects the prompt and response schema for a mode.
///
/// Any non-empty job description, even whitespace, selects the alignment prompt.
pub fn build(mode: AnalysisMode, job_description: &str) -> AnalysisRequest {
    let (template, schema) = match mode {
        AnalysisMode::Single => (REVIEW_PROMPT_TEMPLATE, SchemaDescriptor::review()),
        AnalysisMode::Bulk if !job_description.is_empty() => {
            (ALIGNMENT_PROMPT_TEMPLATE, SchemaDescriptor::screening())
        }
        AnalysisMode::Bulk => (SCREENING_PROMPT_TEMPLATE, SchemaDescriptor::screening()),
    };

    let prompt = template
        .replace("{resume_marker}", INLINE_RESUME_MARKER)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_description}", job_description);

    AnalysisRequest { prompt, schema }
}
