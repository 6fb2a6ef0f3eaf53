//! Prompt construction for consultation reports.
//!
//! The user prompt is a Tera template rendered against the validated
//! [`ConsultationRequest`]. The template name has no `.html` suffix, so Tera
//! does not autoescape customer text.

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::CoreError;
use crate::models::focus::GENERAL_FOCUS;
use crate::models::request::ConsultationRequest;

pub const SYSTEM_PROMPT: &str = "You are an AI business consultant that creates professional, \
actionable reports to help businesses adopt AI technologies effectively.";

const USER_PROMPT_NAME: &str = "consultation_prompt";

const USER_PROMPT_TEMPLATE: &str = "\
Generate a comprehensive {{ title }} report for {{ business_name }}, a {{ business_size }} {{ business_type }} in the {{ industry }} industry.

Focus Areas: {{ focus_areas }}

Additional Instructions: {{ additional_instructions }}

{{ strictness }}

**Report Structure Guidelines:**
{% for section in sections -%}
{{ loop.index }}. {{ section }}
{% endfor %}
Format the report professionally with clear headings, bullet points for key recommendations, and data-driven insights. Use business-friendly language while maintaining technical accuracy.
";

/// Fixed report outline requested from the model.
pub const REPORT_SECTIONS: [&str; 8] = [
    "Executive Summary (1 paragraph)",
    "Current State Analysis",
    "Key Opportunities for AI Adoption",
    "Recommended AI Solutions",
    "Implementation Roadmap",
    "Risk Assessment",
    "ROI Projections",
    "Next Steps",
];

#[derive(Serialize)]
struct PromptContext<'a> {
    title: &'a str,
    business_name: &'a str,
    business_type: &'a str,
    industry: &'a str,
    business_size: &'a str,
    focus_areas: String,
    additional_instructions: &'a str,
    strictness: &'a str,
    sections: &'a [&'a str],
}

/// Render the user prompt for a consultation request.
pub fn build_user_prompt(request: &ConsultationRequest) -> Result<String, CoreError> {
    let focus_areas = if request.focus_areas.is_empty() {
        GENERAL_FOCUS.to_string()
    } else {
        request
            .focus_areas
            .iter()
            .map(|a| a.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let prompt_context = PromptContext {
        title: request.consultancy_type.title(),
        business_name: &request.business_name,
        business_type: &request.business_type,
        industry: &request.industry,
        business_size: &request.business_size,
        focus_areas,
        additional_instructions: &request.additional_instructions,
        strictness: request.strictness.instruction(),
        sections: &REPORT_SECTIONS,
    };

    let mut tera = Tera::default();
    tera.add_raw_template(USER_PROMPT_NAME, USER_PROMPT_TEMPLATE)?;

    let context = Context::from_serialize(&prompt_context)?;
    Ok(tera.render(USER_PROMPT_NAME, &context)?)
}
