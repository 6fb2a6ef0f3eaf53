use serde::{Deserialize, Serialize};

use crate::error::CoreError;

use super::consultancy::ConsultancyType;
use super::focus::FocusArea;
use super::strictness::Strictness;

const MAX_FIELD_CHARS: usize = 200;
const MAX_INSTRUCTIONS_CHARS: usize = 2000;

/// The order form exactly as the browser submits it.
///
/// Kept stringly-typed so it can round-trip through payment metadata
/// and be validated only once, right before generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationForm {
    #[serde(default)]
    pub consultancy_type: Option<String>,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub business_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_operations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_marketing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_customer: Option<String>,
    #[serde(default)]
    pub additional_instructions: Option<String>,
    #[serde(default)]
    pub strictness: Option<String>,
}

/// A validated consultation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub consultancy_type: ConsultancyType,
    pub business_name: String,
    pub business_type: String,
    pub industry: String,
    pub business_size: String,
    pub focus_areas: Vec<FocusArea>,
    pub additional_instructions: String,
    pub strictness: Strictness,
}

impl TryFrom<&ConsultationForm> for ConsultationRequest {
    type Error = CoreError;

    fn try_from(form: &ConsultationForm) -> Result<Self, Self::Error> {
        let consultancy_type: ConsultancyType = form
            .consultancy_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(CoreError::MissingField("consultancy_type"))?
            .parse()?;

        let focus_areas = [
            (&form.focus_strategy, FocusArea::Strategy),
            (&form.focus_operations, FocusArea::Operations),
            (&form.focus_marketing, FocusArea::Marketing),
            (&form.focus_customer, FocusArea::Customer),
        ]
        .into_iter()
        .filter(|(value, _)| is_checked(value))
        .map(|(_, area)| area)
        .collect();

        let additional_instructions = form
            .additional_instructions
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();
        if additional_instructions.chars().count() > MAX_INSTRUCTIONS_CHARS {
            return Err(CoreError::FieldTooLong {
                field: "additional_instructions",
                max: MAX_INSTRUCTIONS_CHARS,
            });
        }

        Ok(ConsultationRequest {
            consultancy_type,
            business_name: required(&form.business_name, "business_name")?,
            business_type: required(&form.business_type, "business_type")?,
            industry: required(&form.industry, "industry")?,
            business_size: required(&form.business_size, "business_size")?,
            focus_areas,
            additional_instructions,
            strictness: Strictness::from_form(form.strictness.as_deref())?,
        })
    }
}

impl TryFrom<ConsultationForm> for ConsultationRequest {
    type Error = CoreError;

    fn try_from(form: ConsultationForm) -> Result<Self, Self::Error> {
        ConsultationRequest::try_from(&form)
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, CoreError> {
    let trimmed = value.as_deref().unwrap_or_default().trim();
    if trimmed.is_empty() {
        return Err(CoreError::MissingField(field));
    }
    if trimmed.chars().count() > MAX_FIELD_CHARS {
        return Err(CoreError::FieldTooLong {
            field,
            max: MAX_FIELD_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

// HTML checkboxes send "on" (or any value) when ticked and nothing otherwise.
fn is_checked(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
