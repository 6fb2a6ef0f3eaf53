use serde::{Deserialize, Serialize};

/// Areas of the business the report should concentrate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusArea {
    Strategy,
    Operations,
    Marketing,
    Customer,
}

impl FocusArea {
    pub fn label(self) -> &'static str {
        match self {
            FocusArea::Strategy => "Business Strategy",
            FocusArea::Operations => "Operations Optimization",
            FocusArea::Marketing => "Marketing & Sales",
            FocusArea::Customer => "Customer Experience",
        }
    }
}

/// Prompt wording used when no focus area was selected.
pub const GENERAL_FOCUS: &str = "General AI Adoption";
