use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// How conservative the generated report should be.
///
/// Lower strictness lets the model speculate; higher strictness keeps it to
/// established practice and lowers the sampling temperature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    Flexible,
    #[default]
    Balanced,
    Strict,
}

impl Strictness {
    pub const ALL: [Strictness; 3] = [Strictness::Flexible, Strictness::Balanced, Strictness::Strict];

    pub fn slug(self) -> &'static str {
        match self {
            Strictness::Flexible => "flexible",
            Strictness::Balanced => "balanced",
            Strictness::Strict => "strict",
        }
    }

    /// Sampling temperature sent to the generative API.
    pub fn temperature(self) -> f32 {
        match self {
            Strictness::Flexible => 1.0,
            Strictness::Balanced => 0.7,
            Strictness::Strict => 0.2,
        }
    }

    /// Extra instruction appended to the user prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Strictness::Flexible => {
                "Strictness: flexible. Creative and speculative ideas are welcome where they are clearly labelled as such."
            }
            Strictness::Balanced => {
                "Strictness: balanced. Prefer proven approaches, but mention promising emerging options."
            }
            Strictness::Strict => {
                "Strictness: strict. Recommend only well-established practices and do not invent figures, statistics, or case studies."
            }
        }
    }

    /// Parse an optional form value. Missing or blank means [`Strictness::Balanced`].
    pub fn from_form(value: Option<&str>) -> Result<Self, CoreError> {
        match value.map(str::trim) {
            None | Some("") => Ok(Strictness::default()),
            Some(v) => v.parse(),
        }
    }
}

impl FromStr for Strictness {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Strictness::ALL
            .into_iter()
            .find(|v| v.slug() == wanted)
            .ok_or_else(|| CoreError::InvalidStrictness(s.to_string()))
    }
}
