use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The kind of consultation document a customer can order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultancyType {
    Strategy,
    Implementation,
    Audit,
    Roadmap,
    Ethics,
    Training,
}

impl ConsultancyType {
    /// Every type, in the order the order form lists them.
    pub const ALL: [ConsultancyType; 6] = [
        ConsultancyType::Strategy,
        ConsultancyType::Implementation,
        ConsultancyType::Audit,
        ConsultancyType::Roadmap,
        ConsultancyType::Ethics,
        ConsultancyType::Training,
    ];

    /// Form value and filename prefix.
    pub fn slug(self) -> &'static str {
        match self {
            ConsultancyType::Strategy => "strategy",
            ConsultancyType::Implementation => "implementation",
            ConsultancyType::Audit => "audit",
            ConsultancyType::Roadmap => "roadmap",
            ConsultancyType::Ethics => "ethics",
            ConsultancyType::Training => "training",
        }
    }

    /// Human-readable document title.
    pub fn title(self) -> &'static str {
        match self {
            ConsultancyType::Strategy => "AI Business Strategy Consultation",
            ConsultancyType::Implementation => "AI Implementation Plan",
            ConsultancyType::Audit => "AI Readiness Audit",
            ConsultancyType::Roadmap => "AI Adoption Roadmap",
            ConsultancyType::Ethics => "AI Ethics Framework",
            ConsultancyType::Training => "AI Training Program",
        }
    }
}

impl fmt::Display for ConsultancyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ConsultancyType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConsultancyType::ALL
            .into_iter()
            .find(|t| t.slug() == wanted)
            .ok_or_else(|| CoreError::InvalidConsultancyType(s.to_string()))
    }
}
