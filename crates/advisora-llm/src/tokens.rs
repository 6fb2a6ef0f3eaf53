use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub input: u64,
    pub output: u64,
}

impl TokenCount {
    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

/// Pricing per million tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPricing {
    pub fn estimate_cost(&self, tokens: TokenCount) -> f64 {
        let input_cost = (tokens.input as f64 / 1_000_000.0) * self.input_per_million;
        let output_cost = (tokens.output as f64 / 1_000_000.0) * self.output_per_million;
        input_cost + output_cost
    }
}

/// Known model pricing (per million tokens).
/// These are approximate and only feed the cost figure in logs.
pub fn get_pricing(model_id: &str) -> Option<ModelPricing> {
    match model_id {
        id if id.starts_with("gpt-4o-mini") => Some(ModelPricing {
            input_per_million: 0.15,
            output_per_million: 0.60,
        }),
        id if id.starts_with("gpt-4o") => Some(ModelPricing {
            input_per_million: 2.50,
            output_per_million: 10.0,
        }),
        id if id.starts_with("gpt-4-turbo") || id.starts_with("gpt-4-1106") || id.starts_with("gpt-4-0125") => {
            Some(ModelPricing {
                input_per_million: 10.0,
                output_per_million: 30.0,
            })
        }
        id if id.starts_with("gpt-3.5-turbo") => Some(ModelPricing {
            input_per_million: 0.50,
            output_per_million: 1.50,
        }),
        _ => None,
    }
}
