use std::time::Duration;

use crate::error::BillingError;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub publishable_key: Option<String>,
    pub api_base: String,
    /// Price of one report in the smallest currency unit.
    pub price_cents: u64,
    pub currency: String,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            publishable_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            price_cents: 1999,
            currency: "usd".to_string(),
        }
    }
}

/// Stripe REST client. Constructing one never fails for a missing key;
/// calls return [`BillingError::NotConfigured`] instead, so the rest of
/// the service keeps working without payments.
#[derive(Debug, Clone)]
pub struct StripeClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Result<Self, BillingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| BillingError::Request(e.to_string()))?;

        Ok(Self {
            http,
            config: StripeConfig {
                api_base: config.api_base.trim_end_matches('/').to_string(),
                ..config
            },
        })
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    pub(crate) fn secret_key(&self) -> Result<&str, BillingError> {
        self.config
            .secret_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(BillingError::NotConfigured)
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base, path.trim_start_matches('/'))
    }
}
