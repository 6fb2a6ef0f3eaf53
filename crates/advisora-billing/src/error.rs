use thiserror::Error;

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("payments are not configured (STRIPE_SECRET_KEY is not set)")]
    NotConfigured,

    #[error("invalid checkout session id: {0}")]
    InvalidSessionId(String),

    #[error("Stripe returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Stripe request failed: {0}")]
    Request(String),

    #[error("Stripe response parsing failed: {0}")]
    ResponseParse(String),
}

impl From<reqwest::Error> for BillingError {
    fn from(e: reqwest::Error) -> Self {
        BillingError::Request(e.to_string())
    }
}
