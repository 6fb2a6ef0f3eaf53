//! Stripe Checkout sessions.
//!
//! A session is created with the order form serialized into its metadata.
//! After payment the browser comes back with the session ID, the session is
//! retrieved, and the form is read back out of the metadata. No order state
//! is kept on our side.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::StripeClient;
use crate::error::BillingError;

/// Placeholder Stripe substitutes with the real session ID in `success_url`.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// A one-item card checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub product_name: String,
    pub description: String,
    pub unit_amount_cents: u64,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        matches!(
            self.payment_status.as_deref(),
            Some("paid") | Some("no_payment_required")
        )
    }
}

/// Payment provider seam, so handlers can run against a fake in tests.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession, BillingError>;

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession, BillingError>;

    /// Cheap authenticated call used by the health check.
    async fn check_account(&self) -> Result<(), BillingError>;
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    message: String,
}

/// Stripe's bracketed form encoding for a checkout session.
fn checkout_form(request: &CheckoutRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("payment_method_types[0]".to_string(), "card".to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            request.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            request.product_name.clone(),
        ),
        (
            "line_items[0][price_data][product_data][description]".to_string(),
            request.description.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            request.unit_amount_cents.to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    for (key, value) in &request.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }

    form
}

fn validate_session_id(session_id: &str) -> Result<(), BillingError> {
    let valid = !session_id.is_empty()
        && session_id.len() <= 255
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BillingError::InvalidSessionId(session_id.to_string()))
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, BillingError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<StripeErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string());
        return Err(BillingError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| BillingError::ResponseParse(e.to_string()))
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession, BillingError> {
        let key = self.secret_key()?;

        let response = self
            .http
            .post(self.endpoint("checkout/sessions"))
            .bearer_auth(key)
            .form(&checkout_form(request))
            .send()
            .await?;

        let session: CheckoutSession = parse_response(response).await?;
        info!(session_id = %session.id, amount = request.unit_amount_cents, "checkout session created");
        Ok(session)
    }

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession, BillingError> {
        let key = self.secret_key()?;
        validate_session_id(session_id)?;

        let response = self
            .http
            .get(self.endpoint(&format!("checkout/sessions/{session_id}")))
            .bearer_auth(key)
            .send()
            .await?;

        parse_response(response).await
    }

    async fn check_account(&self) -> Result<(), BillingError> {
        let key = self.secret_key()?;

        let response = self
            .http
            .get(self.endpoint("account"))
            .bearer_auth(key)
            .send()
            .await?;

        parse_response::<serde_json::Value>(response).await.map(|_| ())
    }
}
