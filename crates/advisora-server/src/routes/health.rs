use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Billing must be reachable for the service to be healthy. The model check
/// only adds detail.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let timestamp = jiff::Timestamp::now().to_string();

    if let Err(e) = state.payments.check_account().await {
        tracing::warn!(error = %e, "health check failed");
        let report = HealthReport {
            status: "unhealthy",
            timestamp,
            stripe: None,
            openai: None,
            error: Some(e.to_string()),
        };
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(report)).into_response();
    }

    let openai = state.generator.model_status().await.describe();
    Json(HealthReport {
        status: "healthy",
        timestamp,
        stripe: Some("ok"),
        openai: Some(openai),
        error: None,
    })
    .into_response()
}
