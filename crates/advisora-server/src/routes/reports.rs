use axum::Form;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::FormRejection;

use advisora_core::models::request::{ConsultationForm, ConsultationRequest};

use crate::consultation::{GeneratedReport, generate_consultation};
use crate::error::ApiError;
use crate::state::AppState;

/// Generate a report directly from the order form. Only available when
/// payment is bypassed; otherwise the body is never looked at.
pub async fn generate_report(
    State(state): State<AppState>,
    form: Result<Form<ConsultationForm>, FormRejection>,
) -> Result<Json<GeneratedReport>, ApiError> {
    if !state.settings.bypass_payment {
        return Err(ApiError::PaymentRequired("Payment required".to_string()));
    }

    let Form(form) = form.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let request = ConsultationRequest::try_from(&form)?;
    let report = generate_consultation(&state, &request).await?;
    Ok(Json(report))
}
