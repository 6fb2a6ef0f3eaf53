use axum::Form;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};

use advisora_billing::checkout::{CheckoutRequest, SESSION_ID_PLACEHOLDER};
use advisora_billing::metadata::{join_value, split_value};
use advisora_core::models::request::{ConsultationForm, ConsultationRequest};

use crate::consultation::generate_with_retries;
use crate::error::ApiError;
use crate::state::{AppState, PaidReport};

/// Checkout metadata key holding the serialized order form.
pub const FORM_DATA_KEY: &str = "form_data";

const PRODUCT_DESCRIPTION: &str = "Personalized AI consultancy report for your business";

#[derive(Serialize)]
pub struct CheckoutResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct ProcessingResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Deserialize)]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

/// Start a Stripe checkout for the submitted form. The form travels in the
/// session metadata and comes back in `/payment-success`.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ConsultationForm>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let request = ConsultationRequest::try_from(&form)?;
    let base_url = public_base_url(state.settings.public_url.as_deref(), &headers);
    let form_json = serde_json::to_string(&form)?;

    let checkout = CheckoutRequest {
        product_name: format!("AI Consultancy: {}", request.consultancy_type.title()),
        description: PRODUCT_DESCRIPTION.to_string(),
        unit_amount_cents: state.settings.price_cents,
        currency: state.settings.currency.clone(),
        success_url: format!("{base_url}/payment-return?session_id={SESSION_ID_PLACEHOLDER}"),
        cancel_url: format!("{base_url}/"),
        metadata: split_value(FORM_DATA_KEY, &form_json),
    };

    let session = state.payments.create_checkout_session(&checkout).await?;
    tracing::info!(
        session_id = %session.id,
        consultancy_type = %request.consultancy_type,
        "checkout session created"
    );

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

pub async fn payment_return(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Html<String>, ApiError> {
    Ok(Html(
        state
            .pages
            .payment_return(query.session_id.as_deref(), &state.settings)?,
    ))
}

/// Confirm payment and generate the ordered report.
///
/// Generation runs on its own task. If it outlasts the request budget the
/// client gets 202 and polls again; the task keeps going and later polls
/// pick up the finished report.
pub async fn payment_success(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Response, ApiError> {
    let session_id = query
        .session_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing session_id".to_string()))?;

    let session = state
        .payments
        .retrieve_checkout_session(&session_id)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Payment verification failed: {e}")))?;

    if !session.is_paid() {
        tracing::warn!(session_id = %session_id, status = ?session.payment_status, "checkout session not paid");
        return Err(ApiError::PaymentRequired("Payment has not been completed".to_string()));
    }

    let form_json = join_value(&session.metadata, FORM_DATA_KEY)
        .ok_or_else(|| ApiError::BadRequest("checkout session carries no order form".to_string()))?;
    let form: ConsultationForm = serde_json::from_str(&form_json)?;
    let request = ConsultationRequest::try_from(form)?;

    match state.paid_reports.begin(&session_id).await {
        Some(PaidReport::Ready(report)) => return Ok(Json(report).into_response()),
        Some(PaidReport::InProgress) => return Ok(processing()),
        None => {}
    }

    let task_state = state.clone();
    let task_session = session_id.clone();
    let task = tokio::spawn(async move {
        let result = generate_with_retries(&task_state, &request).await;
        match &result {
            Ok(report) => task_state.paid_reports.finish(&task_session, report.clone()).await,
            Err(_) => task_state.paid_reports.abandon(&task_session).await,
        }
        result
    });

    match tokio::time::timeout(state.settings.generation_budget, task).await {
        Ok(Ok(result)) => result.map(|report| Json(report).into_response()),
        Ok(Err(e)) => {
            state.paid_reports.abandon(&session_id).await;
            Err(ApiError::Internal(format!("generation task failed: {e}")))
        }
        Err(_) => {
            tracing::warn!(session_id = %session_id, "generation exceeded request budget, still processing");
            Ok(processing())
        }
    }
}

fn processing() -> Response {
    (
        StatusCode::ACCEPTED,
        Json(ProcessingResponse {
            status: "processing",
            message: "Your consultation report is still being generated. Please wait a moment and try again.",
        }),
    )
        .into_response()
}

/// Configured public URL, else `{scheme}://{Host}` from the request.
pub fn public_base_url(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(url) = configured {
        return url.trim_end_matches('/').to_string();
    }

    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    format!("{scheme}://{host}")
}
