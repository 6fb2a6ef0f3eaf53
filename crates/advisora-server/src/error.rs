use std::time::Duration;

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use advisora_billing::error::BillingError;
use advisora_core::error::CoreError;
use advisora_export::error::ExportError;
use advisora_llm::error::LlmError;
use advisora_storage::error::StorageError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    PaymentRequired(String),
    TooManyRequests { retry_after: Duration },
    /// Upstream generation or PDF rendering failed. The message is shown to
    /// the user.
    Generation(String),
    Internal(String),
}

impl ApiError {
    fn generation(e: impl std::fmt::Display) -> Self {
        ApiError::Generation(format!("Failed to generate report: {e}"))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, retry_after) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::PaymentRequired(msg) => (StatusCode::PAYMENT_REQUIRED, msg, None),
            ApiError::TooManyRequests { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded".to_string(),
                Some(retry_after),
            ),
            ApiError::Generation(msg) => {
                tracing::error!("generation failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string(), None)
            }
        };

        let mut response = (status, Json(ErrorBody { error: message })).into_response();
        if let Some(retry_after) = retry_after {
            // Round up so clients never retry a moment too early.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
        }
        response
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::PromptRender(_) => ApiError::Internal(e.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { name } => ApiError::NotFound(format!("document not found: {name}")),
            StorageError::InvalidName { name } => ApiError::BadRequest(format!("invalid filename: {name}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(e: BillingError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<LlmError> for ApiError {
    fn from(e: LlmError) -> Self {
        ApiError::generation(e)
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        ApiError::generation(e)
    }
}

impl From<tera::Error> for ApiError {
    fn from(e: tera::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::PaymentRequired(msg)
            | ApiError::Generation(msg)
            | ApiError::Internal(msg) => f.write_str(msg),
            ApiError::TooManyRequests { retry_after } => {
                write!(f, "rate limit exceeded, retry after {}s", retry_after.as_secs())
            }
        }
    }
}
