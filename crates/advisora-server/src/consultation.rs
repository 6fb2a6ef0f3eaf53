//! The report pipeline: validated request → prompt → generated text → PDF →
//! stored document.

use jiff::Zoned;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use advisora_core::document_keys::{download_url, pdf_filename};
use advisora_core::models::consultancy::ConsultancyType;
use advisora_core::models::request::ConsultationRequest;
use advisora_core::prompt::{SYSTEM_PROMPT, build_user_prompt};
use advisora_export::pdf::ReportMeta;
use advisora_llm::generator::GenerationRequest;
use advisora_storage::error::StorageError;

use crate::error::ApiError;
use crate::state::AppState;

const STORE_ATTEMPTS: u32 = 3;

/// A stored report, as returned to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedReport {
    pub success: bool,
    pub download_url: String,
    pub filename: String,
}

impl GeneratedReport {
    fn stored(filename: String) -> Self {
        Self {
            success: true,
            download_url: download_url(&filename),
            filename,
        }
    }
}

pub async fn generate_consultation(
    state: &AppState,
    request: &ConsultationRequest,
) -> Result<GeneratedReport, ApiError> {
    let generation = GenerationRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt: build_user_prompt(request)?,
        temperature: Some(request.strictness.temperature()),
    };

    info!(
        consultancy_type = %request.consultancy_type,
        strictness = request.strictness.slug(),
        focus_areas = request.focus_areas.len(),
        "generating consultation"
    );

    let completion = state.generator.generate(&generation).await?;

    info!(
        model = %completion.model,
        total_tokens = completion.usage.total(),
        chars = completion.text.len(),
        "document text generated"
    );

    let meta = ReportMeta {
        title: request.consultancy_type.title().to_string(),
        business_name: request.business_name.clone(),
        date: Zoned::now().date(),
    };
    let text = completion.text;
    let renderer = state.renderer.clone();
    let pdf = tokio::task::spawn_blocking(move || renderer.render(&meta, &text))
        .await
        .map_err(|e| ApiError::Internal(format!("PDF rendering task failed: {e}")))??;

    let filename = store_report(state, request.consultancy_type, &pdf).await?;
    info!(filename = %filename, bytes = pdf.len(), "report stored");

    Ok(GeneratedReport::stored(filename))
}

/// Filenames carry a short random ID; on a collision a fresh one is drawn.
async fn store_report(state: &AppState, kind: ConsultancyType, pdf: &[u8]) -> Result<String, ApiError> {
    let mut attempt = 1;
    loop {
        let filename = pdf_filename(kind, Uuid::new_v4());
        match state.documents.put(&filename, pdf).await {
            Ok(()) => return Ok(filename),
            Err(StorageError::AlreadyExists { .. }) if attempt < STORE_ATTEMPTS => {
                warn!(filename = %filename, attempt, "report filename taken, drawing a new one");
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// [`generate_consultation`] under the paid-session retry policy.
pub async fn generate_with_retries(
    state: &AppState,
    request: &ConsultationRequest,
) -> Result<GeneratedReport, ApiError> {
    state
        .settings
        .payment_retry
        .run("generate_consultation", |_| generate_consultation(state, request))
        .await
        .map_err(|failure| match failure.last {
            ApiError::Generation(msg) => ApiError::Generation(format!(
                "Consultation generation failed after {} attempts: {msg}",
                failure.attempts
            )),
            other => other,
        })
}
