use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use eyre::WrapErr;
use tokio::sync::Mutex;

use advisora_billing::checkout::PaymentGateway;
use advisora_billing::client::{StripeClient, StripeConfig};
use advisora_export::fonts::ReportFonts;
use advisora_export::pdf::ReportRenderer;
use advisora_llm::chat::Completion;
use advisora_llm::client::OpenAiClient;
use advisora_llm::error::LlmError;
use advisora_llm::generator::{GenerationRequest, ModelStatus, TextGenerator};
use advisora_llm::retry::RetryPolicy;
use advisora_storage::documents::DocumentStore;

use crate::config::ServerConfig;
use crate::consultation::GeneratedReport;
use crate::middleware::rate_limit::RateLimiter;
use crate::pages::Pages;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub payments: Arc<dyn PaymentGateway>,
    pub documents: DocumentStore,
    pub renderer: Arc<ReportRenderer>,
    pub settings: Arc<Settings>,
    pub rate_limiter: Arc<RateLimiter>,
    pub pages: Arc<Pages>,
    pub paid_reports: Arc<PaidReports>,
}

/// The parts of [`ServerConfig`] that handlers read per request.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bypass_payment: bool,
    pub publishable_key: Option<String>,
    pub price_cents: u64,
    pub currency: String,
    pub public_url: Option<String>,
    /// Attempts and backoff for generation after a confirmed payment.
    pub payment_retry: RetryPolicy,
    /// Past this, `/payment-success` answers 202 instead of retrying.
    pub generation_budget: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        let stripe = StripeConfig::default();
        Self {
            bypass_payment: false,
            publishable_key: None,
            price_cents: stripe.price_cents,
            currency: stripe.currency,
            public_url: None,
            payment_retry: RetryPolicy::new(2, Duration::from_secs(1)),
            generation_budget: Duration::from_secs(25),
        }
    }
}

impl Settings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            bypass_payment: config.bypass_payment,
            publishable_key: config.stripe.publishable_key.clone(),
            price_cents: config.stripe.price_cents,
            currency: config.stripe.currency.clone(),
            public_url: config.public_url.clone(),
            ..Self::default()
        }
    }
}

impl AppState {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        payments: Arc<dyn PaymentGateway>,
        documents: DocumentStore,
        renderer: ReportRenderer,
        settings: Settings,
        rate_limiter: RateLimiter,
    ) -> eyre::Result<Self> {
        Ok(Self {
            generator,
            payments,
            documents,
            renderer: Arc::new(renderer),
            settings: Arc::new(settings),
            rate_limiter: Arc::new(rate_limiter),
            pages: Arc::new(Pages::new()?),
            paid_reports: Arc::new(PaidReports::default()),
        })
    }

    /// Wire the real OpenAI and Stripe clients from the startup config.
    pub async fn from_config(config: &ServerConfig) -> eyre::Result<Self> {
        let generator: Arc<dyn TextGenerator> = match OpenAiClient::new(config.llm.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::warn!(error = %e, "generative API unavailable");
                Arc::new(UnconfiguredGenerator(e.to_string()))
            }
        };
        let payments = Arc::new(StripeClient::new(config.stripe.clone())?);
        let documents = DocumentStore::open(&config.download_dir).await?;
        let fonts = ReportFonts::discover(config.font_dir.as_deref())
            .wrap_err("PDF export needs a TrueType sans family; install fonts-dejavu or set FONT_DIR")?;

        Self::new(
            generator,
            payments,
            documents,
            ReportRenderer::new(fonts),
            Settings::from_config(config),
            RateLimiter::new(config.rate_limit),
        )
    }
}

/// Stand-in used when no API key is configured, so the server can still
/// start and serve pages.
struct UnconfiguredGenerator(String);

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Completion, LlmError> {
        Err(LlmError::Config(self.0.clone()))
    }

    async fn model_status(&self) -> ModelStatus {
        ModelStatus::Error(self.0.clone())
    }
}

/// Outcome of generating the report for a paid checkout session.
#[derive(Debug, Clone)]
pub enum PaidReport {
    InProgress,
    Ready(GeneratedReport),
}

/// Reports generated for paid sessions, keyed by checkout session ID.
///
/// The return page polls `/payment-success`, so the same session is seen
/// many times. Only the first poll generates.
#[derive(Debug, Default)]
pub struct PaidReports {
    entries: Mutex<HashMap<String, (Instant, PaidReport)>>,
}

impl PaidReports {
    /// Current state for `session_id`. When the session is new it is marked
    /// in progress and `None` is returned, meaning the caller should generate.
    pub async fn begin(&self, session_id: &str) -> Option<PaidReport> {
        let mut entries = self.entries.lock().await;
        if let Some((_, report)) = entries.get(session_id) {
            return Some(report.clone());
        }
        entries.insert(session_id.to_string(), (Instant::now(), PaidReport::InProgress));
        None
    }

    pub async fn finish(&self, session_id: &str, report: GeneratedReport) {
        self.entries
            .lock()
            .await
            .insert(session_id.to_string(), (Instant::now(), PaidReport::Ready(report)));
    }

    /// Drop the in-progress marker after a failure so the next poll retries.
    pub async fn abandon(&self, session_id: &str) {
        self.entries.lock().await.remove(session_id);
    }

    pub async fn purge_older_than(&self, max_age: Duration, now: Instant) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, (created, _)| now.saturating_duration_since(*created) < max_age);
        before - entries.len()
    }
}
