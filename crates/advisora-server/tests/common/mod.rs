#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, Response, header};
use tempfile::TempDir;
use tower::ServiceExt;

use advisora_billing::checkout::{CheckoutRequest, CheckoutSession, PaymentGateway};
use advisora_billing::error::BillingError;
use advisora_export::fonts::ReportFonts;
use advisora_export::pdf::ReportRenderer;
use advisora_llm::chat::Completion;
use advisora_llm::error::LlmError;
use advisora_llm::generator::{GenerationRequest, ModelStatus, TextGenerator};
use advisora_llm::retry::RetryPolicy;
use advisora_llm::tokens::TokenCount;
use advisora_server::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use advisora_server::router;
use advisora_server::state::{AppState, Settings};
use advisora_storage::documents::DocumentStore;

pub const REPORT_TEXT: &str = "\
AI Readiness Audit for Acme Ltd

# Executive Summary
Acme is well placed to adopt **machine learning** in customer support.

# Recommendations
- Automate ticket triage
- Pilot a forecasting model

Generated by AI Consultancy Assistant";

pub const VALID_FORM: &str = "consultancy_type=audit&business_name=Acme+Ltd&business_type=Retail\
&industry=Consumer+goods&business_size=Small+%281-50+employees%29&focus_customer=on&strictness=strict";

pub struct FakeGenerator {
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<GenerationRequest>>,
    pub failures_left: AtomicUsize,
    pub delay: Duration,
}

impl FakeGenerator {
    pub fn ok() -> Self {
        Self::failing(0)
    }

    /// Fails the first `failures` calls, then succeeds.
    pub fn failing(failures: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            failures_left: AtomicUsize::new(failures),
            delay: Duration::ZERO,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Completion, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(LlmError::Status {
                status: 503,
                message: "model overloaded".to_string(),
            });
        }

        Ok(Completion {
            text: REPORT_TEXT.to_string(),
            model: "gpt-4-turbo-preview".to_string(),
            usage: TokenCount {
                input: 420,
                output: 1337,
            },
        })
    }

    async fn model_status(&self) -> ModelStatus {
        ModelStatus::Missing("gpt-4-turbo-preview".to_string())
    }
}

pub struct FakeGateway {
    pub created: Mutex<Vec<CheckoutRequest>>,
    pub session: Mutex<Option<CheckoutSession>>,
    pub account_ok: bool,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            session: Mutex::new(None),
            account_ok: true,
        }
    }

    pub fn with_session(payment_status: &str, metadata: Vec<(String, String)>) -> Self {
        let gateway = Self::new();
        *gateway.session.lock().unwrap() = Some(CheckoutSession {
            id: "cs_test_123".to_string(),
            url: None,
            payment_status: Some(payment_status.to_string()),
            metadata: metadata.into_iter().collect::<BTreeMap<_, _>>(),
        });
        gateway
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession, BillingError> {
        self.created.lock().unwrap().push(request.clone());
        Ok(CheckoutSession {
            id: "cs_test_new".to_string(),
            url: Some("https://checkout.stripe.test/pay/cs_test_new".to_string()),
            payment_status: Some("unpaid".to_string()),
            metadata: request.metadata.iter().cloned().collect(),
        })
    }

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession, BillingError> {
        match self.session.lock().unwrap().clone() {
            Some(session) if session.id == session_id => Ok(session),
            _ => Err(BillingError::Api {
                status: 404,
                message: format!("No such checkout.session: '{session_id}'"),
            }),
        }
    }

    async fn check_account(&self) -> Result<(), BillingError> {
        if self.account_ok {
            Ok(())
        } else {
            Err(BillingError::Api {
                status: 401,
                message: "Invalid API Key provided".to_string(),
            })
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub generator: Arc<FakeGenerator>,
    pub gateway: Arc<FakeGateway>,
    pub dir: TempDir,
}

pub fn test_settings() -> Settings {
    Settings {
        payment_retry: RetryPolicy::new(2, Duration::from_millis(10)),
        ..Settings::default()
    }
}

pub async fn test_app(settings: Settings, generator: FakeGenerator, gateway: FakeGateway) -> TestApp {
    test_app_with_limits(settings, generator, gateway, RateLimitConfig::default()).await
}

pub async fn test_app_with_limits(
    settings: Settings,
    generator: FakeGenerator,
    gateway: FakeGateway,
    limits: RateLimitConfig,
) -> TestApp {
    let dir = TempDir::new().unwrap();
    let documents = DocumentStore::open(dir.path().join("downloads")).await.unwrap();
    let generator = Arc::new(generator);
    let gateway = Arc::new(gateway);
    let state = AppState::new(
        generator.clone(),
        gateway.clone(),
        documents,
        ReportRenderer::new(ReportFonts::discover(None).unwrap()),
        settings,
        RateLimiter::new(limits),
    )
    .unwrap();

    TestApp {
        router: router(state.clone()),
        state,
        generator,
        gateway,
        dir,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// POST a form as if it arrived over a connection from `peer`, with an
    /// optional `X-Forwarded-For` header.
    pub async fn post_form_from(
        &self,
        uri: &str,
        form: &str,
        peer: SocketAddr,
        forwarded_for: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::HOST, "advisora.test");
        if let Some(forwarded_for) = forwarded_for {
            builder = builder.header("x-forwarded-for", forwarded_for);
        }
        let mut request = builder.body(Body::from(form.to_string())).unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> Response<Body> {
        self.post(uri, "application/x-www-form-urlencoded", form).await
    }

    pub async fn post(&self, uri: &str, content_type: &str, body: &str) -> Response<Body> {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::HOST, "advisora.test")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
