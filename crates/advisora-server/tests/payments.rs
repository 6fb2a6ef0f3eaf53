mod common;

use std::time::Duration;

use axum::http::StatusCode;

use advisora_billing::checkout::SESSION_ID_PLACEHOLDER;
use advisora_billing::metadata::{join_value, split_value};
use advisora_core::models::request::ConsultationForm;
use advisora_server::routes::payments::FORM_DATA_KEY;
use advisora_server::state::Settings;

use common::{FakeGateway, FakeGenerator, VALID_FORM, body_bytes, body_json, test_app, test_settings};

fn ordered_form() -> ConsultationForm {
    ConsultationForm {
        consultancy_type: Some("roadmap".to_string()),
        business_name: Some("Nordlicht Bakery".to_string()),
        business_type: Some("Bakery".to_string()),
        industry: Some("Food".to_string()),
        business_size: Some("Small (1-50 employees)".to_string()),
        focus_operations: Some("on".to_string()),
        additional_instructions: Some("Keep it practical.".to_string()),
        ..ConsultationForm::default()
    }
}

fn paid_gateway(status: &str) -> FakeGateway {
    let json = serde_json::to_string(&ordered_form()).unwrap();
    FakeGateway::with_session(status, split_value(FORM_DATA_KEY, &json))
}

#[tokio::test]
async fn checkout_session_carries_form_and_price() {
    let app = test_app(test_settings(), FakeGenerator::ok(), FakeGateway::new()).await;

    let response = app.post_form("/create-checkout-session", VALID_FORM).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["sessionId"], "cs_test_new");
    assert_eq!(json["url"], "https://checkout.stripe.test/pay/cs_test_new");

    let created = app.gateway.created.lock().unwrap();
    let checkout = &created[0];
    assert_eq!(checkout.product_name, "AI Consultancy: AI Readiness Audit");
    assert_eq!(checkout.unit_amount_cents, 1999);
    assert_eq!(checkout.currency, "usd");
    assert_eq!(
        checkout.success_url,
        format!("http://advisora.test/payment-return?session_id={SESSION_ID_PLACEHOLDER}")
    );
    assert_eq!(checkout.cancel_url, "http://advisora.test/");

    let metadata = checkout.metadata.iter().cloned().collect();
    let form: ConsultationForm = serde_json::from_str(&join_value(&metadata, FORM_DATA_KEY).unwrap()).unwrap();
    assert_eq!(form.business_name.as_deref(), Some("Acme Ltd"));
    assert_eq!(form.focus_customer.as_deref(), Some("on"));
    assert_eq!(form.strictness.as_deref(), Some("strict"));
}

#[tokio::test]
async fn checkout_uses_configured_public_url() {
    let settings = Settings {
        public_url: Some("https://reports.example.com".to_string()),
        ..test_settings()
    };
    let app = test_app(settings, FakeGenerator::ok(), FakeGateway::new()).await;

    let response = app.post_form("/create-checkout-session", VALID_FORM).await;
    assert_eq!(response.status(), StatusCode::OK);

    let created = app.gateway.created.lock().unwrap();
    assert!(created[0].success_url.starts_with("https://reports.example.com/payment-return?"));
    assert_eq!(created[0].cancel_url, "https://reports.example.com/");
}

#[tokio::test]
async fn checkout_rejects_invalid_form_before_calling_stripe() {
    let app = test_app(test_settings(), FakeGenerator::ok(), FakeGateway::new()).await;

    let response = app.post_form("/create-checkout-session", "consultancy_type=audit").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.gateway.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn paid_session_generates_report_once() {
    let app = test_app(test_settings(), FakeGenerator::ok(), paid_gateway("paid")).await;

    let first = app.get("/payment-success?session_id=cs_test_123").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    let url = first["download_url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/download/roadmap_"));

    let again = body_json(app.get("/payment-success?session_id=cs_test_123").await).await;
    assert_eq!(again["download_url"], url.as_str());
    assert_eq!(app.generator.calls(), 1);

    let requests = app.generator.requests.lock().unwrap();
    assert!(requests[0].user_prompt.contains("Nordlicht Bakery"));
    assert!(requests[0].user_prompt.contains("Keep it practical."));
    assert_eq!(requests[0].temperature, Some(0.7));
}

#[tokio::test]
async fn unpaid_session_is_refused() {
    let app = test_app(test_settings(), FakeGenerator::ok(), paid_gateway("unpaid")).await;

    let response = app.get("/payment-success?session_id=cs_test_123").await;

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(app.generator.calls(), 0);
}

#[tokio::test]
async fn unknown_session_fails_verification() {
    let app = test_app(test_settings(), FakeGenerator::ok(), paid_gateway("paid")).await;

    let response = app.get("/payment-success?session_id=cs_test_other").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Payment verification failed:"), "{error}");
}

#[tokio::test]
async fn missing_session_id_is_bad_request() {
    let app = test_app(test_settings(), FakeGenerator::ok(), paid_gateway("paid")).await;

    let response = app.get("/payment-success").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn paid_generation_retries_once_after_failure() {
    let app = test_app(test_settings(), FakeGenerator::failing(1), paid_gateway("paid")).await;

    let response = app.get("/payment-success?session_id=cs_test_123").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.generator.calls(), 2);
}

#[tokio::test]
async fn paid_generation_gives_up_after_two_attempts() {
    let app = test_app(test_settings(), FakeGenerator::failing(5), paid_gateway("paid")).await;

    let response = app.get("/payment-success?session_id=cs_test_123").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Consultation generation failed after 2 attempts:"), "{error}");
    assert_eq!(app.generator.calls(), 2);

    // A later poll starts over instead of reporting the failed run as in progress.
    let retry = app.get("/payment-success?session_id=cs_test_123").await;
    assert_eq!(retry.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.generator.calls(), 4);
}

#[tokio::test]
async fn slow_generation_returns_processing_then_finishes() {
    let settings = Settings {
        generation_budget: Duration::from_millis(50),
        ..test_settings()
    };
    let app = test_app(settings, FakeGenerator::slow(Duration::from_millis(300)), paid_gateway("paid")).await;

    let response = app.get("/payment-success?session_id=cs_test_123").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["status"], "processing");

    let polled = app.get("/payment-success?session_id=cs_test_123").await;
    assert_eq!(polled.status(), StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(800)).await;
    let done = app.get("/payment-success?session_id=cs_test_123").await;
    assert_eq!(done.status(), StatusCode::OK);
    assert!(body_json(done).await["download_url"].as_str().is_some());
    assert_eq!(app.generator.calls(), 1);
}

#[tokio::test]
async fn payment_return_page_escapes_session_id() {
    let app = test_app(test_settings(), FakeGenerator::ok(), FakeGateway::new()).await;

    let response = app.get("/payment-return?session_id=%3Cscript%3E").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("data-session-id=\"<script>\""));
}
