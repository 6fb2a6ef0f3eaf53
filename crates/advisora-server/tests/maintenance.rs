mod common;

use std::time::{Duration, Instant};

use axum::http::StatusCode;

use advisora_server::maintenance::{PurgeSummary, purge_expired, purge_expired_at};
use advisora_server::state::{PaidReport, Settings};

use common::{FakeGateway, FakeGenerator, VALID_FORM, body_json, test_app, test_settings};

#[tokio::test]
async fn purge_removes_expired_documents() {
    let settings = Settings {
        bypass_payment: true,
        ..test_settings()
    };
    let app = test_app(settings, FakeGenerator::ok(), FakeGateway::new()).await;

    let response = app.post_form("/generate-report", VALID_FORM).await;
    let url = body_json(response).await["download_url"].as_str().unwrap().to_string();

    let kept = purge_expired(&app.state, Duration::from_secs(3600)).await;
    assert_eq!(kept.documents, 0);
    assert_eq!(app.get(&url).await.status(), StatusCode::OK);

    let purged = purge_expired(&app.state, Duration::ZERO).await;
    assert_eq!(purged.documents, 1);
    assert_eq!(app.get(&url).await.status(), StatusCode::NOT_FOUND);
    assert!(app.state.documents.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn purge_drops_paid_sessions_and_idle_rate_limit_clients() {
    let app = test_app(test_settings(), FakeGenerator::ok(), FakeGateway::new()).await;
    assert!(app.state.paid_reports.begin("cs_test_old").await.is_none());
    app.state.rate_limiter.check("203.0.113.9").await.unwrap();
    let now = Instant::now();
    let retention = Duration::from_secs(3600);

    let kept = purge_expired_at(&app.state, retention, now).await;
    assert_eq!(kept, PurgeSummary::default());
    assert_eq!(app.state.rate_limiter.tracked_clients().await, 1);
    assert!(matches!(
        app.state.paid_reports.begin("cs_test_old").await,
        Some(PaidReport::InProgress)
    ));

    let purged = purge_expired_at(&app.state, retention, now + Duration::from_secs(25 * 3600)).await;
    assert_eq!(
        purged,
        PurgeSummary {
            documents: 0,
            paid_reports: 1,
            rate_limit_clients: 1,
        }
    );
    assert_eq!(app.state.rate_limiter.tracked_clients().await, 0);
    assert!(app.state.paid_reports.begin("cs_test_old").await.is_none());
}
