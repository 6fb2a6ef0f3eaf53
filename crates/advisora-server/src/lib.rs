//! HTTP surface for ordering, paying for and downloading consultation
//! reports.

pub mod config;
pub mod consultation;
pub mod error;
pub mod maintenance;
pub mod middleware;
pub mod pages;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(routes::index::index))
        .route("/payment-return", get(routes::payments::payment_return))
        // Ordering
        .route("/generate-report", post(routes::reports::generate_report))
        .route(
            "/create-checkout-session",
            post(routes::payments::create_checkout_session),
        )
        .route("/payment-success", get(routes::payments::payment_success))
        // Documents
        .route("/download/{filename}", get(routes::downloads::download))
        .route("/health", get(routes::health::health_check))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
