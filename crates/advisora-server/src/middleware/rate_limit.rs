//! Per-client fixed-window request limits.
//!
//! Each client gets one counter per window (hourly and daily). A request is
//! admitted only when every window still has room, and then counts against
//! all of them.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::state::AppState;

const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Requests allowed per client. A limit of zero disables that window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub per_hour: u32,
    pub per_day: u32,
    /// Key clients on `X-Forwarded-For`. Only safe behind a proxy that
    /// overwrites the header.
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_hour: 50,
            per_day: 200,
            trust_forwarded_for: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    limits: Vec<(Duration, u32)>,
    trust_forwarded_for: bool,
    clients: Mutex<HashMap<String, Vec<Window>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let limits = [(HOUR, config.per_hour), (DAY, config.per_day)]
            .into_iter()
            .filter(|(_, limit)| *limit > 0)
            .collect();
        Self {
            limits,
            trust_forwarded_for: config.trust_forwarded_for,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request from `client`, or return how long until it would be
    /// admitted.
    pub async fn check(&self, client: &str) -> Result<(), Duration> {
        self.check_at(client, Instant::now()).await
    }

    pub async fn check_at(&self, client: &str, now: Instant) -> Result<(), Duration> {
        if self.limits.is_empty() {
            return Ok(());
        }

        let mut clients = self.clients.lock().await;
        let windows = clients.entry(client.to_string()).or_insert_with(|| {
            self.limits
                .iter()
                .map(|_| Window { started: now, count: 0 })
                .collect()
        });

        for (window, (length, _)) in windows.iter_mut().zip(&self.limits) {
            if now.saturating_duration_since(window.started) >= *length {
                *window = Window { started: now, count: 0 };
            }
        }

        let wait = windows
            .iter()
            .zip(&self.limits)
            .filter(|(window, (_, limit))| window.count >= *limit)
            .map(|(window, (length, _))| length.saturating_sub(now.saturating_duration_since(window.started)))
            .max();
        if let Some(wait) = wait {
            return Err(wait);
        }

        for window in windows.iter_mut() {
            window.count += 1;
        }
        Ok(())
    }

    /// Forget clients whose every window has expired.
    pub async fn prune(&self, now: Instant) -> usize {
        let mut clients = self.clients.lock().await;
        let before = clients.len();
        clients.retain(|_, windows| {
            windows
                .iter()
                .zip(&self.limits)
                .any(|(window, (length, _))| now.saturating_duration_since(window.started) < *length)
        });
        before - clients.len()
    }

    pub async fn tracked_clients(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub fn trusts_forwarded_for(&self) -> bool {
        self.trust_forwarded_for
    }
}

/// The peer address, or `"unknown"` without one. With `trust_forwarded_for`
/// the first `X-Forwarded-For` address wins over the peer.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded_for: bool) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .filter(|_| trust_forwarded_for)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(addr), _) => addr.to_string(),
        (None, Some(peer)) => peer.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}

/// Only order submissions and payment confirmation are metered. Page loads,
/// downloads and health checks are not.
fn is_metered(method: &Method, path: &str) -> bool {
    *method == Method::POST || path == "/payment-success"
}

pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if !is_metered(req.method(), req.uri().path()) {
        return next.run(req).await;
    }

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(req.headers(), peer, state.rate_limiter.trusts_forwarded_for());

    match state.rate_limiter.check(&client).await {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(client = %client, retry_after_secs = retry_after.as_secs(), "rate limit exceeded");
            ApiError::TooManyRequests { retry_after }.into_response()
        }
    }
}
