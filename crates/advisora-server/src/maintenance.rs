//! Periodic cleanup of generated documents and in-memory bookkeeping.

use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::state::AppState;

pub const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeSummary {
    pub documents: usize,
    pub paid_reports: usize,
    pub rate_limit_clients: usize,
}

/// Remove documents and paid-session records older than `retention`, and
/// forget rate-limit clients whose windows have all expired.
pub async fn purge_expired(state: &AppState, retention: Duration) -> PurgeSummary {
    purge_expired_at(state, retention, Instant::now()).await
}

/// [`purge_expired`] with the in-memory records aged against `now`.
/// Documents are always aged by their modification time.
pub async fn purge_expired_at(state: &AppState, retention: Duration, now: Instant) -> PurgeSummary {
    let documents = match state.documents.purge_older_than(retention).await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!(error = %e, "document purge failed");
            0
        }
    };

    let summary = PurgeSummary {
        documents,
        paid_reports: state.paid_reports.purge_older_than(retention, now).await,
        rate_limit_clients: state.rate_limiter.prune(now).await,
    };
    tracing::info!(
        documents = summary.documents,
        paid_reports = summary.paid_reports,
        rate_limit_clients = summary.rate_limit_clients,
        "purged expired data"
    );
    summary
}

/// Run [`purge_expired`] every [`PURGE_INTERVAL`], starting immediately.
pub fn spawn_purge_task(state: AppState, retention: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            purge_expired(&state, retention).await;
        }
    })
}
