use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

/// Fixed-count retry with exponential backoff.
///
/// The delay before attempt `n + 1` is `initial_delay * 2^(n - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
        }
    }
}

/// The last error seen once every attempt has failed.
#[derive(Debug)]
pub struct RetryFailure<E> {
    pub attempts: u32,
    pub last: E,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    /// Backoff to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(16);
        self.initial_delay.saturating_mul(1 << doublings)
    }

    /// Run `operation` until it succeeds or the attempts run out.
    ///
    /// `operation` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, RetryFailure<E>>
    where
        E: std::fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        operation = label,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    info!(operation = label, attempt, max_attempts, "retrying");
                }
                Err(e) => {
                    warn!(operation = label, attempt, max_attempts, error = %e, "all attempts failed");
                    return Err(RetryFailure { attempts: attempt, last: e });
                }
            }
        }
    }
}
