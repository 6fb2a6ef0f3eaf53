use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use advisora_llm::retry::RetryPolicy;

#[test]
fn delay_doubles_per_attempt() {
    let policy = RetryPolicy::new(3, Duration::from_secs(2));

    assert_eq!(policy.delay_after(1), Duration::from_secs(2));
    assert_eq!(policy.delay_after(2), Duration::from_secs(4));
    assert_eq!(policy.delay_after(3), Duration::from_secs(8));
}

#[test]
fn zero_attempts_is_clamped_to_one() {
    assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
}

#[tokio::test]
async fn succeeds_after_transient_failures() {
    let calls = Arc::new(AtomicU32::new(0));
    let policy = RetryPolicy::new(3, Duration::ZERO);

    let counter = calls.clone();
    let result: Result<u32, _> = policy
        .run("flaky", move |attempt| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if attempt < 3 { Err("not yet") } else { Ok(attempt) }
            }
        })
        .await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn reports_last_error_and_attempt_count() {
    let policy = RetryPolicy::new(2, Duration::ZERO);

    let failure = policy
        .run("always_fails", |attempt| async move {
            Err::<(), String>(format!("failure #{attempt}"))
        })
        .await
        .unwrap_err();

    assert_eq!(failure.attempts, 2);
    assert_eq!(failure.last, "failure #2");
}
