//! Retry with exponential backoff and per-attempt timeouts
//!
//! Every network-issuing component goes through these two wrappers. They
//! compose: each retry attempt runs under its own timeout window, and a
//! timed-out attempt counts as a failure for retry purposes.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::error::FetchError;

/// Retries an async operation with exponential backoff
///
/// Sleeps `base_delay * 2^attempt_index` between attempts, up to
/// `max_attempts` total attempts; after the last attempt fails, the last
/// error is returned to the caller.
///
/// # Arguments
/// * `op` - Zero-argument factory producing a fresh attempt future
/// * `max_attempts` - Total attempts, including the first
/// * `base_delay` - Backoff before the first retry
pub async fn with_retry<T, E, F, Fut>(
    mut op: F,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut delay = base_delay;
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= max_attempts {
                    return Err(error);
                }

                tracing::warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    error = %error,
                    "Attempt failed, backing off"
                );

                sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
        }
    }
}

/// Runs a future under a hard timeout, cancelling it on expiry
///
/// Cancellation is scoped to this one call; sibling calls keep running.
pub async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn returns_success_after_transient_failures() {
        let attempts = AtomicU32::new(0);

        let result = with_retry(
            || async {
                let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err("transient".to_string())
                } else {
                    Ok(42)
                }
            },
            3,
            Duration::from_millis(100),
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts_and_returns_last_error() {
        let attempts = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), String> = with_retry(
            || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err("always".to_string())
            },
            3,
            Duration::from_millis(100),
        )
        .await;

        assert_eq!(result, Err("always".to_string()));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // 100ms after the first failure, 200ms after the second
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_never_sleeps() {
        let start = Instant::now();

        let result: Result<(), String> =
            with_retry(|| async { Err("nope".to_string()) }, 1, Duration::from_millis(100)).await;

        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_cancels_slow_call() {
        let result: Result<(), FetchError> = with_timeout(Duration::from_millis(50), async {
            sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(FetchError::Timeout)));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_passes_through_fast_call() {
        let result = with_timeout(Duration::from_millis(50), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
