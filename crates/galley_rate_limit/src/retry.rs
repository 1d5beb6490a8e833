//! Bounded retry with linearly growing delays.

use crate::RetryPolicy;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

/// Run `operation` until it succeeds, fails permanently, or the policy's
/// attempt ceiling is reached.
///
/// `operation` receives the 1-based attempt number. An error for which
/// `is_retryable` returns false ends the loop immediately; otherwise the
/// next attempt waits `base_delay_ms * attempt` first. The last error is
/// returned when attempts run out.
///
/// # Example
///
/// ```
/// use galley_rate_limit::{RetryPolicy, retry_with_backoff};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let result: Result<u32, String> = retry_with_backoff(
///     &RetryPolicy::new(3, 0),
///     |_err: &String| true,
///     |attempt| async move {
///         if attempt < 3 { Err(format!("attempt {attempt} failed")) } else { Ok(attempt) }
///     },
/// )
/// .await;
/// assert_eq!(result, Ok(3));
/// # }
/// ```
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let attempts = AtomicU32::new(0);
    let attempts = &attempts;
    let is_retryable = &is_retryable;
    let max_attempts = policy.max_attempts.max(1);

    Retry::spawn(policy.delays(), || {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let pending = operation(attempt);
        async move {
            match pending.await {
                Ok(value) => {
                    debug!(attempt, "Attempt succeeded");
                    Ok(value)
                }
                Err(err) if is_retryable(&err) => {
                    warn!(attempt, max_attempts, error = %err, "Attempt failed with retryable error");
                    Err(RetryError::Transient {
                        err,
                        retry_after: None,
                    })
                }
                Err(err) => {
                    warn!(attempt, error = %err, "Attempt failed with permanent error");
                    Err(RetryError::Permanent(err))
                }
            }
        }
    })
    .await
}
