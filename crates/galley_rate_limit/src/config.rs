//! Rate limit and retry parameters.

use crate::{RateLimitError, RateLimitErrorKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-window limit: at most `max_requests` per `window_ms`.
///
/// # Example
///
/// ```toml
/// [rate_limit]
/// max_requests = 50
/// window_ms = 3_600_000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Window length in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_max_requests() -> u32 {
    50
}

fn default_window_ms() -> u64 {
    3_600_000
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_ms: default_window_ms(),
        }
    }
}

impl RateLimitConfig {
    /// Create a config.
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self {
            max_requests,
            window_ms,
        }
    }

    /// Window length.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Rejects zero-sized limits.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_requests` or `window_ms` is zero.
    pub fn validate(&self) -> Result<(), RateLimitError> {
        if self.max_requests == 0 {
            return Err(RateLimitError::new(RateLimitErrorKind::Config(
                "max_requests must be at least 1".to_string(),
            )));
        }
        if self.window_ms == 0 {
            return Err(RateLimitError::new(RateLimitErrorKind::Config(
                "window_ms must be at least 1".to_string(),
            )));
        }
        Ok(())
    }
}

/// Retry ceiling and backoff base.
///
/// The delay before attempt `n + 1` is `base_delay_ms * n`.
///
/// # Examples
///
/// ```
/// use galley_rate_limit::RetryPolicy;
/// use std::time::Duration;
///
/// let delays: Vec<_> = RetryPolicy::default().delays().collect();
/// assert_eq!(delays, vec![Duration::from_millis(1000), Duration::from_millis(2000)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff base in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
        }
    }

    /// Single attempt, no retries.
    pub fn no_retry() -> Self {
        Self::new(1, 0)
    }

    /// Delays between consecutive attempts; one fewer than `max_attempts`.
    ///
    /// Saturates at `u64::MAX` milliseconds instead of overflowing.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let base = self.base_delay_ms;
        (1..self.max_attempts.max(1))
            .map(move |attempt| Duration::from_millis(base.saturating_mul(u64::from(attempt))))
    }

    /// Rejects a zero attempt ceiling.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_attempts` is zero.
    pub fn validate(&self) -> Result<(), RateLimitError> {
        if self.max_attempts == 0 {
            return Err(RateLimitError::new(RateLimitErrorKind::Config(
                "max_attempts must be at least 1".to_string(),
            )));
        }
        Ok(())
    }
}
