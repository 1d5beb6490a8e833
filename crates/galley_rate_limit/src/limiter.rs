//! Fixed-window request limiter keyed by caller identifier.
//!
//! Each identifier owns one window. A request arriving more than the window
//! length after the window opened starts a fresh window with a count of one;
//! otherwise it is admitted only while the count is below the limit. Because
//! windows are fixed rather than sliding, a burst straddling a boundary can
//! admit close to twice the limit in quick succession.

use crate::RateLimitConfig;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Counter state for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitWindow {
    /// Requests admitted in the current window
    pub count: u32,
    /// When the current window opened
    pub window_start: Instant,
    /// Length of the window this entry was opened with
    pub window: Duration,
}

impl RateLimitWindow {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.window_start) > self.window
    }
}

/// In-memory fixed-window limiter.
///
/// State lives only as long as the limiter; nothing is persisted.
///
/// # Example
///
/// ```
/// use galley_rate_limit::{FixedWindowLimiter, RateLimitConfig};
///
/// let limiter = FixedWindowLimiter::new(RateLimitConfig::new(2, 1000));
/// assert!(limiter.check_rate_limit("kitchen-1"));
/// assert!(limiter.check_rate_limit("kitchen-1"));
/// assert!(!limiter.check_rate_limit("kitchen-1"));
/// assert!(limiter.check_rate_limit("kitchen-2"));
/// ```
#[derive(Debug, Default)]
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, RateLimitWindow>>,
}

impl FixedWindowLimiter {
    /// Create a limiter whose default limit is `config`.
    pub fn new(config: RateLimitConfig) -> Self {
        debug!(
            max_requests = config.max_requests,
            window_ms = config.window_ms,
            "Creating fixed-window rate limiter"
        );
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Default limit applied by [`check_rate_limit`](Self::check_rate_limit).
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Admit or reject one request for `identifier` under the default limit.
    pub fn check_rate_limit(&self, identifier: &str) -> bool {
        self.check_at(identifier, &self.config, Instant::now())
    }

    /// Admit or reject one request for `identifier` under `config`.
    pub fn check_rate_limit_with(&self, identifier: &str, config: &RateLimitConfig) -> bool {
        self.check_at(identifier, config, Instant::now())
    }

    /// Admit or reject one request as if it arrived at `now`.
    ///
    /// Rejected requests leave the count untouched.
    #[instrument(skip(self, config, now), fields(max_requests = config.max_requests, window_ms = config.window_ms))]
    pub fn check_at(&self, identifier: &str, config: &RateLimitConfig, now: Instant) -> bool {
        let mut windows = self.lock();
        let window = config.window();

        match windows.get_mut(identifier) {
            Some(entry) if !entry.is_expired(now) => {
                if entry.count >= config.max_requests {
                    debug!(count = entry.count, "Rate limit exceeded");
                    return false;
                }
                entry.count += 1;
                debug!(count = entry.count, "Request admitted");
                true
            }
            _ => {
                windows.insert(
                    identifier.to_string(),
                    RateLimitWindow {
                        count: 1,
                        window_start: now,
                        window,
                    },
                );
                debug!("Opened new rate limit window");
                true
            }
        }
    }

    /// Forget the window for `identifier`.
    #[instrument(skip(self))]
    pub fn reset_rate_limit(&self, identifier: &str) {
        self.lock().remove(identifier);
    }

    /// Drop every window that has run past its length.
    pub fn cleanup_rate_limits(&self) {
        self.cleanup_at(Instant::now());
    }

    /// Drop windows expired as of `now`.
    pub fn cleanup_at(&self, now: Instant) {
        let mut windows = self.lock();
        let before = windows.len();
        windows.retain(|_, entry| !entry.is_expired(now));
        let removed = before - windows.len();
        if removed > 0 {
            debug!(removed, remaining = windows.len(), "Cleaned up expired rate limit windows");
        }
    }

    /// Snapshot of the window for `identifier`.
    pub fn window(&self, identifier: &str) -> Option<RateLimitWindow> {
        self.lock().get(identifier).copied()
    }

    /// Number of tracked identifiers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no identifier is tracked.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a window half-updated.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, RateLimitWindow>> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
