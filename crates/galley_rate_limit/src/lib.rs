//! Rate limiting and error recovery.
//!
//! This crate provides the two admission/recovery primitives every Galley
//! orchestrator composes:
//!
//! - [`FixedWindowLimiter`] - per-identifier fixed-window request counting
//! - [`retry_with_backoff`] - bounded retries with linearly growing delays,
//!   gated by a caller-supplied retryability predicate

mod config;
mod error;
mod limiter;
mod retry;

pub use config::{RateLimitConfig, RetryPolicy};
pub use error::{RateLimitError, RateLimitErrorKind};
pub use limiter::{FixedWindowLimiter, RateLimitWindow};
pub use retry::retry_with_backoff;
