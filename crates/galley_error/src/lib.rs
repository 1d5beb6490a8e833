//! Error types for the Galley AI orchestration layer.
//!
//! This crate provides the foundation error types used throughout the Galley workspace,
//! plus the classifier that folds any provider failure into the closed [`AiErrorType`]
//! taxonomy the orchestrators report to callers.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use galley_error::{ConfigError, GalleyResult};
//!
//! fn fetch_data() -> GalleyResult<String> {
//!     Err(ConfigError::new("OPENAI_API_KEY is empty"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod classify;
mod config;
mod error;
mod provider;

pub use cache::{CacheError, CacheErrorKind};
pub use classify::{
    AiError, AiErrorType, RetryableError, classify, classify_message, classify_provider,
};
pub use config::ConfigError;
pub use error::{GalleyError, GalleyErrorKind, GalleyResult};
pub use provider::{ProviderError, ProviderErrorKind, ProviderResult};
