//! Per-request options supplied by callers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output format requested from a chat provider.
///
/// Serializes to the chat-completions `response_format` object, so only
/// valid combinations can reach the wire.
///
/// # Examples
///
/// ```
/// use galley_core::ResponseFormat;
///
/// let json = serde_json::to_string(&ResponseFormat::JsonObject).unwrap();
/// assert_eq!(json, r#"{"type":"json_object"}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free-form text
    #[default]
    Text,
    /// A single JSON object
    JsonObject,
}

/// Caller options for one orchestrator call.
///
/// All fields are optional; the orchestrator fills defaults. The serialized
/// form feeds the cache key, so fields that must not partition the cache
/// (`timeout_ms`, `caller_id`) are skipped.
///
/// # Examples
///
/// ```
/// use galley_core::RequestOptions;
/// use std::time::Duration;
///
/// let options = RequestOptions::default()
///     .with_temperature(0.2)
///     .with_max_tokens(300)
///     .with_cache_ttl(Duration::from_secs(60));
///
/// assert!(options.use_cache());
/// assert_eq!(options.cache_ttl_or(Duration::ZERO), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    /// Model override
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum completion tokens
    pub max_tokens: Option<u32>,
    /// Whether to consult and populate the response cache (default true)
    pub use_cache: Option<bool>,
    /// Cache entry lifetime in milliseconds
    #[serde(rename = "cacheTTL")]
    pub cache_ttl_ms: Option<u64>,
    /// Requested output format
    #[serde(default)]
    pub response_format: ResponseFormat,
    /// Hard timeout per provider attempt, in milliseconds
    #[serde(skip)]
    pub timeout_ms: Option<u64>,
    /// Identifier the rate limiter counts against
    #[serde(skip)]
    pub caller_id: Option<String>,
}

impl RequestOptions {
    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token ceiling.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Enable or disable caching.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = Some(enabled);
        self
    }

    /// Set the cache entry lifetime.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_ms = Some(ttl.as_millis() as u64);
        self
    }

    /// Request a specific output format.
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    /// Abort each provider attempt after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Count requests against `caller_id` for rate limiting.
    pub fn with_caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }

    /// Whether caching applies (defaults to true).
    pub fn use_cache(&self) -> bool {
        self.use_cache.unwrap_or(true)
    }

    /// Cache lifetime, or `default` when unset.
    pub fn cache_ttl_or(&self, default: Duration) -> Duration {
        self.cache_ttl_ms
            .map(Duration::from_millis)
            .unwrap_or(default)
    }

    /// Per-attempt timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
