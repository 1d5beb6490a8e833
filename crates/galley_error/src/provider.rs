//! AI provider errors.
//!
//! The `Display` text of each kind is what the classifier inspects, so the
//! wording deliberately carries status codes and keywords (`429`, `timed out`,
//! `Network`) rather than provider-specific phrasing.

/// Provider-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// No credentials configured for the provider
    #[display("{} API key not configured", _0)]
    MissingApiKey(String),

    /// The request never reached the provider or the connection dropped
    #[display("Network request failed: {}", _0)]
    Network(String),

    /// The provider did not answer in time
    #[display("Request timed out: {}", _0)]
    Timeout(String),

    /// Non-success HTTP status from the provider
    #[display("HTTP {} {}: {}", status, reason, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        reason: String,
        /// Response body or provider error message
        message: String,
    },

    /// Response body did not match the expected shape
    #[display("Failed to parse provider response: {}", _0)]
    Parse(String),

    /// Provider answered successfully but produced no content
    #[display("Provider returned an empty response")]
    EmptyResponse,

    /// Request body could not be assembled
    #[display("Failed to build provider request: {}", _0)]
    Builder(String),

    /// Image bytes or encoding could not be normalized into a data URL
    #[display("Invalid image payload: {}", _0)]
    InvalidImage(String),

    /// Model is still loading on the inference server
    #[display("Model is loading, estimated {} seconds", estimated_secs)]
    ModelLoading {
        /// Server-suggested wait before retrying
        estimated_secs: u64,
    },

    /// Both image vendors failed for the same prompt
    #[display("All image vendors failed (primary: {}; fallback: {})", primary, fallback)]
    AllVendorsFailed {
        /// Failure reported by the primary vendor
        primary: String,
        /// Failure reported by the fallback vendor
        fallback: Box<ProviderErrorKind>,
    },
}

impl ProviderErrorKind {
    /// The failure that decides whether another attempt is worthwhile.
    ///
    /// When both image vendors fail, the next attempt starts over from the
    /// primary and then the fallback, so the fallback's failure decides.
    ///
    /// # Examples
    ///
    /// ```
    /// use galley_error::ProviderErrorKind;
    ///
    /// let kind = ProviderErrorKind::AllVendorsFailed {
    ///     primary: "OpenAI API key not configured".to_string(),
    ///     fallback: Box::new(ProviderErrorKind::EmptyResponse),
    /// };
    /// assert_eq!(kind.decisive(), &ProviderErrorKind::EmptyResponse);
    /// ```
    pub fn decisive(&self) -> &ProviderErrorKind {
        match self {
            ProviderErrorKind::AllVendorsFailed { fallback, .. } => fallback.decisive(),
            other => other,
        }
    }
}

/// Provider error with location tracking.
///
/// # Examples
///
/// ```
/// use galley_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::Api {
///     status: 429,
///     reason: "Too Many Requests".to_string(),
///     message: "slow down".to_string(),
/// });
/// assert!(err.kind.to_string().contains("429"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at {}:{}", kind, file, line)]
pub struct ProviderError {
    /// The specific error kind
    pub kind: ProviderErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new provider error.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Message without the source location, suitable for callers.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<ProviderErrorKind> for ProviderError {
    #[track_caller]
    fn from(kind: ProviderErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
