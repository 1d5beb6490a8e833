//! Normalized AI error taxonomy and the message classifier.
//!
//! Every provider failure, whatever its backend, is folded into one of six
//! [`AiErrorType`]s by inspecting its lower-cased message. The rule table is
//! ordered: the first rule with any matching needle wins, independent of where
//! the needle appears in the message.

use crate::ProviderErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Closed set of error kinds reported to orchestrator callers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AiErrorType {
    /// Credentials missing or rejected
    ApiKeyMissing,
    /// Provider throttled the request
    RateLimited,
    /// Provider did not answer in time
    Timeout,
    /// Transport failure before a response arrived
    NetworkError,
    /// Request was malformed; retrying cannot help
    InvalidRequest,
    /// Anything else
    Unknown,
}

impl AiErrorType {
    /// Whether errors of this type are worth another attempt.
    ///
    /// Missing credentials and malformed requests are terminal; everything
    /// else, including unrecognized failures, is retried.
    pub fn is_retryable(self) -> bool {
        !matches!(self, AiErrorType::ApiKeyMissing | AiErrorType::InvalidRequest)
    }
}

/// Ordered classification rules. Order is significant.
const RULES: &[(AiErrorType, &[&str])] = &[
    (
        AiErrorType::ApiKeyMissing,
        &["api key", "api_key", "apikey", "unauthorized", "authentication"],
    ),
    (AiErrorType::RateLimited, &["rate limit", "429"]),
    (AiErrorType::Timeout, &["timeout", "timed out"]),
    (AiErrorType::NetworkError, &["network", "fetch"]),
    (AiErrorType::InvalidRequest, &["invalid", "400"]),
];

/// A classified AI failure.
///
/// # Examples
///
/// ```
/// use galley_error::{AiErrorType, classify_message};
///
/// let err = classify_message("Rate limit exceeded (429)");
/// assert_eq!(err.error_type, AiErrorType::RateLimited);
/// assert!(err.retryable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "camelCase")]
#[display("{}: {}", error_type, message)]
pub struct AiError {
    /// Classified error kind
    #[serde(rename = "type")]
    pub error_type: AiErrorType,
    /// Caller-facing message
    pub message: String,
    /// Full diagnostic text of the original error, when it differs from `message`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Always equal to `error_type.is_retryable()`
    pub retryable: bool,
}

impl AiError {
    /// Build an error of a known type without running the classifier.
    pub fn new(error_type: AiErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            details: None,
            retryable: error_type.is_retryable(),
        }
    }

    /// Attach diagnostic details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Classify a bare message.
///
/// Total: any string, including an empty one, yields an [`AiError`].
pub fn classify_message(message: &str) -> AiError {
    let lowered = message.to_lowercase();
    let error_type = RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(error_type, _)| *error_type)
        .unwrap_or(AiErrorType::Unknown);
    AiError::new(error_type, message)
}

/// Classify any displayable error.
///
/// The `Display` text is both the classification input and the resulting
/// message; the `Debug` text is kept as details.
pub fn classify<E>(error: &E) -> AiError
where
    E: Display + std::fmt::Debug + ?Sized,
{
    classify_message(&error.to_string()).with_details(format!("{:?}", error))
}

/// Classify a provider failure.
///
/// The type and retryability come from [`ProviderErrorKind::decisive`]; the
/// message keeps the full text, so a two-vendor failure still names both.
///
/// # Examples
///
/// ```
/// use galley_error::{AiErrorType, ProviderErrorKind, classify_provider};
///
/// let kind = ProviderErrorKind::AllVendorsFailed {
///     primary: "HuggingFace API key not configured".to_string(),
///     fallback: Box::new(ProviderErrorKind::Network("connection reset".to_string())),
/// };
/// let err = classify_provider(&kind);
/// assert_eq!(err.error_type, AiErrorType::NetworkError);
/// assert!(err.message.contains("HuggingFace API key not configured"));
/// ```
pub fn classify_provider(kind: &ProviderErrorKind) -> AiError {
    let decided = classify(kind.decisive());
    AiError {
        message: kind.to_string(),
        details: Some(format!("{:?}", kind)),
        ..decided
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use galley_error::{AiError, AiErrorType, RetryableError};
///
/// let err = AiError::new(AiErrorType::Timeout, "Request timed out");
/// assert!(err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for AiError {
    fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl RetryableError for AiErrorType {
    fn is_retryable(&self) -> bool {
        AiErrorType::is_retryable(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn precedence_follows_rule_order_not_text_position() {
        let err = classify_message("invalid parameter: upstream timeout");
        assert_eq!(err.error_type, AiErrorType::Timeout);

        let err = classify_message("timeout while validating api key");
        assert_eq!(err.error_type, AiErrorType::ApiKeyMissing);
    }

    #[test]
    fn retryable_is_pure_function_of_type() {
        for error_type in AiErrorType::iter() {
            let err = AiError::new(error_type, "x");
            assert_eq!(err.retryable, error_type.is_retryable());
        }
        assert!(!AiErrorType::ApiKeyMissing.is_retryable());
        assert!(!AiErrorType::InvalidRequest.is_retryable());
        assert!(AiErrorType::Unknown.is_retryable());
    }

    #[test]
    fn empty_message_is_unknown() {
        let err = classify_message("");
        assert_eq!(err.error_type, AiErrorType::Unknown);
        assert!(err.retryable);
    }
}
