//! The normalized response envelope returned by every orchestrator.

use serde::{Deserialize, Serialize};

/// Token usage reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Prompt plus completion
    pub total_tokens: u32,
}

impl Usage {
    /// Build usage from prompt and completion counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Response envelope.
///
/// Exactly one of `content` or `error` is meaningful. On failure `content`
/// holds `T::default()` so callers never need to null-check, and `cached` is
/// always false.
///
/// # Examples
///
/// ```
/// use galley_core::AiResponse;
///
/// let failed: AiResponse<String> = AiResponse::failure("AI features are disabled");
/// assert!(failed.is_error());
/// assert!(failed.content.is_empty());
/// assert!(!failed.cached);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiResponse<T> {
    /// Generated content, or `T::default()` on error
    pub content: T,
    /// Token usage when the provider reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Served from the response cache
    #[serde(default)]
    pub cached: bool,
    /// Failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> AiResponse<T> {
    /// Successful provider response.
    pub fn success(content: T, usage: Option<Usage>) -> Self {
        Self {
            content,
            usage,
            cached: false,
            error: None,
        }
    }

    /// Response served from the cache.
    pub fn from_cache(content: T) -> Self {
        Self {
            content,
            usage: None,
            cached: true,
            error: None,
        }
    }

    /// True when `error` is populated.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// True when `content` is meaningful.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl<T: Default> AiResponse<T> {
    /// Failed response carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            content: T::default(),
            usage: None,
            cached: false,
            error: Some(message.into()),
        }
    }
}
