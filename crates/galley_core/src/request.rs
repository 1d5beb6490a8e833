//! Provider-facing request and completion types.

use crate::{ChatMessage, ResponseFormat, Role, Usage};
use serde::{Deserialize, Serialize};

/// Image reference inside a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageUrl {
    /// HTTP(S) or data URL of the image
    pub url: String,
}

/// One part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text part
    Text {
        /// The text
        text: String,
    },
    /// Image part
    ImageUrl {
        /// The image reference
        image_url: ImageUrl,
    },
}

impl ContentPart {
    /// Text part.
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Image part referencing `url`.
    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Message content: plain text or a list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text
    Text(String),
    /// Multi-part content (vision)
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Message as sent to a chat provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderMessage {
    /// Sender role
    pub role: Role,
    /// Content
    pub content: MessageContent,
}

impl ProviderMessage {
    /// Text message.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Multi-part message.
    pub fn parts(role: Role, parts: Vec<ContentPart>) -> Self {
        Self {
            role,
            content: MessageContent::Parts(parts),
        }
    }
}

impl From<&ChatMessage> for ProviderMessage {
    fn from(message: &ChatMessage) -> Self {
        ProviderMessage::text(message.role, message.content.clone())
    }
}

/// Provider-neutral chat request.
///
/// `model: None` means the provider's configured default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation to send
    pub messages: Vec<ProviderMessage>,
    /// Model override
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Completion token ceiling
    pub max_tokens: Option<u32>,
    /// Output format
    pub response_format: ResponseFormat,
}

/// What a provider hands back on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion<T = String> {
    /// Generated content
    pub content: T,
    /// Token usage, when reported
    pub usage: Option<Usage>,
    /// Model that served the request
    pub model: String,
}

impl<T> Completion<T> {
    /// Build a completion.
    pub fn new(content: T, usage: Option<Usage>, model: impl Into<String>) -> Self {
        Self {
            content,
            usage,
            model: model.into(),
        }
    }
}

/// Prompt-only text generation request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextRequest {
    /// Prompt text
    pub prompt: String,
    /// Model override
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum new tokens
    pub max_tokens: Option<u32>,
}

/// Image generation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Image description
    pub prompt: String,
    /// Model override
    pub model: Option<String>,
}
