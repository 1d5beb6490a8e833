//! Capability traits implemented by provider clients.

use async_trait::async_trait;
use galley_core::{ChatRequest, Completion, FoodImage, ImageRequest, TextRequest};
use galley_error::ProviderResult;

/// Chat-completions backend. Also serves vision requests, whose messages
/// carry multi-part content.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a chat request and return the first choice.
    async fn complete(&self, request: &ChatRequest) -> ProviderResult<Completion>;

    /// Provider name (e.g., "openai", "groq").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier.
    fn model_name(&self) -> &str;
}

/// Prompt-in, text-out backend.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate text for a prompt.
    async fn generate_text(&self, request: &TextRequest) -> ProviderResult<Completion>;

    /// Provider name.
    fn provider_name(&self) -> &'static str;

    /// Default model identifier.
    fn model_name(&self) -> &str;
}

/// Image generation backend.
///
/// Implementations return an already-normalized data URL.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate one image for the prompt.
    async fn generate_image(&self, request: &ImageRequest) -> ProviderResult<Completion<FoodImage>>;

    /// Provider name.
    fn provider_name(&self) -> &'static str;
}
