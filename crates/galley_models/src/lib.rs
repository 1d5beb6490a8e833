//! AI provider clients for Galley.
//!
//! Every client implements one of the capability traits from
//! `galley_interface` and returns a `Completion`:
//!
//! - [`OpenAICompatibleClient`] - chat and vision over the chat-completions
//!   protocol (OpenAI, Groq, HuggingFace router)
//! - [`HuggingFaceTextClient`] - JSON-only text generation
//! - [`HuggingFaceImageClient`] and [`OpenAIImageClient`] - image
//!   generation, composed by [`FallbackImageClient`]
//!
//! Provider credentials and model choices come from [`AiSettings`].
//!
//! # Example
//!
//! ```no_run
//! use galley_core::{ChatRequest, ProviderMessage, Role};
//! use galley_interface::ChatProvider;
//! use galley_models::OpenAICompatibleClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAICompatibleClient::groq("gsk-...", "llama-3.1-8b-instant")?;
//! let request = ChatRequest {
//!     messages: vec![ProviderMessage::text(Role::User, "How long do I rest a brisket?")],
//!     ..Default::default()
//! };
//! let completion = client.complete(&request).await?;
//! println!("{}", completion.content);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod fallback;
mod http;
mod huggingface;
mod image_data;
mod metrics;
mod openai;
mod settings;

pub use fallback::FallbackImageClient;
pub use huggingface::{
    HUGGINGFACE_INFERENCE_URL, HuggingFaceImageClient, HuggingFaceTextClient,
    JSON_ONLY_INSTRUCTION, MAX_WARMUP_WAIT, strip_code_fences,
};
pub use image_data::{ImageMime, normalize_base64_image, normalize_image_bytes};
pub use metrics::LlmMetrics;
pub use openai::{
    DEFAULT_OPENAI_IMAGE_MODEL, GROQ_CHAT_URL, HUGGINGFACE_ROUTER_CHAT_URL, OPENAI_CHAT_URL,
    OPENAI_IMAGES_URL, OpenAICompatibleClient, OpenAIImageClient,
};
pub use settings::{
    AiSettings, DEFAULT_GROQ_MODEL, DEFAULT_HUGGINGFACE_IMAGE_MODEL, DEFAULT_HUGGINGFACE_TEXT_MODEL,
    DEFAULT_HUGGINGFACE_VISION_MODEL, DEFAULT_OPENAI_MODEL,
};
