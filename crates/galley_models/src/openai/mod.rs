//! Clients speaking OpenAI's HTTP protocols.

mod chat;
mod dto;
mod image;

pub use chat::{
    GROQ_CHAT_URL, HUGGINGFACE_ROUTER_CHAT_URL, OPENAI_CHAT_URL, OpenAICompatibleClient,
};
pub use image::{DEFAULT_OPENAI_IMAGE_MODEL, OPENAI_IMAGES_URL, OpenAIImageClient};
