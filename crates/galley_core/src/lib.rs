//! Core data types for the Galley AI orchestration layer.
//!
//! This crate provides the types shared by callers, orchestrators and provider
//! clients: chat messages, request options, the response envelope, and the
//! provider-facing request/completion pair.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod image;
mod message;
mod options;
mod request;
mod response;
mod role;

pub use image::{FoodImage, FoodImageSet, PlatingMethod};
pub use message::ChatMessage;
pub use options::{RequestOptions, ResponseFormat};
pub use request::{
    ChatRequest, Completion, ContentPart, ImageRequest, ImageUrl, MessageContent, ProviderMessage,
    TextRequest,
};
pub use response::{AiResponse, Usage};
pub use role::Role;
