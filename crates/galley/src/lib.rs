//! Galley - AI request orchestration for restaurant operations.
//!
//! Galley puts one facade in front of several AI backends so the rest of a
//! restaurant application never talks to a provider directly. Every call runs
//! the same pipeline:
//!
//! - **Enablement**: a master switch plus per-capability credentials
//! - **Rate limiting**: fixed-window counting per caller and capability
//! - **Caching**: TTL entries in a quota-bounded session store
//! - **Retries**: linear backoff gated by the error classifier
//! - **Cost tracking**: a rolling ledger priced per model
//!
//! Failures never escape as `Err`; they come back in the envelope's `error`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use galley::{GalleyConfig, Orchestrator};
//! use galley_core::{ChatMessage, RequestOptions};
//! use galley_models::AiSettings;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = Orchestrator::from_settings(&AiSettings::from_env(), &GalleyConfig::load()?)?;
//!
//!     let response = orchestrator
//!         .generate_ai_response(
//!             &[ChatMessage::user("How should I hold risotto during service?")],
//!             "IT",
//!             &RequestOptions::default(),
//!         )
//!         .await;
//!
//!     match response.error {
//!         Some(error) => eprintln!("AI unavailable: {}", error),
//!         None => println!("{}", response.content),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry span export to stdout
//!
//! # Architecture
//!
//! - `galley_error` - Error types and the error classifier
//! - `galley_core` - Messages, options, the response envelope
//! - `galley_interface` - Provider traits
//! - `galley_rate_limit` - Fixed-window limiter and retry utility
//! - `galley_cache` - Response cache
//! - `galley_cost` - Price table and cost ledger
//! - `galley_models` - Provider clients
//!
//! This crate (`galley`) wires them together and re-exports the common types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod orchestrator;
mod plating;

#[cfg(feature = "observability")]
pub mod observability;

pub use config::{CacheSettings, GalleyConfig};
pub use context::kitchen_system_prompt;
pub use orchestrator::{
    Capability, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DISABLED_MESSAGE, Orchestrator,
    OrchestratorBuilder, RATE_LIMITED_MESSAGE,
};
pub use plating::{plating_direction, plating_prompt};

pub use galley_core::{
    AiResponse, ChatMessage, FoodImage, FoodImageSet, PlatingMethod, RequestOptions,
    ResponseFormat, Role, Usage,
};
pub use galley_cost::CostRecord;
pub use galley_error::{AiError, AiErrorType, GalleyError, GalleyResult};
pub use galley_models::AiSettings;
