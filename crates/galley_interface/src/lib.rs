//! Trait definitions for Galley AI providers.
//!
//! Each capability has its own trait so orchestrators can be assembled from
//! any mix of real clients and test doubles. Providers share no code; they are
//! unified only by returning a [`Completion`](galley_core::Completion).

mod traits;

pub use traits::{ChatProvider, ImageProvider, TextProvider};
