//! Response caching with TTL support.
//!
//! Responses are stored as serialized [`CacheEntry`] records in a
//! session-scoped [`CacheStore`]. Entries are lazily evicted on read once they
//! outlive their own TTL, and swept eagerly when a write hits the store's
//! quota.

#![warn(missing_docs)]

mod cache;
mod key;
mod store;

pub use cache::{CacheEntry, ResponseCache};
pub use key::{generate_cache_key, rolling_hash};
pub use store::{CacheStore, DEFAULT_QUOTA_BYTES, SessionStore};
