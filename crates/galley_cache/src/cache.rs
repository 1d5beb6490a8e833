//! TTL response cache over a session store.

use crate::{CacheStore, SessionStore};
use chrono::Utc;
use derive_getters::Getters;
use galley_error::{CacheError, CacheErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Stored response with its creation time and lifetime.
///
/// Entries are never mutated; writing the same key replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CacheEntry {
    key: String,
    response: String,
    /// Creation time in milliseconds since the Unix epoch
    timestamp: i64,
    /// Lifetime in milliseconds
    ttl: u64,
}

impl CacheEntry {
    /// Create an entry stamped at `timestamp` (ms since epoch).
    pub fn new(key: impl Into<String>, response: impl Into<String>, timestamp: i64, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            response: response.into(),
            timestamp,
            ttl: ttl.as_millis() as u64,
        }
    }

    /// True once the entry's age exceeds its TTL.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        let age = now_ms.saturating_sub(self.timestamp);
        age > 0 && age as u64 > self.ttl
    }
}

/// Response cache keyed by [`generate_cache_key`](crate::generate_cache_key).
///
/// A failed write never surfaces to the caller: on a quota failure the cache
/// sweeps expired entries, retries once, and otherwise drops the write.
///
/// # Example
///
/// ```
/// use galley_cache::ResponseCache;
/// use std::time::Duration;
///
/// let cache = ResponseCache::default();
/// cache.set("chat_abc", "Rest it for an hour.", Duration::from_secs(60));
/// assert_eq!(cache.get("chat_abc").as_deref(), Some("Rest it for an hour."));
/// assert!(cache.get("chat_missing").is_none());
/// ```
pub struct ResponseCache {
    store: Mutex<Box<dyn CacheStore>>,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(SessionStore::default())
    }
}

impl ResponseCache {
    /// Wrap a store.
    pub fn new(store: impl CacheStore + 'static) -> Self {
        tracing::debug!("Creating new ResponseCache");
        Self {
            store: Mutex::new(Box::new(store)),
        }
    }

    /// In-memory session cache bounded by `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self::new(SessionStore::new(quota_bytes))
    }

    /// Cached response for `key`, if present and fresh.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, Utc::now().timestamp_millis())
    }

    /// Cached response for `key` as of `now_ms`.
    ///
    /// Expired or unreadable entries are deleted and reported as absent.
    #[tracing::instrument(skip(self, now_ms))]
    pub fn get_at(&self, key: &str, now_ms: i64) -> Option<String> {
        let mut store = self.lock();
        let raw = store.get(key)?;

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable cache entry, removing");
                store.remove(key);
                return None;
            }
        };

        if entry.is_expired_at(now_ms) {
            tracing::debug!("Cache entry expired, removing");
            store.remove(key);
            return None;
        }

        tracing::debug!("Cache hit");
        Some(entry.response)
    }

    /// Store `response` under `key` for `ttl`.
    pub fn set(&self, key: &str, response: &str, ttl: Duration) {
        self.set_at(key, response, ttl, Utc::now().timestamp_millis());
    }

    /// Store `response` under `key`, stamped at `now_ms`.
    #[tracing::instrument(skip(self, response, now_ms), fields(response_len = response.len(), ttl_ms = ttl.as_millis() as u64))]
    pub fn set_at(&self, key: &str, response: &str, ttl: Duration, now_ms: i64) {
        let entry = CacheEntry::new(key, response, now_ms, ttl);
        let serialized = match serde_json::to_string(&entry) {
            Ok(serialized) => serialized,
            Err(e) => {
                let err = CacheError::new(CacheErrorKind::Serialization(e.to_string()));
                tracing::warn!(error = %err, "Skipping cache write");
                return;
            }
        };

        let mut store = self.lock();
        match store.set(key, serialized.clone()) {
            Ok(()) => tracing::debug!("Inserted entry into cache"),
            Err(err) if err.is_quota_exceeded() => {
                let removed = sweep_expired(store.as_mut(), now_ms);
                tracing::debug!(removed, "Cache quota exceeded, swept expired entries");
                if let Err(err) = store.set(key, serialized) {
                    tracing::warn!(error = %err, "Cache write failed after sweep, giving up");
                }
            }
            Err(err) => tracing::warn!(error = %err, "Cache write failed"),
        }
    }

    /// Remove expired entries; returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(Utc::now().timestamp_millis())
    }

    /// Remove entries expired as of `now_ms`.
    pub fn cleanup_expired_at(&self, now_ms: i64) -> usize {
        let mut store = self.lock();
        let removed = sweep_expired(store.as_mut(), now_ms);
        if removed > 0 {
            tracing::info!(removed, "Cleaned up expired cache entries");
        }
        removed
    }

    /// Clear all cache entries.
    pub fn clear(&self) {
        self.lock().clear();
        tracing::info!("Cleared cache");
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.lock().keys().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn CacheStore>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Remove every expired or unreadable entry from `store`.
fn sweep_expired(store: &mut dyn CacheStore, now_ms: i64) -> usize {
    let stale: Vec<String> = store
        .keys()
        .into_iter()
        .filter(|key| {
            store
                .get(key)
                .and_then(|raw| serde_json::from_str::<CacheEntry>(&raw).ok())
                .is_none_or(|entry| entry.is_expired_at(now_ms))
        })
        .collect();

    for key in &stale {
        store.remove(key);
    }
    stale.len()
}
