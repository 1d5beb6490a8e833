//! Session-scoped key/value storage behind the response cache.

use galley_error::{CacheError, CacheErrorKind};
use std::collections::HashMap;

/// Default store quota, matching typical browser session storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// String key/value storage with a bounded capacity.
///
/// Implementations are owned by one session; dropping the store ends the
/// session and discards everything in it.
pub trait CacheStore: Send {
    /// Raw value for `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheErrorKind::QuotaExceeded`] when the write does not fit.
    fn set(&mut self, key: &str, value: String) -> Result<(), CacheError>;

    /// Remove `key` if present.
    fn remove(&mut self, key: &str);

    /// All keys currently stored.
    fn keys(&self) -> Vec<String>;

    /// Remove everything.
    fn clear(&mut self);
}

/// In-memory store with a byte quota over keys plus values.
#[derive(Debug, Clone)]
pub struct SessionStore {
    entries: HashMap<String, String>,
    quota_bytes: usize,
    used_bytes: usize,
}

impl SessionStore {
    /// Create an empty store holding at most `quota_bytes`.
    pub fn new(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes,
            used_bytes: 0,
        }
    }

    /// Bytes currently used.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Configured quota.
    pub fn quota_bytes(&self) -> usize {
        self.quota_bytes
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTA_BYTES)
    }
}

impl CacheStore for SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CacheError> {
        let replaced = self
            .entries
            .get(key)
            .map(|old| key.len() + old.len())
            .unwrap_or(0);
        let needed = key.len() + value.len();
        let available = self.quota_bytes - (self.used_bytes - replaced);

        if needed > available {
            return Err(CacheError::new(CacheErrorKind::QuotaExceeded { needed, available }));
        }

        self.used_bytes = self.used_bytes - replaced + needed;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        if let Some(old) = self.entries.remove(key) {
            self.used_bytes -= key.len() + old.len();
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.used_bytes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_counts_keys_and_values() {
        let mut store = SessionStore::new(10);
        store.set("ab", "cdef".to_string()).unwrap();
        assert_eq!(store.used_bytes(), 6);

        let err = store.set("gh", "ijk".to_string()).unwrap_err();
        assert!(err.is_quota_exceeded());

        store.set("ab", "cdefghij".to_string()).unwrap();
        assert_eq!(store.used_bytes(), 10);

        store.remove("ab");
        assert_eq!(store.used_bytes(), 0);
    }
}
