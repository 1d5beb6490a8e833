//! Tests for response caching.

use galley_cache::{CacheStore, ResponseCache, SessionStore, generate_cache_key};
use galley_error::{CacheError, CacheErrorKind};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const NOW: i64 = 1_700_000_000_000;

#[test]
fn test_cache_insert_and_get() {
    let cache = ResponseCache::default();
    cache.set_at("chat_1", "Sear, then braise.", Duration::from_secs(60), NOW);

    assert_eq!(
        cache.get_at("chat_1", NOW + 1_000).as_deref(),
        Some("Sear, then braise.")
    );
}

#[test]
fn test_cache_miss() {
    let cache = ResponseCache::default();
    assert!(cache.get_at("chat_unknown", NOW).is_none());
}

#[test]
fn test_expired_entry_is_deleted_on_read() {
    let cache = ResponseCache::default();
    cache.set_at("chat_1", "stale", Duration::from_millis(500), NOW);

    // Age equal to ttl is still fresh.
    assert!(cache.get_at("chat_1", NOW + 500).is_some());

    assert!(cache.get_at("chat_1", NOW + 501).is_none());
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_overwrite_replaces_entry() {
    let cache = ResponseCache::default();
    cache.set_at("chat_1", "first", Duration::from_millis(100), NOW);
    cache.set_at("chat_1", "second", Duration::from_secs(60), NOW + 50);

    assert_eq!(cache.get_at("chat_1", NOW + 1_000).as_deref(), Some("second"));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_quota_failure_sweeps_expired_and_retries() {
    let cache = ResponseCache::with_quota(420);
    let filler = "x".repeat(120);

    cache.set_at("chat_old", &filler, Duration::from_millis(10), NOW);
    cache.set_at("chat_fresh", &filler, Duration::from_secs(60), NOW);
    assert_eq!(cache.len(), 2);

    // Does not fit until the expired entry is swept.
    cache.set_at("chat_new", &filler, Duration::from_secs(60), NOW + 100);

    assert!(cache.get_at("chat_old", NOW + 100).is_none());
    assert!(cache.get_at("chat_fresh", NOW + 100).is_some());
    assert!(cache.get_at("chat_new", NOW + 100).is_some());
}

#[test]
fn test_write_that_never_fits_is_dropped_silently() {
    let cache = ResponseCache::with_quota(64);
    cache.set_at("image_big", &"y".repeat(1024), Duration::from_secs(60), NOW);
    assert!(cache.get_at("image_big", NOW).is_none());
    assert!(cache.is_empty());
}

/// Store that rejects writes with a quota error a fixed number of times.
struct FlakyStore {
    inner: SessionStore,
    failures_left: Arc<Mutex<u32>>,
    attempts: Arc<Mutex<u32>>,
}

impl CacheStore for FlakyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CacheError> {
        *self.attempts.lock().unwrap() += 1;
        let mut failures = self.failures_left.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(CacheError::new(CacheErrorKind::QuotaExceeded {
                needed: value.len(),
                available: 0,
            }));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) {
        self.inner.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    fn clear(&mut self) {
        self.inner.clear()
    }
}

#[test]
fn test_quota_retry_happens_exactly_once() {
    let failures_left = Arc::new(Mutex::new(5));
    let attempts = Arc::new(Mutex::new(0));
    let cache = ResponseCache::new(FlakyStore {
        inner: SessionStore::default(),
        failures_left: failures_left.clone(),
        attempts: attempts.clone(),
    });

    cache.set_at("chat_1", "value", Duration::from_secs(60), NOW);

    assert_eq!(*attempts.lock().unwrap(), 2);
    assert!(cache.get_at("chat_1", NOW).is_none());

    *failures_left.lock().unwrap() = 1;
    cache.set_at("chat_2", "value", Duration::from_secs(60), NOW);
    assert_eq!(cache.get_at("chat_2", NOW).as_deref(), Some("value"));
}

#[test]
fn test_cleanup_expired() {
    let cache = ResponseCache::default();
    cache.set_at("a", "1", Duration::from_millis(10), NOW);
    cache.set_at("b", "2", Duration::from_secs(10), NOW);

    assert_eq!(cache.cleanup_expired_at(NOW + 100), 1);
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_keys_differ_by_payload_and_endpoint() {
    let payload = json!({"messages": [{"role": "user", "content": "hi"}], "countryCode": "US"});
    let other = json!({"messages": [{"role": "user", "content": "hi"}], "countryCode": "FR"});

    assert_eq!(
        generate_cache_key("chat", &payload),
        generate_cache_key("chat", &payload)
    );
    assert_ne!(
        generate_cache_key("chat", &payload),
        generate_cache_key("chat", &other)
    );
    assert_ne!(
        generate_cache_key("chat", &payload),
        generate_cache_key("vision", &payload)
    );
}
