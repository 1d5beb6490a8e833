//! Content-addressed cache keys.

use serde::Serialize;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 32-bit rolling hash over the UTF-16 code units of `text`.
///
/// `h = h * 31 + unit` with wrapping signed 32-bit arithmetic, so keys stay
/// stable for payloads produced by other clients of the same session store.
pub fn rolling_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

fn to_base36(mut value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Deterministic cache key for `data` under `endpoint`.
///
/// The payload is JSON-serialized, hashed with [`rolling_hash`], and the
/// absolute value is base-36 encoded behind an `"<endpoint>_"` prefix.
/// Distinct payloads may collide; the cache tolerates that.
///
/// # Examples
///
/// ```
/// use galley_cache::generate_cache_key;
/// use serde_json::json;
///
/// let a = generate_cache_key("chat", &json!({"messages": ["hi"], "country": "GB"}));
/// let b = generate_cache_key("chat", &json!({"messages": ["hi"], "country": "GB"}));
/// assert_eq!(a, b);
/// assert!(a.starts_with("chat_"));
/// ```
pub fn generate_cache_key<T: Serialize + ?Sized>(endpoint: &str, data: &T) -> String {
    let serialized = serde_json::to_string(data).unwrap_or_default();
    let hash = rolling_hash(&serialized).unsigned_abs();
    format!("{}_{}", endpoint, to_base36(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_known_values() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("a"), 97);
        assert_eq!(rolling_hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn hash_wraps_instead_of_overflowing() {
        let long = "mise en place ".repeat(500);
        let _ = rolling_hash(&long);
    }

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(u32::MAX), "1z141z3");
    }
}
