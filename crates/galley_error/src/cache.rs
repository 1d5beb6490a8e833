//! Response cache errors.

/// Kinds of cache storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CacheErrorKind {
    /// Writing would exceed the store's byte quota
    #[display("Storage quota exceeded: need {} bytes, {} available", needed, available)]
    QuotaExceeded {
        /// Bytes the write requires
        needed: usize,
        /// Bytes still free in the store
        available: usize,
    },
    /// Entry could not be serialized
    #[display("Failed to serialize cache entry: {}", _0)]
    Serialization(String),
}

/// Cache error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Cache Error: {} at line {} in {}", kind, line, file)]
pub struct CacheError {
    /// The kind of error that occurred
    pub kind: CacheErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CacheError {
    /// Create a new CacheError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CacheErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this error is a storage quota failure.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self.kind, CacheErrorKind::QuotaExceeded { .. })
    }
}
