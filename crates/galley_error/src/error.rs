//! Top-level error wrapper types.

use crate::{CacheError, ConfigError, ProviderError};

/// This is the foundation error enum for the workspace.
///
/// # Examples
///
/// ```
/// use galley_error::{GalleyError, ProviderError, ProviderErrorKind};
///
/// let provider_err = ProviderError::new(ProviderErrorKind::EmptyResponse);
/// let err: GalleyError = provider_err.into();
/// assert!(format!("{}", err).contains("Provider Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum GalleyErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// AI provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Response cache error
    #[from(CacheError)]
    Cache(CacheError),
}

/// Galley error with kind discrimination.
///
/// # Examples
///
/// ```
/// use galley_error::{ConfigError, GalleyResult};
///
/// fn might_fail() -> GalleyResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Galley Error: {}", _0)]
pub struct GalleyError(Box<GalleyErrorKind>);

impl GalleyError {
    /// Create a new error from a kind.
    pub fn new(kind: GalleyErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GalleyErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to GalleyErrorKind
impl<T> From<T> for GalleyError
where
    T: Into<GalleyErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Galley operations.
pub type GalleyResult<T> = std::result::Result<T, GalleyError>;
