//! Galley configuration.
//!
//! Loads tuning knobs (rate limits, retries, cache, pricing) from TOML files
//! with a precedence system:
//! - Bundled defaults (include_str! from galley.toml)
//! - User override (~/.config/galley/galley.toml, then ./galley.toml)

use ::config::{Config, File, FileFormat};
use galley_cost::{ModelPrice, PriceTable};
use galley_error::{ConfigError, GalleyError, GalleyResult};
use galley_rate_limit::{RateLimitConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../galley.toml");

/// Response cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheSettings {
    /// TTL applied when a request does not set `cacheTTL`
    #[serde(default = "default_ttl_ms")]
    pub default_ttl_ms: u64,
    /// Byte quota of the session store
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: usize,
}

fn default_ttl_ms() -> u64 {
    3_600_000
}

fn default_quota_bytes() -> usize {
    galley_cache::DEFAULT_QUOTA_BYTES
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl_ms: default_ttl_ms(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

impl CacheSettings {
    /// Default TTL as a duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }
}

/// Top-level Galley configuration.
///
/// # Example
///
/// ```no_run
/// use galley::GalleyConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = GalleyConfig::load()?;
/// println!("Retry attempts: {}", config.retry.max_attempts);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct GalleyConfig {
    /// Fixed-window limit per caller and capability
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Provider retry policy
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Response cache settings
    #[serde(default)]
    pub cache: CacheSettings,
    /// Price rows by model name, layered over the built-in table
    #[serde(default)]
    pub pricing: HashMap<String, ModelPrice>,
    /// Extra text appended to the kitchen system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kitchen_context: Option<String>,
}

impl GalleyConfig {
    /// Load configuration from a specific file path, over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> GalleyResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                GalleyError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                GalleyError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (galley.toml shipped with the library)
    /// 2. User config in home directory (~/.config/galley/galley.toml)
    /// 3. User config in current directory (./galley.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file is malformed or values are invalid.
    #[instrument]
    pub fn load() -> GalleyResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/galley/galley.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("galley").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| {
                GalleyError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                GalleyError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Bundled defaults only, ignoring user files.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled file is malformed.
    pub fn bundled() -> GalleyResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize::<Self>)
            .map_err(|e| {
                GalleyError::from(ConfigError::new(format!(
                    "Bundled configuration is invalid: {}",
                    e
                )))
            })
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending value.
    pub fn validate(&self) -> GalleyResult<()> {
        self.rate_limit.validate().map_err(ConfigError::from)?;
        self.retry.validate().map_err(ConfigError::from)?;
        if let Some((model, _)) = self
            .pricing
            .iter()
            .find(|(_, price)| price.input_per_million < 0.0 || price.output_per_million < 0.0)
        {
            return Err(ConfigError::new(format!("price for {} must not be negative", model)).into());
        }
        Ok(())
    }

    /// Built-in price table with configured rows layered on top.
    pub fn price_table(&self) -> PriceTable {
        PriceTable::default().with_overrides(
            self.pricing
                .iter()
                .map(|(model, price)| (model.clone(), *price)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_match_built_in_values() {
        let config = GalleyConfig::bundled().unwrap();
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.cache, CacheSettings::default());
        assert_eq!(config.price_table(), PriceTable::default());
        assert!(config.kitchen_context.is_none());
    }
}
