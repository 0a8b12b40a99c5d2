//! Catalog configuration.
//!
//! Values come from the process environment. Every variable is optional;
//! missing ones fall back to [`CatalogConfig::default`].

use std::time::Duration;

use thiserror::Error;

/// Page size for listings when the caller does not pass one.
pub const DEFAULT_LIMIT: usize = 7;

/// Records pulled by a light reseed. A full pull uses 650.
pub const DEFAULT_SEED_LIMIT: usize = 10;

/// Remote catalog endpoint.
pub const DEFAULT_SOURCE_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Request timeout for the remote catalog, in seconds.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 30;

/// Configuration errors, one per rejected variable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    NotANumber {
        var: &'static str,
        value: String,
    },

    #[error("{var} must be a positive number")]
    NotPositive {
        var: &'static str,
    },

    #[error("{var} must not be empty")]
    Empty {
        var: &'static str,
    },
}

/// Settings consumed by the catalog, the reseed coordinator and the HTTP
/// source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// `DEFAULT_LIMIT`: listing page size.
    pub default_limit: usize,
    /// `SEED_LIMIT`: records fetched per reseed.
    pub seed_limit: usize,
    /// `SOURCE_URL`: remote catalog endpoint.
    pub source_url: String,
    /// `SOURCE_TIMEOUT_SECS`: remote catalog request timeout.
    pub source_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            seed_limit: DEFAULT_SEED_LIMIT,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            source_timeout_secs: DEFAULT_SOURCE_TIMEOUT_SECS,
        }
    }
}

impl CatalogConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            default_limit: positive(&lookup, "DEFAULT_LIMIT", defaults.default_limit)?,
            seed_limit: positive(&lookup, "SEED_LIMIT", defaults.seed_limit)?,
            source_url: match lookup("SOURCE_URL") {
                Some(url) if url.trim().is_empty() => {
                    return Err(ConfigError::Empty { var: "SOURCE_URL" })
                }
                Some(url) => url.trim().to_string(),
                None => defaults.source_url,
            },
            source_timeout_secs: positive(
                &lookup,
                "SOURCE_TIMEOUT_SECS",
                defaults.source_timeout_secs,
            )?,
        })
    }

    /// Request timeout for the remote catalog.
    #[must_use]
    pub const fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }
}

fn positive<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialEq + From<u8>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    let raw = raw.trim();
    if raw.starts_with('-') {
        return Err(ConfigError::NotPositive { var });
    }
    let value = raw.parse::<T>().map_err(|_| ConfigError::NotANumber {
        var,
        value: raw.to_string(),
    })?;
    if value == T::from(0) {
        return Err(ConfigError::NotPositive { var });
    }
    Ok(value)
}
