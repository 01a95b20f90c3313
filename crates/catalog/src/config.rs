//! Catalog configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BRANDVIEW_ENDPOINT` - Catalog endpoint (default: <https://dummyjson.com/products>)
//! - `BRANDVIEW_MAX_RETRIES` - Retries after the first attempt (default: 2)
//! - `BRANDVIEW_BACKOFF_INITIAL_MS` - Delay before the first retry; enables
//!   exponential backoff (default: unset, retries are immediate)
//! - `BRANDVIEW_BACKOFF_MAX_MS` - Upper bound on a single backoff delay
//!   (default: 10x the initial delay)
//! - `BRANDVIEW_SIMULATED_DELAY_MS` - Artificial delay before every request (default: 0)

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::fetcher::{Backoff, DEFAULT_MAX_RETRIES, RetryPolicy};

/// The public product catalog endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://dummyjson.com/products";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog fetching configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint serving the full catalog
    pub endpoint: Url,
    /// Retry behaviour for failed fetches
    pub retry: RetryPolicy,
    /// Artificial delay before each request
    pub simulated_delay: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            retry: RetryPolicy::default(),
            simulated_delay: Duration::ZERO,
        }
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = match lookup("BRANDVIEW_ENDPOINT") {
            Some(raw) => parse_var("BRANDVIEW_ENDPOINT", &raw)?,
            None => default_endpoint(),
        };

        let max_retries =
            parse_optional(&lookup, "BRANDVIEW_MAX_RETRIES")?.unwrap_or(DEFAULT_MAX_RETRIES);

        let backoff = match parse_optional::<u64, _>(&lookup, "BRANDVIEW_BACKOFF_INITIAL_MS")? {
            None | Some(0) => Backoff::Immediate,
            Some(initial_ms) => {
                let max_ms = parse_optional(&lookup, "BRANDVIEW_BACKOFF_MAX_MS")?
                    .unwrap_or_else(|| initial_ms.saturating_mul(10));
                if max_ms < initial_ms {
                    return Err(ConfigError::InvalidEnvVar(
                        "BRANDVIEW_BACKOFF_MAX_MS".to_string(),
                        format!("must be at least BRANDVIEW_BACKOFF_INITIAL_MS ({initial_ms})"),
                    ));
                }
                Backoff::Exponential {
                    initial: Duration::from_millis(initial_ms),
                    max: Duration::from_millis(max_ms),
                }
            }
        };

        let simulated_delay = Duration::from_millis(
            parse_optional(&lookup, "BRANDVIEW_SIMULATED_DELAY_MS")?.unwrap_or(0),
        );

        Ok(Self {
            endpoint,
            retry: RetryPolicy::new(max_retries).with_backoff(backoff),
            simulated_delay,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

#[allow(clippy::expect_used)] // Compile-time constant, covered by tests
fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT is a valid URL")
}

/// Parse a variable's raw value.
fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an optional variable, treating an empty value as unset.
fn parse_optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => parse_var(key, &raw).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.simulated_delay, Duration::ZERO);
    }

    #[test]
    fn test_default_matches_lookup_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.retry.total_attempts(), 3);
    }

    #[test]
    fn test_overrides() {
        let config = CatalogConfig::from_lookup(lookup(&[
            ("BRANDVIEW_ENDPOINT", "http://127.0.0.1:8080/products"),
            ("BRANDVIEW_MAX_RETRIES", "5"),
            ("BRANDVIEW_SIMULATED_DELAY_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint.as_str(), "http://127.0.0.1:8080/products");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.backoff, Backoff::Immediate);
        assert_eq!(config.simulated_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_backoff_enabled_with_default_cap() {
        let config =
            CatalogConfig::from_lookup(lookup(&[("BRANDVIEW_BACKOFF_INITIAL_MS", "200")])).unwrap();

        assert_eq!(
            config.retry.backoff,
            Backoff::Exponential {
                initial: Duration::from_millis(200),
                max: Duration::from_secs(2),
            }
        );
    }

    #[test]
    fn test_backoff_zero_means_immediate() {
        let config =
            CatalogConfig::from_lookup(lookup(&[("BRANDVIEW_BACKOFF_INITIAL_MS", "0")])).unwrap();
        assert_eq!(config.retry.backoff, Backoff::Immediate);
    }

    #[test]
    fn test_backoff_max_below_initial_is_rejected() {
        let result = CatalogConfig::from_lookup(lookup(&[
            ("BRANDVIEW_BACKOFF_INITIAL_MS", "500"),
            ("BRANDVIEW_BACKOFF_MAX_MS", "100"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "BRANDVIEW_BACKOFF_MAX_MS"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = CatalogConfig::from_lookup(lookup(&[("BRANDVIEW_MAX_RETRIES", "-1")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "BRANDVIEW_MAX_RETRIES"));

        let result = CatalogConfig::from_lookup(lookup(&[("BRANDVIEW_ENDPOINT", "not a url")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config =
            CatalogConfig::from_lookup(lookup(&[("BRANDVIEW_MAX_RETRIES", "  ")])).unwrap();
        assert_eq!(config.retry.max_retries, DEFAULT_MAX_RETRIES);
    }
}
