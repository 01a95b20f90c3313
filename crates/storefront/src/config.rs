//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BRANDS` - Comma-separated brands shown on the home page
//!   (default: Apple,Samsung,Huawei,Oppo)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)
//!
//! Catalog variables (`BRANDVIEW_*`) are documented in
//! [`brandview_catalog::config`].

use std::net::{IpAddr, SocketAddr};

use brandview_catalog::CatalogConfig;
use thiserror::Error;

const DEFAULT_BRANDS: &str = "Apple,Samsung,Huawei,Oppo";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error(transparent)]
    Catalog(#[from] brandview_catalog::ConfigError),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Brands rendered as panels on the home page, in order
    pub brands: Vec<String>,
    /// Catalog endpoint and retry configuration
    pub catalog: CatalogConfig,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get_or_default(&lookup, "STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_or_default(&lookup, "STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let brands = parse_brands(&get_or_default(&lookup, "STOREFRONT_BRANDS", DEFAULT_BRANDS))?;
        let catalog = CatalogConfig::from_lookup(&lookup)?;
        let log_json = lookup("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        let sentry_sample_rate = parse_rate(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(Self {
            host,
            port,
            brands,
            catalog,
            log_json,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Split a comma-separated brand list, dropping blanks and duplicates.
fn parse_brands(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut brands: Vec<String> = Vec::new();
    for brand in raw.split(',').map(str::trim).filter(|b| !b.is_empty()) {
        if !brands.iter().any(|b| b == brand) {
            brands.push(brand.to_string());
        }
    }

    if brands.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_BRANDS".to_string(),
            "must name at least one brand".to_string(),
        ));
    }
    Ok(brands)
}

/// Parse a sample rate in `[0.0, 1.0]`.
fn parse_rate<F>(lookup: &F, key: &str, default: f32) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
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
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.brands, vec!["Apple", "Samsung", "Huawei", "Oppo"]);
        assert_eq!(
            config.catalog.endpoint.as_str(),
            brandview_catalog::DEFAULT_ENDPOINT
        );
        assert!(!config.log_json);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
        assert!(config.sentry_traces_sample_rate.abs() < f32::EPSILON);
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
        ]))
        .unwrap();

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_brands_are_trimmed_and_deduplicated() {
        let config = StorefrontConfig::from_lookup(lookup(&[(
            "STOREFRONT_BRANDS",
            " Apple , ,Samsung,Apple,Fashion Trends",
        )]))
        .unwrap();

        assert_eq!(config.brands, vec!["Apple", "Samsung", "Fashion Trends"]);
    }

    #[test]
    fn test_empty_brand_list_is_rejected() {
        let result = StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_BRANDS", " , ")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "STOREFRONT_BRANDS"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_PORT", "99999")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_catalog_errors_propagate() {
        let result = StorefrontConfig::from_lookup(lookup(&[("BRANDVIEW_MAX_RETRIES", "lots")]));
        assert!(matches!(result, Err(ConfigError::Catalog(_))));
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        let result = StorefrontConfig::from_lookup(lookup(&[("SENTRY_SAMPLE_RATE", "1.5")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_json_logging() {
        let config = StorefrontConfig::from_lookup(lookup(&[("LOG_FORMAT", "JSON")])).unwrap();
        assert!(config.log_json);
    }
}
