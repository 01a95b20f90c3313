//! Catalog fetcher with bounded retries.
//!
//! # Architecture
//!
//! - [`CatalogSource`] performs exactly one attempt against the endpoint
//! - [`fetch_with_retry`] drives a source in a bounded loop: `max_retries + 1`
//!   attempts in total, every failure kind is retried
//! - Individual attempt failures ([`AttemptError`]) collapse into a single
//!   [`FetchError::FetchFailed`] once attempts run out
//!
//! No timeout and no jitter are applied. Retries are immediate unless an
//! exponential [`Backoff`] is configured.

mod http;

pub use http::HttpCatalogSource;

use std::time::Duration;

use async_trait::async_trait;
use brandview_core::ProductCatalogResponse;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// A single-attempt source of catalog snapshots.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch and parse the catalog once. Must not retry internally.
    async fn fetch_once(&self, url: &Url) -> Result<ProductCatalogResponse, AttemptError>;
}

/// Failure of one fetch attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Transport failure (connection refused, reset, DNS, ...).
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// Body was not a valid catalog document.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Final outcome of a failed fetch, shared by every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// All attempts failed. Carries the last attempt's error message.
    #[error("Fetch failed after {attempts} attempts: {message}")]
    FetchFailed { attempts: u32, message: String },

    /// The background fetch ended without reporting an outcome.
    #[error("Fetch ended without a result")]
    Abandoned,
}

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Retry as soon as an attempt fails.
    #[default]
    Immediate,
    /// Wait `initial * 2^(n-1)` before retry `n`, never longer than `max`.
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// Delay to wait before the given retry (1-based).
    #[must_use]
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        match *self {
            Self::Immediate => Duration::ZERO,
            Self::Exponential { initial, max } => {
                let factor = 2_u32.saturating_pow(retry.saturating_sub(1));
                initial.saturating_mul(factor).min(max)
            }
        }
    }
}

/// How many times, and how eagerly, a failed fetch is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Immediate retries, `max_retries` of them.
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Immediate,
        }
    }

    /// Replace the backoff schedule.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Initial attempt plus retries.
    #[must_use]
    pub const fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

/// Fetch the catalog, retrying any failure until the policy is exhausted.
///
/// # Errors
///
/// Returns [`FetchError::FetchFailed`] with the last attempt's message when
/// every attempt fails.
#[instrument(skip(source, policy), fields(url = %url, max_retries = policy.max_retries))]
pub async fn fetch_with_retry<S>(
    source: &S,
    url: &Url,
    policy: &RetryPolicy,
) -> Result<ProductCatalogResponse, FetchError>
where
    S: CatalogSource + ?Sized,
{
    let total_attempts = policy.total_attempts();
    let mut attempt = 1;

    loop {
        match source.fetch_once(url).await {
            Ok(catalog) => {
                debug!(
                    attempt,
                    products = catalog.products.len(),
                    "Catalog fetched"
                );
                return Ok(catalog);
            }
            Err(err) if attempt < total_attempts => {
                let delay = policy.backoff.delay_before_retry(attempt);
                warn!(
                    attempt,
                    remaining = total_attempts - attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Catalog fetch attempt failed, retrying"
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
            Err(err) => {
                error!(attempts = attempt, error = %err, "Catalog fetch failed, retries exhausted");
                return Err(FetchError::FetchFailed {
                    attempts: attempt,
                    message: err.to_string(),
                });
            }
        }
    }
}
