//! `reqwest`-backed catalog source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use brandview_core::ProductCatalogResponse;
use tracing::{debug, instrument};
use url::Url;

use super::{AttemptError, CatalogSource};

/// Catalog source that issues a plain `GET` against the endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpCatalogSource {
    inner: Arc<HttpCatalogSourceInner>,
}

struct HttpCatalogSourceInner {
    client: reqwest::Client,
    simulated_delay: Duration,
}

impl HttpCatalogSource {
    /// Create a source with no artificial delay.
    #[must_use]
    pub fn new() -> Self {
        Self::with_simulated_delay(Duration::ZERO)
    }

    /// Create a source that sleeps for `delay` before every request.
    ///
    /// Useful for observing loading states against a fast endpoint.
    #[must_use]
    pub fn with_simulated_delay(delay: Duration) -> Self {
        Self {
            inner: Arc::new(HttpCatalogSourceInner {
                client: reqwest::Client::new(),
                simulated_delay: delay,
            }),
        }
    }
}

impl Default for HttpCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_once(&self, url: &Url) -> Result<ProductCatalogResponse, AttemptError> {
        if !self.inner.simulated_delay.is_zero() {
            debug!(delay = ?self.inner.simulated_delay, "Simulating network delay");
            tokio::time::sleep(self.inner.simulated_delay).await;
        }

        let response = self
            .inner
            .client
            .get(url.as_str())
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog endpoint returned non-success status"
            );
            return Err(AttemptError::Status(status));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            AttemptError::Parse(e)
        })
    }
}
