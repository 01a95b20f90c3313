//! Application state shared across handlers.

use std::sync::Arc;

use brandview_catalog::{BrandProducts, CatalogStore};
use url::Url;

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Every request shares one
/// [`CatalogStore`], so concurrent panels trigger a single catalog fetch.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: CatalogStore,
}

impl AppState {
    /// Create application state with an HTTP-backed catalog store.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store = CatalogStore::from_config(&config.catalog);
        Self::with_store(config, store)
    }

    /// Create application state around an existing store.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, store: CatalogStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shared catalog store.
    #[must_use]
    pub fn store(&self) -> &CatalogStore {
        &self.inner.store
    }

    /// The catalog endpoint every panel reads from.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.config.catalog.endpoint
    }

    /// Mount a brand view against the shared store.
    pub async fn brand_products(&self, brand: &str) -> BrandProducts {
        BrandProducts::mount(self.store().clone(), self.endpoint().clone(), brand).await
    }
}
