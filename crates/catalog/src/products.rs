//! Brand-filtered view over the shared catalog cache.
//!
//! A [`BrandProducts`] is what a rendering surface holds for one panel: it
//! exposes `data`, `loading` and `error`, and a `refresh` that either re-filters
//! the cached catalog or goes through the store to fetch it.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = CatalogStore::from_config(&config);
//! let apple = BrandProducts::mount(store.clone(), config.endpoint.clone(), "Apple").await;
//!
//! match apple.state() {
//!     ProductsState { error: Some(err), .. } => show_retry(err),
//!     ProductsState { data: Some(products), .. } => render(products),
//!     _ => show_loading(),
//! }
//! ```

use brandview_core::Product;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::fetcher::FetchError;
use crate::store::CatalogStore;

/// What a rendering surface needs to draw one brand panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductsState {
    /// Products of the requested brand, once the catalog has been loaded.
    pub data: Option<Vec<Product>>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

/// Products of one brand, backed by a shared [`CatalogStore`].
pub struct BrandProducts {
    store: CatalogStore,
    endpoint: Url,
    brand: String,
    state: watch::Sender<ProductsState>,
}

impl BrandProducts {
    /// Create an idle view. Nothing is fetched until [`refresh`](Self::refresh).
    #[must_use]
    pub fn new(store: CatalogStore, endpoint: Url, brand: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ProductsState::default());
        Self {
            store,
            endpoint,
            brand: brand.into(),
            state,
        }
    }

    /// Create a view and run the initial refresh.
    pub async fn mount(store: CatalogStore, endpoint: Url, brand: impl Into<String>) -> Self {
        let view = Self::new(store, endpoint, brand);
        view.refresh().await;
        view
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ProductsState {
        self.state.borrow().clone()
    }

    /// Observe state transitions (loading, then data or error).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProductsState> {
        self.state.subscribe()
    }

    /// Bring `data` up to date with the catalog.
    ///
    /// A completed catalog is only re-filtered; otherwise this waits for the
    /// store's single in-flight fetch, starting it if needed. On failure the
    /// previous `data` is kept and `error` is set.
    #[instrument(skip(self), fields(brand = %self.brand))]
    pub async fn refresh(&self) -> ProductsState {
        if let Some(catalog) = self.store.entry(&self.endpoint).payload() {
            debug!("Filtering cached catalog");
            let products = catalog.products_for_brand(&self.brand);
            self.show(products);
            return self.state();
        }

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        match self.store.load(&self.endpoint).await {
            Ok(catalog) => {
                let products = catalog.products_for_brand(&self.brand);
                debug!(products = products.len(), "Brand products loaded");
                self.show(products);
            }
            Err(err) => {
                warn!(error = %err, "Failed to load brand products");
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err);
                });
            }
        }

        self.state()
    }

    fn show(&self, products: Vec<Product>) {
        self.state.send_modify(|state| {
            state.data = Some(products);
            state.loading = false;
            state.error = None;
        });
    }
}
