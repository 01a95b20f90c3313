//! Integration test support for Brandview.
//!
//! [`FakeCatalog`] serves a product catalog from a local axum server on an
//! ephemeral port, so the real HTTP source, the shared store and the
//! storefront router can be exercised end to end without network access.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p brandview-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let upstream = FakeCatalog::builder().failures(2).start().await;
//! let store = CatalogStore::new(HttpCatalogSource::new(), RetryPolicy::default());
//!
//! let catalog = store.load(&upstream.url()).await?;
//! assert_eq!(upstream.hits(), 3);
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{
        HeaderMap, StatusCode,
        header::{ACCEPT, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::get,
};
use brandview_storefront::{AppState, StorefrontConfig};
use tokio::task::JoinHandle;
use url::Url;

/// A catalog in the shape of the public endpoint: extra fields the model
/// ignores, four phone brands, a fragrance brand with a space, and one
/// product without a brand.
pub const FIXTURE: &str = r#"{
  "products": [
    {"id": 1, "title": "iPhone 9", "description": "An apple mobile which is nothing like apple", "price": 549, "discountPercentage": 12.96, "rating": 4.69, "stock": 94, "brand": "Apple", "category": "smartphones", "thumbnail": "https://cdn.catalog.test/1/thumbnail.jpg", "images": []},
    {"id": 2, "title": "iPhone X", "description": "SIM-Free, Model A19211", "price": 899.99, "rating": 4.44, "brand": "Apple", "category": "smartphones", "thumbnail": "https://cdn.catalog.test/2/thumbnail.jpg"},
    {"id": 3, "title": "Samsung Universe 9", "description": "Samsung's new variant", "price": 1249, "rating": 4.09, "brand": "Samsung", "category": "smartphones", "thumbnail": "https://cdn.catalog.test/3/thumbnail.jpg"},
    {"id": 4, "title": "OPPOF19", "description": "OPPO F19 is officially announced", "price": 280, "rating": 4.3, "brand": "OPPO", "category": "smartphones", "thumbnail": "https://cdn.catalog.test/4/thumbnail.jpg"},
    {"id": 5, "title": "Huawei P30", "description": "Huawei's re-badged P30 Pro", "price": 499, "rating": 4.09, "brand": "Huawei", "category": "smartphones", "thumbnail": "https://cdn.catalog.test/5/thumbnail.jpg"},
    {"id": 6, "title": "Samsung Galaxy Book", "description": "Windows 10 laptop", "price": 1499, "rating": 4.25, "brand": "Samsung", "category": "laptops", "thumbnail": "https://cdn.catalog.test/6/thumbnail.jpg"},
    {"id": 7, "title": "Fog Scent Xpressio", "description": "Long lasting perfume", "price": 13, "rating": 4.59, "brand": "Fog Scent Xpressio", "category": "fragrances", "thumbnail": "https://cdn.catalog.test/7/thumbnail.jpg"},
    {"id": 8, "title": "Tree Oil 30ml", "description": "Tea tree oil", "price": 12, "rating": 4.52, "category": "skincare", "thumbnail": "https://cdn.catalog.test/8/thumbnail.jpg"}
  ],
  "total": 100,
  "skip": 0,
  "limit": 8
}"#;

struct FakeState {
    body: String,
    failures_left: AtomicUsize,
    delay: Duration,
    hits: AtomicUsize,
    last_accept: Mutex<Option<String>>,
}

/// Builder for [`FakeCatalog`].
pub struct FakeCatalogBuilder {
    body: String,
    failures: usize,
    delay: Duration,
}

impl FakeCatalogBuilder {
    /// Serve `body` instead of [`FIXTURE`].
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Answer the first `failures` requests with 503.
    #[must_use]
    pub const fn failures(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }

    /// Hold every response for `delay`.
    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(self) -> FakeCatalog {
        let state = Arc::new(FakeState {
            body: self.body,
            failures_left: AtomicUsize::new(self.failures),
            delay: self.delay,
            hits: AtomicUsize::new(0),
            last_accept: Mutex::new(None),
        });

        let app = Router::new()
            .route("/products", get(serve_catalog))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake catalog");
        let addr = listener.local_addr().expect("Fake catalog has no address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        FakeCatalog {
            addr,
            state,
            server,
        }
    }
}

/// A running fake catalog endpoint. Stops serving when dropped.
pub struct FakeCatalog {
    addr: SocketAddr,
    state: Arc<FakeState>,
    server: JoinHandle<()>,
}

impl FakeCatalog {
    #[must_use]
    pub fn builder() -> FakeCatalogBuilder {
        FakeCatalogBuilder {
            body: FIXTURE.to_string(),
            failures: 0,
            delay: Duration::ZERO,
        }
    }

    /// Serve [`FIXTURE`] without failures or delay.
    pub async fn start() -> Self {
        Self::builder().start().await
    }

    /// Catalog endpoint URL.
    ///
    /// # Panics
    ///
    /// Never in practice: the address always forms a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/products", self.addr)).expect("Invalid fake catalog URL")
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// `Accept` header of the most recent request, if it carried one.
    #[must_use]
    pub fn last_accept(&self) -> Option<String> {
        self.state
            .last_accept
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for FakeCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn serve_catalog(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_accept.lock().unwrap_or_else(PoisonError::into_inner) = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let failing = state
        .failures_left
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return (StatusCode::SERVICE_UNAVAILABLE, "catalog unavailable").into_response();
    }

    ([(CONTENT_TYPE, "application/json")], state.body.clone()).into_response()
}

/// Storefront state pointed at `endpoint`.
///
/// # Panics
///
/// Panics if the variables do not form a valid configuration.
#[must_use]
pub fn storefront_state(endpoint: &Url, brands: &str, max_retries: u32) -> AppState {
    let endpoint = endpoint.to_string();
    let max_retries = max_retries.to_string();
    let config = StorefrontConfig::from_lookup(|key| match key {
        "BRANDVIEW_ENDPOINT" => Some(endpoint.clone()),
        "BRANDVIEW_MAX_RETRIES" => Some(max_retries.clone()),
        "STOREFRONT_BRANDS" => Some(brands.to_string()),
        _ => None,
    })
    .expect("Invalid storefront configuration");

    AppState::new(config)
}
