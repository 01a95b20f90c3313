//! Brandview Catalog - fetching, caching and brand filtering.
//!
//! # Architecture
//!
//! - [`fetcher`] - one-attempt [`CatalogSource`]s and the bounded retry loop
//! - [`store`] - [`CatalogStore`], a cache keyed by endpoint URL that allows at
//!   most one in-flight fetch per URL and shares its outcome with every waiter
//! - [`products`] - [`BrandProducts`], the per-panel view exposing
//!   `data`/`loading`/`error` and `refresh`
//! - [`config`] - environment-driven [`CatalogConfig`]
//!
//! There is no global state: build one store and hand clones of it to every
//! consumer that should share fetches.
//!
//! # Example
//!
//! ```rust,ignore
//! use brandview_catalog::{BrandProducts, CatalogConfig, CatalogStore};
//!
//! let config = CatalogConfig::from_env()?;
//! let store = CatalogStore::from_config(&config);
//!
//! let apple = BrandProducts::mount(store.clone(), config.endpoint.clone(), "Apple").await;
//! let samsung = BrandProducts::mount(store, config.endpoint.clone(), "Samsung").await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod fetcher;
pub mod products;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::{CatalogConfig, ConfigError, DEFAULT_ENDPOINT};
pub use fetcher::{
    AttemptError, Backoff, CatalogSource, FetchError, HttpCatalogSource, RetryPolicy,
    fetch_with_retry,
};
pub use products::{BrandProducts, ProductsState};
pub use store::{CacheEntry, CatalogStore};
