//! Scripted catalog sources shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use brandview_core::{Price, Product, ProductCatalogResponse, ProductId};
use tokio::sync::Notify;
use url::Url;

use crate::fetcher::{AttemptError, CatalogSource};

pub fn endpoint() -> Url {
    Url::parse("https://catalog.test/products").unwrap()
}

pub fn product(id: i64, brand: &str) -> Product {
    Product {
        id: ProductId::new(id),
        brand: Some(brand.to_string()),
        title: format!("{brand} product {id}"),
        thumbnail: format!("https://cdn.catalog.test/{id}/thumbnail.jpg"),
        description: format!("Description of product {id}"),
        price: Price::from_cents(id * 100 + 99),
        rating: 4.5,
    }
}

pub fn catalog(products: Vec<Product>) -> ProductCatalogResponse {
    let total = products.len() as u64;
    ProductCatalogResponse {
        products,
        limit: total,
        skip: 0,
        total,
    }
}

pub fn unavailable() -> AttemptError {
    AttemptError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)
}

/// Plays back a fixed list of attempt outcomes, one per call.
///
/// Once the script runs out every further call fails with `503`.
#[derive(Clone)]
pub struct ScriptedSource {
    script: Arc<Mutex<VecDeque<Result<ProductCatalogResponse, AttemptError>>>>,
    calls: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<ProductCatalogResponse, AttemptError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    /// Every attempt blocks until the returned gate is notified once.
    pub fn gated(script: Vec<Result<ProductCatalogResponse, AttemptError>>) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut source = Self::new(script);
        source.gate = Some(Arc::clone(&gate));
        (source, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn fetch_once(&self, _url: &Url) -> Result<ProductCatalogResponse, AttemptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(unavailable()))
    }
}

/// Panics on every attempt.
pub struct PanickingSource;

#[async_trait]
impl CatalogSource for PanickingSource {
    async fn fetch_once(&self, _url: &Url) -> Result<ProductCatalogResponse, AttemptError> {
        panic!("catalog source blew up");
    }
}
