//! Product records and catalog snapshots as served by the catalog endpoint.
//!
//! The endpoint returns `{ products, limit, skip, total }`. Fields the
//! application doesn't use (stock, tags, reviews, ...) are ignored on
//! deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A single catalog product. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Some catalog entries (e.g. groceries) carry no brand at all.
    #[serde(default)]
    pub brand: Option<String>,
    pub title: String,
    pub thumbnail: String,
    pub description: String,
    pub price: Price,
    pub rating: f64,
}

impl Product {
    /// Exact, case-sensitive brand match. Products without a brand never match.
    #[must_use]
    pub fn is_brand(&self, brand: &str) -> bool {
        self.brand.as_deref() == Some(brand)
    }
}

/// One full snapshot of the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalogResponse {
    pub products: Vec<Product>,
    pub limit: u64,
    pub skip: u64,
    pub total: u64,
}

impl ProductCatalogResponse {
    /// Products whose brand equals `brand` exactly, in catalog order.
    #[must_use]
    pub fn products_for_brand(&self, brand: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.is_brand(brand))
            .cloned()
            .collect()
    }

    /// Distinct brands with their product counts, sorted by brand name.
    #[must_use]
    pub fn brands(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for brand in self.products.iter().filter_map(|p| p.brand.as_deref()) {
            *counts.entry(brand).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(brand, count)| (brand.to_string(), count))
            .collect()
    }
}
