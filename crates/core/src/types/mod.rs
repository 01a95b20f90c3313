//! Core types for Brandview.
//!
//! This module provides type-safe wrappers for the product catalog.

pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use id::*;
pub use price::Price;
pub use product::{Product, ProductCatalogResponse};
pub use status::FetchStatus;
