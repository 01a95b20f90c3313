//! Brandview Core - Shared product catalog types.
//!
//! This crate provides the data model used across all Brandview components:
//! - `catalog` - Fetcher, shared cache store and brand-products hook
//! - `storefront` - Server-rendered grid of brand panels
//! - `cli` - Terminal rendering and catalog inspection
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no caching. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product records, catalog snapshots, prices, IDs and fetch status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
