//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page (grid of brand panels)
//! GET  /brands/{brand}                - Brand panel fragment (HTMX)
//!
//! # JSON API
//! GET  /api/brands                    - Brands in the catalog with product counts
//! GET  /api/brands/{brand}/products   - Products of one brand
//!
//! # Health
//! GET  /health                        - Liveness
//! GET  /health/ready                  - Readiness (catalog loaded)
//! GET  /health/catalog                - Catalog cache status
//! ```

pub mod api;
pub mod brands;
pub mod health;
pub mod home;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/brands", get(api::brands))
        .route("/brands/{brand}/products", get(api::brand_products))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Brand panel fragments
        .route("/brands/{brand}", get(brands::panel))
        // JSON API
        .nest("/api", api_routes())
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/health/catalog", get(health::catalog))
}
