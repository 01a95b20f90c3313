//! JSON API handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use brandview_core::Product;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// A brand present in the catalog.
#[derive(Debug, Serialize)]
pub struct BrandSummary {
    pub brand: String,
    pub products: usize,
}

/// List every brand in the catalog with its product count.
///
/// # Errors
///
/// Returns `AppError::Catalog` if the catalog cannot be fetched.
#[instrument(skip(state))]
pub async fn brands(State(state): State<AppState>) -> Result<Json<Vec<BrandSummary>>> {
    let catalog = state.store().load(state.endpoint()).await?;

    Ok(Json(
        catalog
            .brands()
            .into_iter()
            .map(|(brand, products)| BrandSummary { brand, products })
            .collect(),
    ))
}

/// Products of one brand.
///
/// # Errors
///
/// Returns `AppError::Catalog` if the catalog cannot be fetched, and
/// `AppError::NotFound` if no product carries the brand.
#[instrument(skip(state))]
pub async fn brand_products(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let view = state.brand_products(&brand).await;
    let current = view.state();

    if let Some(err) = current.error {
        return Err(err.into());
    }

    let products = current.data.unwrap_or_default();
    if products.is_empty() {
        return Err(AppError::NotFound(format!("brand {brand}")));
    }
    Ok(Json(products))
}
