//! Brand panel fragment.
//!
//! Each panel on the home page requests `/brands/{brand}` once loaded. The
//! handler mounts a [`BrandProducts`](brandview_catalog::BrandProducts) view
//! against the shared store and renders whichever state it settles in: the
//! product list, or an error with a Retry button that re-requests the panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use brandview_catalog::ProductsState;
use brandview_core::Product;
use serde::Deserialize;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub price: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            thumbnail: product.thumbnail.clone(),
            price: product.price.display(),
        }
    }
}

/// Panel query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PanelQuery {
    /// Set by the Retry button.
    #[serde(default)]
    pub retry: bool,
}

/// Brand panel fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/brand_panel.html")]
pub struct BrandPanelTemplate {
    pub brand: String,
    pub retry_url: String,
    pub products: Vec<ProductCard>,
    pub loading: bool,
    pub failed: bool,
}

impl BrandPanelTemplate {
    /// Build the panel for a settled (or still loading) view state.
    #[must_use]
    pub fn from_state(brand: &str, state: &ProductsState) -> Self {
        let failed = state.error.is_some();
        let products: Vec<ProductCard> = state
            .data
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(ProductCard::from)
            .collect();

        Self {
            brand: brand.to_string(),
            retry_url: panel_url(brand, true),
            products,
            loading: !failed && (state.loading || state.data.is_none()),
            failed,
        }
    }
}

/// Path of a brand's panel fragment.
#[must_use]
pub fn panel_url(brand: &str, retry: bool) -> String {
    let encoded = urlencoding::encode(brand);
    if retry {
        format!("/brands/{encoded}?retry=true")
    } else {
        format!("/brands/{encoded}")
    }
}

/// Render one brand's panel.
#[instrument(skip(state, query), fields(retry = query.retry))]
pub async fn panel(
    State(state): State<AppState>,
    Path(brand): Path<String>,
    Query(query): Query<PanelQuery>,
) -> BrandPanelTemplate {
    if query.retry {
        add_breadcrumb("catalog", "Retried brand panel", Some(&[("brand", brand.as_str())]));
    }

    let view = state.brand_products(&brand).await;
    BrandPanelTemplate::from_state(&brand, &view.state())
}
