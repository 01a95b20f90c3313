//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode};
use brandview_core::FetchStatus;
use serde_json::{Value, json};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog has been loaded once.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().status(state.endpoint()) {
        FetchStatus::Complete => StatusCode::OK,
        FetchStatus::NotFetched | FetchStatus::Fetching => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Catalog cache status.
///
/// Reports the lifecycle state of the catalog entry without triggering a fetch.
pub async fn catalog(State(state): State<AppState>) -> Json<Value> {
    let entry = state.store().entry(state.endpoint());
    Json(json!({
        "endpoint": state.endpoint().as_str(),
        "status": entry.status(),
        "products": entry.payload().map(|catalog| catalog.products.len()),
    }))
}
