//! CLI subcommands.

pub mod brands;
pub mod products;

use brandview_catalog::{CatalogConfig, ConfigError, FetchError};
use thiserror::Error;

/// Errors shared by the catalog commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Catalog(#[from] FetchError),

    #[error("Products unavailable for: {}", .0.join(", "))]
    Unavailable(Vec<String>),

    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Load catalog configuration from the environment.
fn load_config() -> Result<CatalogConfig, CommandError> {
    let config = CatalogConfig::from_env()?;
    tracing::debug!(endpoint = %config.endpoint, "Catalog configured");
    Ok(config)
}
