//! `products` command: one brand view per requested brand.
//!
//! All views share one [`CatalogStore`], so however many brands are asked for,
//! the catalog is fetched once. Failed brands can be retried interactively.

use std::fmt::Write as _;

use brandview_catalog::{BrandProducts, CatalogStore, ProductsState};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::{CommandError, load_config};

/// Render the products of each brand.
///
/// # Errors
///
/// Returns `CommandError::Unavailable` when some brand still failed after the
/// user declined to retry (JSON mode never prompts).
pub async fn show(brands: &[String], json: bool) -> Result<(), CommandError> {
    let config = load_config()?;
    let store = CatalogStore::from_config(&config);

    let views: Vec<BrandProducts> = brands
        .iter()
        .map(|brand| BrandProducts::new(store.clone(), config.endpoint.clone(), brand.clone()))
        .collect();
    let mut views = refresh_all(views).await?;

    if json {
        emit(&serde_json::to_string_pretty(&render_json(&views))?);
        return check(&views);
    }

    loop {
        emit(&views.iter().map(render_text).collect::<Vec<_>>().join("\n"));

        if check(&views).is_ok() || !ask_retry().await? {
            return check(&views);
        }

        // Brands that already rendered are left as they are
        let (failed, ok): (Vec<_>, Vec<_>) =
            views.into_iter().partition(|v| v.state().error.is_some());
        let mut retried = refresh_all(failed).await?;
        views = ok;
        views.append(&mut retried);
        views.sort_by_key(|view| brands.iter().position(|b| b == view.brand()));
    }
}

/// Refresh every view concurrently, preserving order.
async fn refresh_all(views: Vec<BrandProducts>) -> Result<Vec<BrandProducts>, CommandError> {
    let handles: Vec<_> = views
        .into_iter()
        .map(|view| {
            tokio::spawn(async move {
                view.refresh().await;
                view
            })
        })
        .collect();

    let mut refreshed = Vec::with_capacity(handles.len());
    for handle in handles {
        refreshed.push(handle.await?);
    }
    Ok(refreshed)
}

fn check(views: &[BrandProducts]) -> Result<(), CommandError> {
    let failed: Vec<String> = views
        .iter()
        .filter(|view| view.state().error.is_some())
        .map(|view| view.brand().to_string())
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CommandError::Unavailable(failed))
    }
}

/// Ask `Retry? [y/N]` on the terminal.
async fn ask_retry() -> Result<bool, CommandError> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Retry? [y/N] ").await?;
    stdout.flush().await?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(wants_retry(&answer))
}

fn wants_retry(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[allow(clippy::print_stdout)]
fn emit(output: &str) {
    println!("{output}");
}

fn render_text(view: &BrandProducts) -> String {
    format_state(view.brand(), &view.state())
}

/// Text rendering of one brand panel.
fn format_state(brand: &str, state: &ProductsState) -> String {
    if state.error.is_some() {
        return format!("{brand}: Error: Something went wrong.\n");
    }
    let Some(products) = state.data.as_ref().filter(|_| !state.loading) else {
        return format!("{brand}: Loading...\n");
    };

    let mut out = format!("{brand} Products:\n");
    if products.is_empty() {
        out.push_str("  (none)\n");
    }
    for product in products {
        let _ = writeln!(out, "  {} - {}", product.title, product.price.display());
        let _ = writeln!(out, "    {}", product.description);
    }
    out
}

fn render_json(views: &[BrandProducts]) -> Value {
    Value::Array(
        views
            .iter()
            .map(|view| {
                let state = view.state();
                json!({
                    "brand": view.brand(),
                    "products": state.data,
                    "error": state.error.map(|err| err.to_string()),
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use brandview_catalog::FetchError;
    use brandview_core::{Price, Product, ProductId};

    use super::*;

    fn phone(id: i64, title: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            brand: Some("Apple".to_string()),
            title: title.to_string(),
            thumbnail: String::new(),
            description: "A phone".to_string(),
            price: Price::from_cents(cents),
            rating: 4.5,
        }
    }

    #[test]
    fn test_format_products() {
        let state = ProductsState {
            data: Some(vec![phone(1, "iPhone 9", 54_900), phone(2, "iPhone X", 89_999)]),
            loading: false,
            error: None,
        };

        assert_eq!(
            format_state("Apple", &state),
            "Apple Products:\n  iPhone 9 - $549.00\n    A phone\n  iPhone X - $899.99\n    A phone\n"
        );
    }

    #[test]
    fn test_format_error_hides_details() {
        let state = ProductsState {
            data: Some(vec![phone(1, "iPhone 9", 54_900)]),
            loading: false,
            error: Some(FetchError::Abandoned),
        };

        assert_eq!(
            format_state("Apple", &state),
            "Apple: Error: Something went wrong.\n"
        );
    }

    #[test]
    fn test_format_loading_and_empty() {
        assert_eq!(
            format_state("Oppo", &ProductsState::default()),
            "Oppo: Loading...\n"
        );

        let empty = ProductsState {
            data: Some(vec![]),
            loading: false,
            error: None,
        };
        assert_eq!(format_state("Oppo", &empty), "Oppo Products:\n  (none)\n");
    }

    #[test]
    fn test_wants_retry() {
        assert!(wants_retry("y\n"));
        assert!(wants_retry(" YES "));
        assert!(!wants_retry("\n"));
        assert!(!wants_retry("n"));
        assert!(!wants_retry(""));
    }
}
