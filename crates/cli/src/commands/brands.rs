//! `brands` command: catalog summary by brand.

use std::fmt::Write as _;

use brandview_catalog::CatalogStore;
use brandview_core::ProductCatalogResponse;

use super::{CommandError, load_config};

/// Print every brand in the catalog with its product count.
///
/// # Errors
///
/// Returns `CommandError::Catalog` if the catalog cannot be fetched.
pub async fn list() -> Result<(), CommandError> {
    let config = load_config()?;
    let store = CatalogStore::from_config(&config);

    let catalog = store.load(&config.endpoint).await?;
    tracing::info!(
        products = catalog.products.len(),
        total = catalog.total,
        "Catalog loaded"
    );

    emit(&summarize(&catalog));
    Ok(())
}

#[allow(clippy::print_stdout)]
fn emit(output: &str) {
    print!("{output}");
}

fn summarize(catalog: &ProductCatalogResponse) -> String {
    let brands = catalog.brands();
    let width = brands.iter().map(|(brand, _)| brand.len()).max().unwrap_or(0);

    let mut out: String = brands
        .iter()
        .map(|(brand, count)| format!("{brand:<width$}  {count}\n"))
        .collect();

    let unbranded = catalog.products.iter().filter(|p| p.brand.is_none()).count();
    if unbranded > 0 {
        let _ = writeln!(out, "({unbranded} without a brand)");
    }
    out
}

#[cfg(test)]
mod tests {
    use brandview_core::{Price, Product, ProductId};

    use super::*;

    fn product(id: i64, brand: Option<&str>) -> Product {
        Product {
            id: ProductId::new(id),
            brand: brand.map(str::to_string),
            title: format!("Product {id}"),
            thumbnail: String::new(),
            description: String::new(),
            price: Price::from_cents(100),
            rating: 4.0,
        }
    }

    #[test]
    fn test_summarize_aligns_counts() {
        let catalog = ProductCatalogResponse {
            products: vec![
                product(1, Some("Samsung")),
                product(2, Some("Apple")),
                product(3, Some("Samsung")),
                product(4, None),
            ],
            limit: 30,
            skip: 0,
            total: 4,
        };

        assert_eq!(
            summarize(&catalog),
            "Apple    1\nSamsung  2\n(1 without a brand)\n"
        );
    }
}
