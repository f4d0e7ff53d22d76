//! Catalog browsing commands.

use perfume_house_shop::{ProductQuery, ShopConfig};
use tracing::info;

use super::{load_catalog, log_product};

/// List products matching `query`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn list(
    config: &ShopConfig,
    query: &ProductQuery,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(config).await?;
    let products = catalog.query(query);

    if products.is_empty() {
        info!("No products found. Try adjusting your search or filter criteria");
        return Ok(());
    }

    info!("{} product(s), prices in {}", products.len(), config.currency.code());
    for product in products {
        log_product(config, product);
    }
    Ok(())
}

/// List the catalog's categories.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn categories(config: &ShopConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(config).await?;
    for category in catalog.categories() {
        info!("  {category}");
    }
    Ok(())
}
