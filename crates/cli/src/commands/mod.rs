//! Command implementations and the helpers they share.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use std::path::PathBuf;

use perfume_house_core::{Price, Product, ProductId};
use perfume_house_shop::{Catalog, FileStore, ShopConfig, ShopStore, TracingNotifier};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

/// Store backed by the on-disk data directory.
pub type Store = ShopStore<Product, FileStore, TracingNotifier>;

/// Errors specific to the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog file does not exist.
    #[error("Catalog not found: {0} (set PERFUME_HOUSE_CATALOG)")]
    CatalogNotFound(PathBuf),
}

/// Open the store in the configured data directory.
pub fn open_store(config: &ShopConfig) -> Store {
    debug!(data_dir = %config.data_dir.display(), "Opening store");
    ShopStore::open(FileStore::new(&config.data_dir), TracingNotifier)
}

/// Read and parse the configured catalog (JSON if the extension says so, YAML otherwise).
pub async fn load_catalog(config: &ShopConfig) -> Result<Catalog, Box<dyn std::error::Error>> {
    let path = &config.catalog_path;
    if !path.exists() {
        return Err(CliError::CatalogNotFound(path.clone()).into());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let catalog = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Catalog::from_json(&content)?,
        _ => Catalog::from_yaml(&content)?,
    };

    debug!(path = %path.display(), products = catalog.products().len(), "Loaded catalog");
    Ok(catalog)
}

/// Resolve a product id against the catalog.
pub async fn find_product(
    config: &ShopConfig,
    id: &str,
) -> Result<Product, Box<dyn std::error::Error>> {
    let catalog = load_catalog(config).await?;
    Ok(catalog.require(&ProductId::new(id))?.clone())
}

/// Format an amount with the configured currency symbol.
///
/// Catalog prices are taken to be in that currency already; nothing is converted.
pub fn money(config: &ShopConfig, amount: Decimal) -> String {
    Price::new(amount, config.currency).display()
}

/// Log one product as a listing row.
pub fn log_product(config: &ShopConfig, product: &Product) {
    info!(
        "  {:<20} {:<28} {:>12}  {}ml{}{}",
        product.id.as_str(),
        product.name,
        money(config, product.price),
        product.size,
        if product.is_limited { "  [limited]" } else { "" },
        if product.in_stock { "" } else { "  [out of stock]" },
    );
}
