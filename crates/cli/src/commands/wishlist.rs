//! Wishlist commands.

use perfume_house_core::ProductId;
use perfume_house_shop::ShopConfig;
use tracing::info;

use super::{find_product, log_product, open_store};

/// Add a catalog product to the wishlist.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the product is unknown.
pub async fn add(config: &ShopConfig, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = find_product(config, id).await?;
    if !open_store(config).add_to_wishlist(product) {
        info!("{id} is already in your wishlist");
    }
    Ok(())
}

pub fn remove(config: &ShopConfig, id: &str) {
    open_store(config).remove_from_wishlist(&ProductId::new(id));
}

/// Flip a catalog product in or out of the wishlist.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the product is unknown.
pub async fn toggle(config: &ShopConfig, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = find_product(config, id).await?;
    open_store(config).toggle_wishlist(product);
    Ok(())
}

pub fn show(config: &ShopConfig) {
    let store = open_store(config);
    if store.wishlist().is_empty() {
        info!("Your wishlist is empty");
        return;
    }

    info!("Wishlist ({})", store.wishlist().len());
    for product in store.wishlist() {
        log_product(config, product);
    }
}
