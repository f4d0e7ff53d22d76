//! Cart commands.

use perfume_house_core::ProductId;
use perfume_house_shop::{OrderSummary, ShopConfig};
use rust_decimal::Decimal;
use tracing::info;

use super::{find_product, money, open_store};

/// Add `quantity` units of a catalog product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the product is unknown,
/// or the quantity is rejected.
pub async fn add(
    config: &ShopConfig,
    id: &str,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = find_product(config, id).await?;
    let mut store = open_store(config);
    store.add_to_cart(product, quantity)?;
    info!("Cart now holds {} item(s)", store.cart_count());
    Ok(())
}

pub fn remove(config: &ShopConfig, id: &str) {
    let mut store = open_store(config);
    if !store.remove_from_cart(&ProductId::new(id)) {
        info!("{id} was not in the cart");
    }
}

/// Set a line's quantity; zero or less removes the line.
///
/// # Errors
///
/// Returns an error if a positive quantity targets a product not in the cart.
pub fn update(
    config: &ShopConfig,
    id: &str,
    quantity: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config);
    store.update_cart_item_quantity(&ProductId::new(id), quantity)?;
    info!("Cart now holds {} item(s)", store.cart_count());
    Ok(())
}

pub fn clear(config: &ShopConfig) {
    open_store(config).clear_cart();
}

/// Log every line and the order summary.
pub fn show(config: &ShopConfig) {
    let store = open_store(config);
    if store.is_cart_empty() {
        info!("Your cart is empty");
        return;
    }

    info!("Shopping Cart (prices in {})", config.currency.code());
    for line in store.cart() {
        info!(
            "  {:>3} x {:<28} {:>12} {:>12}",
            line.quantity,
            line.product.name,
            money(config, line.product.price),
            money(config, line.line_total()),
        );
    }

    let summary = OrderSummary::from_cart(store.cart_collection(), config.tax_rate);
    let tax_percent = (config.tax_rate * Decimal::ONE_HUNDRED).normalize();
    info!("  Items ({}): {}", summary.item_count, money(config, summary.subtotal));
    info!("  Shipping: Free");
    info!("  Tax ({tax_percent}% GST): {}", money(config, summary.tax));
    info!("  Total: {}", money(config, summary.total));
}
