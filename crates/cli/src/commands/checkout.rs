//! Checkout command.

use perfume_house_core::PaymentMethod;
use perfume_house_shop::{ShippingInfo, ShopConfig, place_order};
use tracing::info;

use super::{money, open_store};

/// Place an order for the current cart.
///
/// # Errors
///
/// Returns an error if the cart is empty or the shipping details are invalid.
/// The cart is left untouched in that case and the caller reports the error.
pub fn place(
    config: &ShopConfig,
    shipping: &ShippingInfo,
    payment_method: PaymentMethod,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config);

    let confirmation = place_order(&mut store, shipping, payment_method, config.tax_rate)?;

    info!("Order Confirmed");
    info!("  Order number: {}", confirmation.order_number);
    info!("  Payment: {}", confirmation.payment_method.label());
    info!("  Total: {}", money(config, confirmation.summary.total));
    info!(
        "  Ship to: {}, {}, {}, {} {}, {}",
        confirmation.shipping.full_name,
        confirmation.shipping.address,
        confirmation.shipping.city,
        confirmation.shipping.state,
        confirmation.shipping.postal_code,
        confirmation.shipping.country,
    );
    Ok(())
}
