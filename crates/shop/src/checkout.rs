//! Checkout rules: order summary, shipping validation, and order placement.
//!
//! Placing an order consumes the cart: the confirmation captures the lines and
//! totals, then the cart is cleared through the store (which persists it).

use chrono::{DateTime, Utc};
use perfume_house_core::{
    Email, EmailError, OrderNumber, OrderStatus, PaymentMethod, PhoneError, PhoneNumber,
    Purchasable,
};
use rand::Rng;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::cart::{Cart, CartLine};
use crate::notify::{Notice, Notifier};
use crate::storage::KeyValueStore;
use crate::store::ShopStore;

/// Goods and services tax applied to the cart subtotal (18%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Country preselected on the shipping form.
pub const DEFAULT_COUNTRY: &str = "India";

/// Reasons checkout refused to place an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cannot check out an empty cart")]
    EmptyCart,

    #[error("please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("please enter a valid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("please enter a valid 10-digit Indian phone number: {0}")]
    InvalidPhone(#[from] PhoneError),
}

/// Totals shown beside the cart and on the confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub item_count: u64,
    pub subtotal: Decimal,
    /// Always zero; shipping is free.
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Compute totals for a cart at `tax_rate` (e.g. `0.18`).
    ///
    /// Amounts saturate at `Decimal::MAX` instead of overflowing.
    #[must_use]
    pub fn from_cart<P: Purchasable>(cart: &Cart<P>, tax_rate: Decimal) -> Self {
        let subtotal = cart.total();
        let tax = subtotal.saturating_mul(tax_rate).round_dp(2);
        Self {
            item_count: cart.count(),
            subtotal,
            shipping: Decimal::ZERO,
            tax,
            total: subtotal.saturating_add(tax),
        }
    }
}

/// Shipping details as entered on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for ShippingInfo {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// Shipping details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedShipping {
    pub full_name: String,
    pub email: Email,
    pub phone: PhoneNumber,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingInfo {
    /// Check required fields, then email, then phone.
    ///
    /// # Errors
    ///
    /// `MissingFields` lists every blank required field at once; otherwise the
    /// first invalid email or phone is reported.
    pub fn validate(&self) -> Result<ValidatedShipping, CheckoutError> {
        let required = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("postalCode", &self.postal_code),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }

        let email = Email::parse(self.email.trim())?;
        let phone = PhoneNumber::parse(self.phone.trim())?;

        let country = match self.country.trim() {
            "" => DEFAULT_COUNTRY.to_string(),
            country => country.to_string(),
        };

        Ok(ValidatedShipping {
            full_name: self.full_name.trim().to_string(),
            email,
            phone,
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country,
        })
    }
}

/// Everything the confirmation page shows about a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation<P> {
    pub order_number: OrderNumber,
    pub lines: Vec<CartLine<P>>,
    pub summary: OrderSummary,
    pub shipping: ValidatedShipping,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

/// Generate a storefront order number, `PH-` followed by six digits.
#[must_use]
pub fn generate_order_number() -> OrderNumber {
    OrderNumber::from_sequence(rand::rng().random_range(100_000..1_000_000))
}

/// Place an order for everything in the cart.
///
/// On success the cart is cleared (and persisted empty) and a success notice
/// is emitted. On failure nothing changes.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for an empty cart, or the shipping
/// validation error.
#[instrument(skip_all, fields(payment_method = %payment_method))]
pub fn place_order<P, S, N>(
    store: &mut ShopStore<P, S, N>,
    shipping: &ShippingInfo,
    payment_method: PaymentMethod,
    tax_rate: Decimal,
) -> Result<OrderConfirmation<P>, CheckoutError>
where
    P: Purchasable + Clone + Serialize + DeserializeOwned,
    S: KeyValueStore,
    N: Notifier,
{
    if store.is_cart_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let shipping = shipping.validate()?;

    let confirmation = OrderConfirmation {
        order_number: generate_order_number(),
        lines: store.cart().to_vec(),
        summary: OrderSummary::from_cart(store.cart_collection(), tax_rate),
        shipping,
        payment_method,
        status: OrderStatus::Pending,
        placed_at: Utc::now(),
    };

    info!(
        order_number = %confirmation.order_number,
        items = confirmation.summary.item_count,
        total = %confirmation.summary.total,
        "Order placed"
    );
    store.notify(Notice::success("Order placed successfully!"));
    store.clear_cart();

    Ok(confirmation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::storage::{CART_KEY, MemoryStore};
    use crate::testing::item;

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.in".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            ..ShippingInfo::default()
        }
    }

    #[test]
    fn test_default_tax_rate_is_eighteen_percent() {
        assert_eq!(DEFAULT_TAX_RATE, Decimal::new(18, 2));
    }

    #[test]
    fn test_summary_adds_tax() {
        let mut cart = Cart::new();
        cart.add(item("p1", 2499), 2).unwrap();
        cart.add(item("p2", 1), 1).unwrap();

        let summary = OrderSummary::from_cart(&cart, DEFAULT_TAX_RATE);
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal, Decimal::from(4999));
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.tax, Decimal::new(89_982, 2));
        assert_eq!(summary.total, Decimal::new(589_882, 2));
    }

    #[test]
    fn test_summary_of_maximal_cart_does_not_overflow() {
        let mut cart = Cart::new();
        let huge = crate::testing::Item {
            price: Decimal::MAX,
            ..item("huge", 0)
        };
        cart.add(huge, 1).unwrap();

        let summary = OrderSummary::from_cart(&cart, DEFAULT_TAX_RATE);
        assert_eq!(summary.subtotal, Decimal::MAX);
        assert_eq!(summary.total, Decimal::MAX);
    }

    #[test]
    fn test_validate_lists_all_missing_fields() {
        let info = ShippingInfo {
            full_name: "Asha".to_string(),
            email: "   ".to_string(),
            ..ShippingInfo::default()
        };
        let err = info.validate().unwrap_err();
        assert_eq!(
            err,
            CheckoutError::MissingFields(vec![
                "email",
                "phone",
                "address",
                "city",
                "state",
                "postalCode"
            ])
        );
        assert!(err.to_string().starts_with("please fill in all required fields: email, phone"));
    }

    #[test]
    fn test_validate_email_then_phone() {
        let mut info = shipping();
        info.email = "asha@localhost".to_string();
        info.phone = "123".to_string();
        assert!(matches!(
            info.validate(),
            Err(CheckoutError::InvalidEmail(_))
        ));

        info.email = "asha@example.in".to_string();
        assert!(matches!(
            info.validate(),
            Err(CheckoutError::InvalidPhone(_))
        ));
    }

    #[test]
    fn test_validate_defaults_country() {
        let mut info = shipping();
        info.country = String::new();
        assert_eq!(info.validate().unwrap().country, "India");
    }

    #[test]
    fn test_place_order_clears_cart() {
        let storage = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let mut store = ShopStore::open(storage.clone(), notifier.clone());
        store.add_to_cart(item("p1", 1000), 3).unwrap();

        let confirmation =
            place_order(&mut store, &shipping(), PaymentMethod::Upi, DEFAULT_TAX_RATE).unwrap();

        assert!(confirmation.order_number.as_str().starts_with("PH-"));
        assert_eq!(confirmation.order_number.as_str().len(), 9);
        assert_eq!(confirmation.lines.len(), 1);
        assert_eq!(confirmation.summary.total, Decimal::from(3540));
        assert_eq!(confirmation.status, OrderStatus::Pending);
        assert_eq!(confirmation.payment_method, PaymentMethod::Upi);

        assert!(store.is_cart_empty());
        assert_eq!(
            storage.get(CART_KEY).unwrap().as_deref(),
            Some(r#"{"version":1,"items":[]}"#)
        );
        assert!(
            notifier
                .messages()
                .contains(&"Order placed successfully!".to_string())
        );
    }

    #[test]
    fn test_place_order_rejects_empty_cart_and_bad_shipping() {
        let mut store = ShopStore::open(MemoryStore::new(), RecordingNotifier::new());
        let err = place_order::<crate::testing::Item, _, _>(
            &mut store,
            &shipping(),
            PaymentMethod::Card,
            DEFAULT_TAX_RATE,
        )
        .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);

        store.add_to_cart(item("p1", 10), 1).unwrap();
        let err = place_order(
            &mut store,
            &ShippingInfo::default(),
            PaymentMethod::Card,
            DEFAULT_TAX_RATE,
        )
        .unwrap_err();
        assert!(matches!(err, CheckoutError::MissingFields(_)));
        assert_eq!(store.cart_count(), 1);
    }
}
