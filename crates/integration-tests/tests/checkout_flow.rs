//! Integration tests for browsing the catalog through placing an order.

#![allow(clippy::unwrap_used)]

use perfume_house_core::{Gender, OrderStatus, PaymentMethod, ProductId};
use perfume_house_integration_tests::{TestDir, sample_catalog};
use perfume_house_shop::{
    CatalogError, CheckoutError, DEFAULT_TAX_RATE, OrderSummary, ProductQuery, ShippingInfo,
    SortBy, place_order,
};
use rust_decimal::Decimal;

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

// =============================================================================
// Catalog Queries
// =============================================================================

#[test]
fn test_catalog_filters_and_sorts() {
    let catalog = sample_catalog();

    let query = ProductQuery {
        sort_by: SortBy::PriceAsc,
        ..ProductQuery::default()
    };
    let names: Vec<&str> = catalog
        .query(&query)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Citrus Veil", "Vetiver Noir", "Rose Oud"]);

    let query = ProductQuery {
        gender: Some(Gender::Men),
        ..ProductQuery::default()
    };
    assert_eq!(catalog.query(&query).len(), 1);

    let query = ProductQuery {
        limited_only: true,
        ..ProductQuery::default()
    };
    assert_eq!(catalog.query(&query)[0].id.as_str(), "rose-oud");
}

#[test]
fn test_unknown_product_is_rejected() {
    let catalog = sample_catalog();
    assert!(matches!(
        catalog.require(&ProductId::new("no-such-scent")),
        Err(CatalogError::UnknownProduct(_))
    ));
}

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn test_browse_add_and_place_order() {
    let dir = TestDir::new();
    let catalog = sample_catalog();
    let (mut store, notifier) = dir.open_shop();

    for id in ["rose-oud", "vetiver-noir"] {
        let product = catalog.require(&ProductId::new(id)).unwrap().clone();
        store.add_to_cart(product, 1).unwrap();
    }
    store
        .update_cart_item_quantity(&ProductId::new("vetiver-noir"), 2)
        .unwrap();

    let summary = OrderSummary::from_cart(store.cart_collection(), DEFAULT_TAX_RATE);
    assert_eq!(summary.item_count, 3);
    assert_eq!(summary.subtotal, Decimal::new(1_259_800, 2));
    assert_eq!(summary.tax, Decimal::new(226_764, 2));
    assert_eq!(summary.total, Decimal::new(1_486_564, 2));

    let confirmation =
        place_order(&mut store, &shipping(), PaymentMethod::Cod, DEFAULT_TAX_RATE).unwrap();
    assert_eq!(confirmation.summary, summary);
    assert_eq!(confirmation.lines.len(), 2);
    assert_eq!(confirmation.status, OrderStatus::Pending);
    assert_eq!(confirmation.shipping.country, "India");
    assert!(confirmation.order_number.as_str().starts_with("PH-"));

    let messages = notifier.messages();
    assert!(messages.contains(&"Order placed successfully!".to_string()));
    assert_eq!(messages.last().map(String::as_str), Some("Cart cleared"));

    // The emptied cart is what a restarted process sees
    let (reopened, _) = dir.open_shop();
    assert!(reopened.is_cart_empty());
}

#[test]
fn test_invalid_shipping_keeps_cart() {
    let dir = TestDir::new();
    let (mut store, _) = dir.open_shop();
    let product = sample_catalog()
        .require(&ProductId::new("citrus-veil"))
        .unwrap()
        .clone();
    store.add_to_cart(product, 2).unwrap();

    let mut info = shipping();
    info.phone = "12345".to_string();
    let err = place_order(&mut store, &info, PaymentMethod::Card, DEFAULT_TAX_RATE).unwrap_err();
    assert!(matches!(err, CheckoutError::InvalidPhone(_)));

    let (reopened, _) = dir.open_shop();
    assert_eq!(reopened.cart_count(), 2);
}
