//! Integration tests for change events delivered to store subscribers.

#![allow(clippy::unwrap_used)]

use perfume_house_core::ProductId;
use perfume_house_integration_tests::{TestDir, sample_catalog};
use perfume_house_shop::{SharedShop, ShopEvent};
use rust_decimal::Decimal;

#[tokio::test]
async fn test_subscriber_sees_every_mutation() {
    let dir = TestDir::new();
    let (mut store, _) = dir.open_shop();
    let mut events = store.subscribe();
    let rose = sample_catalog()
        .require(&ProductId::new("rose-oud"))
        .unwrap()
        .clone();

    store.add_to_cart(rose.clone(), 2).unwrap();
    store.toggle_wishlist(rose);
    store.clear_cart();

    assert_eq!(
        events.recv().await.unwrap(),
        ShopEvent::CartChanged {
            count: 2,
            total: Decimal::from(9998)
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        ShopEvent::WishlistChanged { len: 1 }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        ShopEvent::CartChanged {
            count: 0,
            total: Decimal::ZERO
        }
    );
}

#[tokio::test]
async fn test_shared_shop_across_tasks() {
    let dir = TestDir::new();
    let (store, _) = dir.open_shop();
    let shop = SharedShop::new(store);
    let catalog = sample_catalog();

    let mut handles = Vec::new();
    for product in catalog.products().iter().cloned() {
        let shop = shop.clone();
        handles.push(tokio::spawn(async move {
            shop.lock().add_to_cart(product, 1).unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(shop.lock().cart_count(), 3);
    let (reopened, _) = dir.open_shop();
    assert_eq!(reopened.cart().len(), 3);
}
