//! Perfume House Shop - cart and wishlist store.
//!
//! [`ShopStore`] is the single source of truth for what a shopper has in
//! their cart and wishlist. It enforces the collection invariants, derives
//! totals on every read, writes every change straight through to a
//! [`KeyValueStore`], and tells the user and any subscribers what happened.
//!
//! # Modules
//!
//! - [`store`] - The store, its change events, and the shared handle
//! - [`cart`] / [`wishlist`] - Pure collections that own the invariants
//! - [`storage`] - Persistence port with in-memory and file backends
//! - [`snapshot`] - Versioned encoding of persisted collections
//! - [`notify`] - User-facing notices
//! - [`catalog`] - Product listing filters and sort orders
//! - [`checkout`] - Order summary, shipping validation, order placement
//! - [`config`] - Environment configuration
//!
//! # Example
//!
//! ```rust
//! use perfume_house_core::{Product, ProductId};
//! use perfume_house_shop::{MemoryStore, SilentNotifier, ShopStore};
//!
//! let product: Product =
//!     serde_json::from_str(r#"{"id": "rose-oud", "name": "Rose Oud", "price": 4999}"#)?;
//!
//! let mut store = ShopStore::open(MemoryStore::new(), SilentNotifier);
//! store.add_to_cart(product, 2)?;
//! assert_eq!(store.cart_count(), 2);
//! assert!(!store.is_in_wishlist(&ProductId::new("rose-oud")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod notify;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod wishlist;

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, CatalogError, ProductQuery, SortBy};
pub use checkout::{
    CheckoutError, DEFAULT_TAX_RATE, OrderConfirmation, OrderSummary, ShippingInfo, place_order,
};
pub use config::{ConfigError, ShopConfig};
pub use error::{Result, ShopError};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, SilentNotifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{DEFAULT_QUANTITY, SharedShop, ShopEvent, ShopStore};
pub use wishlist::Wishlist;
