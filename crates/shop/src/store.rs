//! The shop store: single source of truth for cart and wishlist contents.
//!
//! Every mutation updates memory, notifies the user, writes the whole affected
//! collection through the [`KeyValueStore`], and broadcasts a [`ShopEvent`] to
//! subscribers. Loading never fails: missing or unreadable data starts empty.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use perfume_house_core::{ProductId, Purchasable};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use crate::cart::{Cart, CartLine, CartRejection};
use crate::error::{Result, ShopError};
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::snapshot;
use crate::storage::{CART_KEY, KeyValueStore, WISHLIST_KEY};
use crate::wishlist::Wishlist;

/// Quantity used by a plain "Add to cart" action.
pub const DEFAULT_QUANTITY: u32 = 1;

const EVENT_CAPACITY: usize = 64;

/// State change broadcast to observers after each mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopEvent {
    CartChanged { count: u64, total: Decimal },
    WishlistChanged { len: usize },
}

/// Cart and wishlist container with write-through persistence.
pub struct ShopStore<P, S, N = TracingNotifier> {
    cart: Cart<P>,
    wishlist: Wishlist<P>,
    storage: S,
    notifier: N,
    events: broadcast::Sender<ShopEvent>,
}

impl<P, S, N> ShopStore<P, S, N>
where
    P: Purchasable + Serialize + DeserializeOwned,
    S: KeyValueStore,
    N: Notifier,
{
    /// Open the store, loading both collections from `storage`.
    ///
    /// A missing key yields an empty collection. Unreadable or malformed data
    /// is logged and also yields an empty collection.
    #[instrument(skip_all)]
    pub fn open(storage: S, notifier: N) -> Self {
        let cart = Cart::from_lines(load_collection::<CartLine<P>>(&storage, CART_KEY));
        let wishlist = Wishlist::from_items(load_collection::<P>(&storage, WISHLIST_KEY));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        debug!(
            cart_lines = cart.len(),
            wishlist_items = wishlist.len(),
            "Shop store opened"
        );

        Self {
            cart,
            wishlist,
            storage,
            notifier,
            events,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Cart lines in insertion order.
    #[must_use]
    pub fn cart(&self) -> &[CartLine<P>] {
        self.cart.lines()
    }

    /// The cart collection itself, for summaries.
    #[must_use]
    pub const fn cart_collection(&self) -> &Cart<P> {
        &self.cart
    }

    #[must_use]
    pub fn cart_line(&self, id: &ProductId) -> Option<&CartLine<P>> {
        self.cart.line(id)
    }

    #[must_use]
    pub fn is_cart_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Sum of `price * quantity` over the cart, recomputed on each call.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart.total()
    }

    /// Sum of quantities over the cart, recomputed on each call.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    /// Wishlist products in the order they were added.
    #[must_use]
    pub fn wishlist(&self) -> &[P] {
        self.wishlist.items()
    }

    #[must_use]
    pub fn is_in_wishlist(&self, id: &ProductId) -> bool {
        self.wishlist.contains(id)
    }

    /// Receive a [`ShopEvent`] after every subsequent mutation.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ShopEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add `quantity` units of `product`, merging into an existing line.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidQuantity` for zero and
    /// `ShopError::QuantityOverflow` if the line would exceed `u32::MAX`.
    /// `ShopError::TotalOverflow` if the cart total would no longer be
    /// representable. The cart is unchanged in every case.
    pub fn add_to_cart(&mut self, product: P, quantity: u32) -> Result<()> {
        let name = product.display_name().to_owned();
        let product_id = product.product_id().clone();

        match self.cart.add(product, quantity) {
            Ok(outcome) => {
                debug!(%product_id, quantity, ?outcome, "Added to cart");
            }
            Err(CartRejection::Overflow) => {
                return Err(ShopError::QuantityOverflow { product_id });
            }
            Err(CartRejection::TotalOverflow) => {
                return Err(ShopError::TotalOverflow { product_id });
            }
            Err(CartRejection::ZeroQuantity | CartRejection::Missing) => {
                return Err(ShopError::InvalidQuantity(i64::from(quantity)));
            }
        }

        self.notifier
            .notify(Notice::success(format!("{name} added to cart")));
        self.cart_changed();
        Ok(())
    }

    /// Remove the line for `id`. Absent ids are not an error.
    ///
    /// Returns whether a line was removed.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> bool {
        let removed = self.cart.remove(id);
        debug!(product_id = %id, removed, "Removed from cart");

        self.notifier.notify(Notice::info("Item removed from cart"));
        self.cart_changed();
        removed
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero or less behaves exactly like [`Self::remove_from_cart`].
    ///
    /// # Errors
    ///
    /// Returns `ShopError::NotInCart` if a positive quantity targets an id with
    /// no line, `ShopError::InvalidQuantity` if it exceeds `u32::MAX`, and
    /// `ShopError::TotalOverflow` if the cart total would overflow.
    pub fn update_cart_item_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return Ok(());
        }

        let quantity =
            u32::try_from(quantity).map_err(|_| ShopError::InvalidQuantity(quantity))?;
        self.cart
            .set_quantity(id, quantity)
            .map_err(|rejection| match rejection {
                CartRejection::TotalOverflow => ShopError::TotalOverflow {
                    product_id: id.clone(),
                },
                _ => ShopError::NotInCart(id.clone()),
            })?;

        debug!(product_id = %id, quantity, "Updated cart quantity");
        self.cart_changed();
        Ok(())
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        debug!("Cleared cart");

        self.notifier.notify(Notice::info("Cart cleared"));
        self.cart_changed();
    }

    // =========================================================================
    // Wishlist mutations
    // =========================================================================

    /// Add `product` unless already present. Returns whether it was added.
    ///
    /// A duplicate is silent: no notification, no write.
    pub fn add_to_wishlist(&mut self, product: P) -> bool {
        let name = product.display_name().to_owned();
        let product_id = product.product_id().clone();

        if !self.wishlist.insert(product) {
            return false;
        }
        debug!(%product_id, "Added to wishlist");

        self.notifier
            .notify(Notice::success(format!("{name} added to wishlist")));
        self.wishlist_changed();
        true
    }

    /// Remove `id` from the wishlist. Returns whether it was present.
    pub fn remove_from_wishlist(&mut self, id: &ProductId) -> bool {
        let removed = self.wishlist.remove(id);
        debug!(product_id = %id, removed, "Removed from wishlist");

        self.notifier
            .notify(Notice::info("Item removed from wishlist"));
        self.wishlist_changed();
        removed
    }

    /// Remove `product` if wishlisted, add it otherwise.
    ///
    /// Returns whether the product is in the wishlist afterwards.
    pub fn toggle_wishlist(&mut self, product: P) -> bool {
        if self.wishlist.contains(product.product_id()) {
            let id = product.product_id().clone();
            self.remove_from_wishlist(&id);
            false
        } else {
            self.add_to_wishlist(product)
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Rewrite both collections to storage.
    ///
    /// Mutations already write through; this is for retrying after a logged
    /// write failure.
    ///
    /// # Errors
    ///
    /// Returns the first encoding or storage error.
    pub fn flush(&self) -> Result<()> {
        self.write_cart()?;
        self.write_wishlist()?;
        Ok(())
    }

    /// Delete both collections from storage and empty them in memory.
    ///
    /// Only the cart and wishlist keys are removed; anything else the backend
    /// holds is left alone.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Storage` if the backend cannot be cleared; memory
    /// is left untouched in that case.
    pub fn clear_storage(&mut self) -> Result<()> {
        self.storage.remove(CART_KEY)?;
        self.storage.remove(WISHLIST_KEY)?;
        self.cart.clear();
        self.wishlist = Wishlist::new();
        info!("Cleared persisted cart and wishlist");

        self.emit(ShopEvent::CartChanged {
            count: 0,
            total: Decimal::ZERO,
        });
        self.emit(ShopEvent::WishlistChanged { len: 0 });
        Ok(())
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    fn write_cart(&self) -> Result<()> {
        let encoded = snapshot::encode(self.cart.lines())?;
        self.storage.set(CART_KEY, &encoded)?;
        Ok(())
    }

    fn write_wishlist(&self) -> Result<()> {
        let encoded = snapshot::encode(self.wishlist.items())?;
        self.storage.set(WISHLIST_KEY, &encoded)?;
        Ok(())
    }

    fn cart_changed(&self) {
        if let Err(e) = self.write_cart() {
            error!(key = CART_KEY, error = %e, "Failed to persist cart");
        }
        self.emit(ShopEvent::CartChanged {
            count: self.cart.count(),
            total: self.cart.total(),
        });
    }

    fn wishlist_changed(&self) {
        if let Err(e) = self.write_wishlist() {
            error!(key = WISHLIST_KEY, error = %e, "Failed to persist wishlist");
        }
        self.emit(ShopEvent::WishlistChanged {
            len: self.wishlist.len(),
        });
    }

    fn emit(&self, event: ShopEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn load_collection<T: DeserializeOwned>(storage: &impl KeyValueStore, key: &str) -> Vec<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored collection, starting empty");
            return Vec::new();
        }
    };

    match snapshot::decode::<T>(&raw) {
        Ok(decoded) => {
            if decoded.is_legacy() {
                info!(key, items = decoded.items.len(), "Loaded unversioned collection");
            }
            decoded.items
        }
        Err(e) => {
            warn!(key, error = %e, "Discarding unreadable stored collection");
            Vec::new()
        }
    }
}

/// Cloneable, mutex-guarded handle for hosts that share one store across threads.
pub struct SharedShop<P, S, N = TracingNotifier> {
    inner: Arc<Mutex<ShopStore<P, S, N>>>,
}

impl<P, S, N> Clone for SharedShop<P, S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, S, N> SharedShop<P, S, N> {
    #[must_use]
    pub fn new(store: ShopStore<P, S, N>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Exclusive access for one operation or a sequence of them.
    ///
    /// A poisoned lock is recovered: every mutation leaves the collections
    /// consistent before it can panic.
    pub fn lock(&self) -> MutexGuard<'_, ShopStore<P, S, N>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
