//! Wishlist collection: products with set semantics on id, in the order added.

use perfume_house_core::{ProductId, Purchasable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wishlist<P> {
    items: Vec<P>,
}

impl<P> Default for Wishlist<P> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<P: Purchasable> Wishlist<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted products, keeping the first of any duplicates.
    #[must_use]
    pub fn from_items(items: Vec<P>) -> Self {
        let mut wishlist = Self::new();
        for item in items {
            wishlist.insert(item);
        }
        wishlist
    }

    #[must_use]
    pub fn items(&self) -> &[P] {
        &self.items
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| item.product_id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a product unless its id is already present. Returns whether it was added.
    pub fn insert(&mut self, product: P) -> bool {
        if self.contains(product.product_id()) {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Remove a product by id. Returns whether it was present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id() != id);
        self.items.len() != before
    }
}
