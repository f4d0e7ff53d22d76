//! Cart collection.
//!
//! Pure in-memory rules: one line per product id, every quantity at least 1,
//! totals recomputed on every read. Persistence and notifications live in
//! [`crate::store`].

use perfume_house_core::{ProductId, Purchasable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One distinct product in the cart and how many units of it.
///
/// Serializes as `{"product": ..., "quantity": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine<P> {
    pub product: P,
    pub quantity: u32,
}

impl<P: Purchasable> CartLine<P> {
    /// Unit price times quantity, saturating at `Decimal::MAX`.
    ///
    /// Lines inside a [`Cart`] never saturate: the cart refuses any mutation
    /// whose total would overflow.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or(Decimal::MAX)
    }

    /// Unit price times quantity, or `None` on overflow.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        line_total(&self.product, self.quantity)
    }
}

fn line_total<P: Purchasable>(product: &P, quantity: u32) -> Option<Decimal> {
    product.unit_price().checked_mul(Decimal::from(quantity))
}

/// Outcome of adding units to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Inserted,
    /// An existing line grew to the given quantity.
    Incremented { quantity: u32 },
}

/// Reasons a cart mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartRejection {
    /// Quantity was zero.
    ZeroQuantity,
    /// Incrementing would overflow the line's quantity.
    Overflow,
    /// The cart total would overflow `Decimal`.
    TotalOverflow,
    /// No line for the product id.
    Missing,
}

/// Ordered cart lines, unique on product id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart<P> {
    lines: Vec<CartLine<P>>,
}

impl<P> Default for Cart<P> {
    fn default() -> Self {
        Self { lines: Vec::new() }
    }
}

impl<P: Purchasable> Cart<P> {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted lines.
    ///
    /// Lines with a zero quantity are dropped and repeated product ids are
    /// merged, so the invariants hold whatever the storage contained.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine<P>>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            let product_id = line.product.product_id().clone();
            if let Err(rejection) = cart.add(line.product, line.quantity) {
                warn!(%product_id, ?rejection, "Dropping stored cart line");
            }
        }
        cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine<P>] {
        &self.lines
    }

    /// Line for a product id, if present.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine<P>> {
        self.lines.iter().find(|line| line.product.product_id() == id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Add units of a product, merging into an existing line.
    ///
    /// The stored product snapshot is kept from the first add.
    ///
    /// # Errors
    ///
    /// Rejects a zero quantity, increments that would overflow `u32`, and
    /// anything that would push the total past `Decimal::MAX`. A rejected
    /// add leaves the cart unchanged.
    pub fn add(&mut self, product: P, quantity: u32) -> Result<AddOutcome, CartRejection> {
        if quantity == 0 {
            return Err(CartRejection::ZeroQuantity);
        }

        let existing = self.position(product.product_id());
        let Some(index) = existing else {
            self.total_with(&product, quantity)
                .ok_or(CartRejection::TotalOverflow)?;
            self.lines.push(CartLine { product, quantity });
            return Ok(AddOutcome::Inserted);
        };

        let quantity = self.grow(index, quantity)?;
        Ok(AddOutcome::Incremented { quantity })
    }

    /// Raise the line at `index` by `extra` units after checking both limits.
    fn grow(&mut self, index: usize, extra: u32) -> Result<u32, CartRejection> {
        let line = self.lines.get(index).ok_or(CartRejection::Missing)?;
        let quantity = line
            .quantity
            .checked_add(extra)
            .ok_or(CartRejection::Overflow)?;
        self.total_with(&line.product, quantity)
            .ok_or(CartRejection::TotalOverflow)?;

        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        Ok(quantity)
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product.product_id() == id)
    }

    /// Exact total if `product`'s line held `quantity` units.
    fn total_with(&self, product: &P, quantity: u32) -> Option<Decimal> {
        let id = product.product_id();
        self.lines
            .iter()
            .filter(|line| line.product.product_id() != id)
            .try_fold(line_total(product, quantity)?, |total, line| {
                total.checked_add(line.checked_line_total()?)
            })
    }

    /// Remove the line for a product id. Returns whether a line was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.product_id() != id);
        self.lines.len() != before
    }

    /// Set an existing line to an absolute quantity.
    ///
    /// # Errors
    ///
    /// Rejects a zero quantity, ids with no line, and quantities that would
    /// push the total past `Decimal::MAX`.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> Result<(), CartRejection> {
        if quantity == 0 {
            return Err(CartRejection::ZeroQuantity);
        }
        let index = self.position(id).ok_or(CartRejection::Missing)?;
        let line = self.lines.get(index).ok_or(CartRejection::Missing)?;
        self.total_with(&line.product, quantity)
            .ok_or(CartRejection::TotalOverflow)?;

        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
