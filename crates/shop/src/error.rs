//! Unified error handling for the shop crate.
//!
//! [`ShopError`] covers store operations and wraps the storage and snapshot
//! errors beneath them. Catalog and checkout keep their own error enums.

use perfume_house_core::ProductId;
use thiserror::Error;

use crate::snapshot::SnapshotError;
use crate::storage::StorageError;

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum ShopError {
    /// A quantity that can never describe a cart line.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Adding units would overflow the line's quantity.
    #[error("quantity overflow for product {product_id}")]
    QuantityOverflow { product_id: ProductId },

    /// The cart total would no longer fit in a `Decimal`.
    #[error("cart total overflow adding product {product_id}")]
    TotalOverflow { product_id: ProductId },

    /// The product has no line in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A collection could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

}

/// Result type alias for `ShopError`.
pub type Result<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_error_display() {
        let err = ShopError::NotInCart(ProductId::new("velvet-rose"));
        assert_eq!(err.to_string(), "product velvet-rose is not in the cart");

        let err = ShopError::InvalidQuantity(-3);
        assert_eq!(err.to_string(), "invalid quantity: -3");
    }

    #[test]
    fn test_storage_error_converts() {
        let err: ShopError = StorageError::Unavailable("disk full".to_string()).into();
        assert!(matches!(err, ShopError::Storage(_)));
        assert_eq!(err.to_string(), "storage error: storage unavailable: disk full");
    }
}
