//! Persistence port for the shop store.
//!
//! The store never touches a concrete backend. It reads and writes whole
//! serialized collections through [`KeyValueStore`], so tests can swap in
//! [`MemoryStore`] and the CLI uses [`FileStore`].
//!
//! # Keys
//!
//! - [`CART_KEY`] - serialized cart lines
//! - [`WISHLIST_KEY`] - serialized wishlist products

mod file;
mod memory;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Key holding the serialized wishlist.
pub const WISHLIST_KEY: &str = "wishlist";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a key failed at the I/O layer.
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),

    /// The backend cannot be used right now.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key-value store.
///
/// All methods take `&self`; implementations use interior mutability so a
/// store can be shared behind an `Arc`.
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value by key.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
