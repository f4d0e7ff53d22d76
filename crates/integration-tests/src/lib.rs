//! Integration tests for Perfume House.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p perfume-house-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `persistence` - Cart and wishlist surviving a restart on the file backend
//! - `checkout_flow` - Catalog lookup through order placement
//! - `observers` - Change events delivered to subscribers
//!
//! Every test gets its own [`TestDir`] under the system temp directory, so the
//! suite runs in parallel without shared state.

use std::path::{Path, PathBuf};

use perfume_house_core::Product;
use perfume_house_shop::{Catalog, FileStore, RecordingNotifier, ShopStore};

/// Store type exercised by the file-backed tests.
pub type FileShop = ShopStore<Product, FileStore, RecordingNotifier>;

/// Scratch data directory removed on drop.
#[derive(Debug)]
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    /// Allocate a unique, not-yet-created directory path.
    #[must_use]
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("perfume-house-it-{}", uuid::Uuid::new_v4()));
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn key_file(&self, key: &str) -> PathBuf {
        self.path.join(format!("{key}.json"))
    }

    /// Open a store on this directory with a fresh recorder.
    #[must_use]
    pub fn open_shop(&self) -> (FileShop, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let store = ShopStore::open(FileStore::new(&self.path), notifier.clone());
        (store, notifier)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        // Best effort
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Small catalog shared by the integration tests.
pub const SAMPLE_CATALOG: &str = r#"
- id: rose-oud
  name: Rose Oud
  price: "4999"
  category: Oriental
  gender: unisex
  isLimited: true
  size: 50
  featured: true
- id: citrus-veil
  name: Citrus Veil
  price: "2499"
  category: Fresh
  gender: women
  size: 100
- id: vetiver-noir
  name: Vetiver Noir
  price: "3799.50"
  category: Woody
  gender: men
  size: 75
"#;

/// Parse [`SAMPLE_CATALOG`].
///
/// # Panics
///
/// Panics if the embedded catalog stops parsing.
#[must_use]
pub fn sample_catalog() -> Catalog {
    Catalog::from_yaml(SAMPLE_CATALOG).expect("sample catalog parses")
}
