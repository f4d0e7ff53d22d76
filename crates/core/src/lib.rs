//! Perfume House Core - Shared types library.
//!
//! This crate provides common types used across all Perfume House components:
//! - `shop` - Cart and wishlist store, catalog queries, checkout rules
//! - `cli` - Command-line front end for the store
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no notifications. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, contact details, statuses,
//!   and the catalog [`Product`] record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
