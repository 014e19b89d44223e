//! MountRush admin surface.
//!
//! Manages the product override list and the promo table that the shop
//! reads from the same key-value store, and imports products from a
//! published spreadsheet.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod coupons;
pub mod csv_import;
pub mod error;
pub mod products;

pub use error::{AdminError, Result};
