//! MountRush Core - Shared types library.
//!
//! This crate provides common types used across all MountRush components:
//! - `storefront` - Shop session: catalog resolution, cart, wishlist, promos
//! - `admin` - Product override and coupon management
//! - `cli` - Command-line front end for both
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes for product ids, prices, promo codes, and
//!   the product / promo records persisted by the shop

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
