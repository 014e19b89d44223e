//! MountRush shop front.
//!
//! Catalog resolution, the cart and its pricing, promo codes, the wishlist
//! and persistence of all of it through a [`storage::KeyValueStore`]. The
//! [`session::ShopSession`] ties these together for one shopper.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod promo;
pub mod session;
pub mod storage;
pub mod wishlist;

pub use error::{CheckoutError, ShopError};
pub use session::{Receipt, ShopSession};
