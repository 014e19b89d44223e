//! Core types for MountRush.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod promo;

pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError};
pub use product::{CartLine, DEFAULT_CATEGORY, PLACEHOLDER_IMAGE, Product};
pub use promo::{ActivePromo, Promo, PromoCode, PromoCodeError, PromoKind, PromoTable};
