//! Unified error handling for shop sessions.
//!
//! Individual concerns keep their own error enums; `ShopError` wraps them so
//! session methods can return one type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Checkout could not proceed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,
}

/// Session-level error type for the storefront.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Persisting shop state failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout was refused.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for shop operations.
pub type Result<T> = std::result::Result<T, ShopError>;
