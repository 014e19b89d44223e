//! Unified error handling for admin.

use mountrush_storefront::storage::StorageError;
use thiserror::Error;

/// Error type for admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Pasted or uploaded text is not JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON parsed but is not an array of products.
    #[error("Not an array")]
    NotAnArray,

    /// Export was requested with no override stored.
    #[error("No override products found")]
    NoOverride,

    /// Coupon code was blank.
    #[error("Enter a coupon code")]
    EmptyCode,

    /// Coupon value was below zero.
    #[error("Coupon value must not be negative, got {0}")]
    NegativeValue(String),

    /// The sheet URL answered with a non-success status.
    #[error("Fetch failed: {0}")]
    FetchStatus(u16),

    /// The sheet held no product rows.
    #[error("No rows parsed")]
    NoRows,

    /// The sheet request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading an import file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisting the result failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
