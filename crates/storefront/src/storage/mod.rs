//! Durable key-value storage for shop state.
//!
//! The shop persists everything as JSON strings under a handful of fixed keys
//! (see [`storage_keys`]). Any store that can get, set and remove strings works;
//! two are provided:
//!
//! - [`MemoryStore`] - `HashMap`-backed, for tests and throwaway sessions
//! - [`JsonFileStore`] - a single JSON file on disk, written through on every change
//!
//! Values read back are validated into strict types by [`codec`]; anything
//! malformed degrades to "absent" rather than failing the caller.

pub mod codec;
mod file;
mod memory;

use serde::Serialize;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Keys under which shop state is persisted.
pub mod storage_keys {
    /// Product override list written by the admin surface.
    pub const PRODUCTS: &str = "mountrush_products";
    /// Promo table (code -> promo).
    pub const PROMOS: &str = "mountrush_promos";
    /// Cart mapping (product id -> line).
    pub const CART: &str = "mountrush_cart";
    /// Wishlist product ids.
    pub const WISHLIST: &str = "mountrush_wishlist";
    /// Currently applied promo, or `null`.
    pub const ACTIVE_PROMO: &str = "mountrush_promo";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized for storage.
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A string key-value store, the shape of browser local storage.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Serialize `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns an error if encoding fails or the backend cannot be written.
pub fn save_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, encoded)
}

/// Read `key` and parse it as untyped JSON.
///
/// Unreadable backends, absent keys and unparseable text all come back as
/// `None`; the caller substitutes its default. Parse and read failures are
/// logged.
pub fn load_json<S>(store: &S, key: &str) -> Option<serde_json::Value>
where
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored state");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(serde_json::Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unparseable stored state");
            None
        }
    }
}
