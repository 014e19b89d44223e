//! Product override management.
//!
//! The override is the full product list stored under
//! [`storage_keys::PRODUCTS`]. When present and non-empty it replaces every
//! other catalog source in the shop.

use std::path::Path;

use chrono::Utc;
use mountrush_core::{Product, ProductId};
use mountrush_storefront::storage::{KeyValueStore, codec, load_json, save_json, storage_keys};
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::{AdminError, Result};

/// The stored override list, or empty when none is stored.
pub fn list_overrides<S>(store: &S) -> Vec<Product>
where
    S: KeyValueStore + ?Sized,
{
    load_json(store, storage_keys::PRODUCTS)
        .map(codec::decode_products)
        .unwrap_or_default()
}

/// Replace the override with a pasted JSON product array.
///
/// Entries without an id are given `p-<millis>-<index>`. Entries that still
/// fail validation are dropped. Returns the saved list.
///
/// # Errors
///
/// Returns `InvalidJson` or `NotAnArray` for unusable input, or a storage
/// error if the list cannot be saved.
#[instrument(skip_all)]
pub fn apply_products_json<S>(store: &mut S, text: &str) -> Result<Vec<Product>>
where
    S: KeyValueStore + ?Sized,
{
    let value: Value = serde_json::from_str(text.trim())?;
    let Value::Array(mut items) = value else {
        return Err(AdminError::NotAnArray);
    };

    assign_missing_ids(&mut items, Utc::now().timestamp_millis());
    let products = codec::decode_products(Value::Array(items));

    save_overrides(store, &products)?;
    info!(count = products.len(), "Saved product override");
    Ok(products)
}

/// Replace the override with the JSON product array in `path`.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, otherwise as
/// [`apply_products_json`].
pub async fn import_products_file<S>(store: &mut S, path: &Path) -> Result<Vec<Product>>
where
    S: KeyValueStore + ?Sized,
{
    let text = tokio::fs::read_to_string(path).await?;
    apply_products_json(store, &text)
}

/// Remove one product from the override. Returns whether it was present.
///
/// # Errors
///
/// Returns a storage error if the shortened list cannot be saved.
pub fn delete_product<S>(store: &mut S, id: &ProductId) -> Result<bool>
where
    S: KeyValueStore + ?Sized,
{
    let mut products = list_overrides(store);
    let before = products.len();
    products.retain(|p| &p.id != id);
    if products.len() == before {
        return Ok(false);
    }

    save_overrides(store, &products)?;
    info!(id = %id, "Deleted override product");
    Ok(true)
}

/// Drop the override so the shop falls back to its file or built-in catalog.
///
/// # Errors
///
/// Returns a storage error if the key cannot be removed.
pub fn clear_override<S>(store: &mut S) -> Result<()>
where
    S: KeyValueStore + ?Sized,
{
    store.remove(storage_keys::PRODUCTS)?;
    info!("Cleared product override");
    Ok(())
}

/// The override list as pretty-printed JSON, ready to save as a catalog file.
///
/// # Errors
///
/// Returns `NoOverride` when no products are stored.
pub fn export_products<S>(store: &S) -> Result<String>
where
    S: KeyValueStore + ?Sized,
{
    let products = list_overrides(store);
    if products.is_empty() {
        return Err(AdminError::NoOverride);
    }
    Ok(serde_json::to_string_pretty(&products)?)
}

pub(crate) fn save_overrides<S>(store: &mut S, products: &[Product]) -> Result<()>
where
    S: KeyValueStore + ?Sized,
{
    save_json(store, storage_keys::PRODUCTS, products)?;
    Ok(())
}

/// Give every object without a usable id a generated one. Numeric ids are
/// kept in their string form.
fn assign_missing_ids(items: &mut [Value], stamp: i64) {
    for (index, item) in items.iter_mut().enumerate() {
        let Value::Object(fields) = item else {
            continue;
        };
        let id = match fields.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => continue,
            Some(Value::Number(n)) if n.as_f64().is_some_and(|v| v != 0.0) => n.to_string(),
            _ => format!("p-{stamp}-{index}"),
        };
        fields.insert("id".to_string(), Value::String(id));
    }
}
