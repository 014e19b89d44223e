//! Validation of stored JSON into typed shop state.
//!
//! Stored values may have been written by an older build, edited by hand, or
//! pasted in by an administrator. Each decoder accepts whatever JSON it is
//! given, keeps the entries that validate, and drops the rest with a warning.
//! None of them fail.

use std::collections::{BTreeMap, HashSet};

use mountrush_core::{ActivePromo, CartLine, Product, ProductId, Promo, PromoCode, PromoTable};
use serde_json::Value;
use tracing::warn;

/// Decode a product list. Non-arrays decode to an empty list; duplicate ids
/// keep their first occurrence.
#[must_use]
pub fn decode_products(value: Value) -> Vec<Product> {
    let Value::Array(items) = value else {
        warn!("Product list is not an array, ignoring it");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut products = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Product>(item) {
            Ok(product) if seen.insert(product.id.clone()) => products.push(product),
            Ok(product) => warn!(index, id = %product.id, "Dropping duplicate product id"),
            Err(e) => warn!(index, error = %e, "Dropping malformed product"),
        }
    }
    products
}

/// Decode the cart mapping. Lines with a zero quantity are dropped.
#[must_use]
pub fn decode_cart(value: Value) -> BTreeMap<ProductId, CartLine> {
    let Value::Object(entries) = value else {
        warn!("Stored cart is not an object, starting empty");
        return BTreeMap::new();
    };

    let mut lines = BTreeMap::new();
    for (key, entry) in entries {
        match serde_json::from_value::<CartLine>(entry) {
            Ok(line) if line.quantity >= 1 => {
                lines.insert(line.product.id.clone(), line);
            }
            Ok(_) => warn!(key = %key, "Dropping cart line with zero quantity"),
            Err(e) => warn!(key = %key, error = %e, "Dropping malformed cart line"),
        }
    }
    lines
}

/// Decode the wishlist. Duplicates keep their first position.
#[must_use]
pub fn decode_wishlist(value: Value) -> Vec<ProductId> {
    let Value::Array(items) = value else {
        warn!("Stored wishlist is not an array, starting empty");
        return Vec::new();
    };

    let mut ids: Vec<ProductId> = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<ProductId>(item) {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Dropping malformed wishlist entry"),
        }
    }
    ids
}

/// Decode the promo table.
///
/// Returns `None` when the value is not an object at all, so the caller can
/// fall back to the default table. An empty object is a valid, empty table.
#[must_use]
pub fn decode_promos(value: Value) -> Option<PromoTable> {
    let Value::Object(entries) = value else {
        warn!("Stored promo table is not an object, using defaults");
        return None;
    };

    let mut table = PromoTable::new();
    for (key, entry) in entries {
        let Ok(code) = PromoCode::parse(&key) else {
            warn!(key = %key, "Dropping promo with blank code");
            continue;
        };
        match serde_json::from_value::<Promo>(entry) {
            Ok(promo) if !promo.value.is_sign_negative() => {
                table.insert(code, promo);
            }
            Ok(_) => warn!(%code, "Dropping promo with negative value"),
            Err(e) => warn!(%code, error = %e, "Dropping malformed promo"),
        }
    }
    Some(table)
}

/// Decode the active promo.
#[must_use]
pub fn decode_active_promo(value: Value) -> Option<ActivePromo> {
    match serde_json::from_value::<ActivePromo>(value) {
        Ok(active) if !active.promo.value.is_sign_negative() => Some(active),
        Ok(active) => {
            warn!(code = %active.code, "Ignoring active promo with negative value");
            None
        }
        Err(e) => {
            warn!(error = %e, "Ignoring malformed active promo");
            None
        }
    }
}
