//! Coupon (promo table) management.

use mountrush_core::{Promo, PromoCode, PromoKind, PromoTable};
use mountrush_storefront::promo::default_promos;
use mountrush_storefront::storage::{KeyValueStore, codec, load_json, save_json, storage_keys};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{AdminError, Result};

/// The stored promo table. Falls back to the shop's defaults when none is
/// stored, so the admin sees exactly what shoppers can redeem.
pub fn list_coupons<S>(store: &S) -> PromoTable
where
    S: KeyValueStore + ?Sized,
{
    load_json(store, storage_keys::PROMOS)
        .and_then(codec::decode_promos)
        .unwrap_or_else(default_promos)
}

/// Create or replace a coupon. The description is generated from the kind
/// and value.
///
/// # Errors
///
/// Returns `EmptyCode` for a blank code, `NegativeValue` for a value below
/// zero, or a storage error if the table cannot be saved.
pub fn create_coupon<S>(
    store: &mut S,
    code: &str,
    kind: PromoKind,
    value: Decimal,
) -> Result<(PromoCode, Promo)>
where
    S: KeyValueStore + ?Sized,
{
    let code = PromoCode::parse(code).map_err(|_| AdminError::EmptyCode)?;
    if value < Decimal::ZERO {
        return Err(AdminError::NegativeValue(value.to_string()));
    }

    let promo = Promo::described(kind, value);
    let mut table = list_coupons(store);
    table.insert(code.clone(), promo.clone());
    save_json(store, storage_keys::PROMOS, &table)?;

    info!(code = %code, kind = %kind, "Saved coupon");
    Ok((code, promo))
}

/// Delete a coupon. Returns whether it existed.
///
/// # Errors
///
/// Returns a storage error if the table cannot be saved.
pub fn delete_coupon<S>(store: &mut S, code: &str) -> Result<bool>
where
    S: KeyValueStore + ?Sized,
{
    let Ok(code) = PromoCode::parse(code) else {
        return Ok(false);
    };

    let mut table = list_coupons(store);
    if table.remove(&code).is_none() {
        return Ok(false);
    }
    save_json(store, storage_keys::PROMOS, &table)?;

    info!(code = %code, "Deleted coupon");
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mountrush_storefront::storage::MemoryStore;

    use super::*;

    fn code(s: &str) -> PromoCode {
        PromoCode::parse(s).unwrap()
    }

    #[test]
    fn test_list_defaults_when_absent() {
        let store = MemoryStore::new();
        let table = list_coupons(&store);
        assert!(table.contains_key(&code("MOUNT10")));
        assert!(table.contains_key(&code("FREESHIP")));
    }

    #[test]
    fn test_create_generates_descriptions() {
        let mut store = MemoryStore::new();

        let (saved, promo) =
            create_coupon(&mut store, " summer15 ", PromoKind::Percent, Decimal::from(15)).unwrap();
        assert_eq!(saved.as_str(), "SUMMER15");
        assert_eq!(promo.description, "15% off");

        let (_, promo) =
            create_coupon(&mut store, "FLAT200", PromoKind::Fixed, Decimal::from(200)).unwrap();
        assert_eq!(promo.description, "₹200 off");

        let (_, promo) =
            create_coupon(&mut store, "SHIPIT", PromoKind::FreeShipping, Decimal::ZERO).unwrap();
        assert_eq!(promo.description, "Free shipping");

        let table = list_coupons(&store);
        assert_eq!(table.len(), 5);
        assert_eq!(table.get(&code("FLAT200")).unwrap().value, Decimal::from(200));
    }

    #[test]
    fn test_create_upserts() {
        let mut store = MemoryStore::new();
        create_coupon(&mut store, "MOUNT10", PromoKind::Percent, Decimal::from(20)).unwrap();
        let table = list_coupons(&store);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&code("MOUNT10")).unwrap().value, Decimal::from(20));
    }

    #[test]
    fn test_create_validation() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            create_coupon(&mut store, "   ", PromoKind::Fixed, Decimal::ONE),
            Err(AdminError::EmptyCode)
        ));
        assert!(matches!(
            create_coupon(&mut store, "OOPS", PromoKind::Fixed, Decimal::from(-5)),
            Err(AdminError::NegativeValue(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryStore::new();
        assert!(delete_coupon(&mut store, "freeship").unwrap());
        assert!(!delete_coupon(&mut store, "FREESHIP").unwrap());
        assert!(!delete_coupon(&mut store, "").unwrap());

        let table = list_coupons(&store);
        assert_eq!(table.len(), 1);
        assert!(table.contains_key(&code("MOUNT10")));
    }
}
