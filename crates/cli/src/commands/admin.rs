//! Admin commands: product override and coupons.

#![allow(clippy::print_stdout)] // command output

use std::path::Path;

use mountrush_admin::csv_import::SheetImporter;
use mountrush_admin::{coupons, csv_import, products};
use mountrush_core::{ProductId, PromoKind};
use mountrush_storefront::storage::JsonFileStore;
use rust_decimal::Decimal;
use url::Url;

use super::{CmdResult, product_row};

pub fn list_products(store: &JsonFileStore) {
    let overrides = products::list_overrides(store);
    if overrides.is_empty() {
        println!("No override products stored");
        return;
    }
    for product in &overrides {
        println!("{}", product_row(product));
    }
}

pub async fn apply_products(store: &mut JsonFileStore, file: &Path) -> CmdResult {
    let saved = products::import_products_file(store, file).await?;
    println!("Saved {} products to the override", saved.len());
    Ok(())
}

pub async fn export_products(store: &JsonFileStore, out: Option<&Path>) -> CmdResult {
    let json = products::export_products(store)?;
    match out {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            println!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn delete_product(store: &mut JsonFileStore, id: &ProductId) -> CmdResult {
    if products::delete_product(store, id)? {
        println!("Deleted {id}");
    } else {
        println!("{id} is not in the override");
    }
    Ok(())
}

pub fn clear_override(store: &mut JsonFileStore) -> CmdResult {
    products::clear_override(store)?;
    println!("Cleared override");
    Ok(())
}

pub async fn import_sheet(store: &mut JsonFileStore, client: reqwest::Client, url: &Url) -> CmdResult {
    let importer = SheetImporter::new(client);
    let saved = csv_import::import_sheet(store, &importer, url).await?;
    println!("Imported {} products from the sheet", saved.len());
    Ok(())
}

pub fn list_coupons(store: &JsonFileStore) {
    for (code, promo) in coupons::list_coupons(store) {
        println!(
            "{:<12} {:<9} {:>8}  {}",
            code.as_str(),
            promo.kind.as_str(),
            promo.value.to_string(),
            promo.description
        );
    }
}

pub fn create_coupon(
    store: &mut JsonFileStore,
    code: &str,
    kind: &str,
    value: Option<Decimal>,
) -> CmdResult {
    let kind = PromoKind::from_str_param(kind).ok_or_else(|| format!("Unknown coupon kind: {kind}"))?;
    let (code, promo) = coupons::create_coupon(store, code, kind, value.unwrap_or_default())?;
    println!("Saved {code} - {}", promo.description);
    Ok(())
}

pub fn delete_coupon(store: &mut JsonFileStore, code: &str) -> CmdResult {
    if coupons::delete_coupon(store, code)? {
        println!("Deleted {}", code.trim().to_uppercase());
    } else {
        println!("No coupon {code}");
    }
    Ok(())
}
