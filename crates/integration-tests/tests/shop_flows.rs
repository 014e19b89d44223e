//! Integration tests for shop sessions over a file-backed store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::path::Path;
use std::time::Duration;

use mountrush_core::{Price, ProductId};
use mountrush_integration_tests::StubServer;
use mountrush_storefront::analytics::AnalyticsBeacon;
use mountrush_storefront::cart::PricingPolicy;
use mountrush_storefront::catalog::{CatalogResolver, CatalogSource};
use mountrush_storefront::promo::PromoApplication;
use mountrush_storefront::storage::JsonFileStore;
use mountrush_storefront::{CheckoutError, ShopError, ShopSession};

fn resolver() -> CatalogResolver {
    CatalogResolver::new(
        vec![CatalogSource::Override, CatalogSource::BuiltIn],
        reqwest::Client::new(),
    )
}

async fn open(path: &Path, beacon: AnalyticsBeacon) -> ShopSession<JsonFileStore> {
    let store = JsonFileStore::open(path).unwrap();
    ShopSession::open(store, &resolver(), PricingPolicy::default(), beacon).await
}

fn id(s: &str) -> ProductId {
    ProductId::parse(s).unwrap()
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut session = open(&path, AnalyticsBeacon::log_only()).await;
    session.add_to_cart(&id("p-tent-01"), 1).unwrap();
    session.add_to_cart(&id("p-stove-01"), 2).unwrap();
    session.set_quantity(&id("p-stove-01"), 3.0).unwrap();
    session.toggle_wishlist(&id("p-boots-01")).unwrap();
    session.apply_promo("mount10").unwrap();
    let before = session.totals();
    drop(session);

    let session = open(&path, AnalyticsBeacon::log_only()).await;
    assert_eq!(session.item_count(), 4);
    assert_eq!(session.wishlist_products().len(), 1);
    assert_eq!(session.totals(), before);
    assert_eq!(before.subtotal, Price::new(8499 + 3 * 2499));
}

#[tokio::test]
async fn test_state_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut session = open(&path, AnalyticsBeacon::log_only()).await;
    session.add_to_cart(&id("p-tent-01"), 1).unwrap();
    drop(session);

    let raw = std::fs::read_to_string(&path).unwrap();
    let state: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let cart: serde_json::Value =
        serde_json::from_str(state["mountrush_cart"].as_str().unwrap()).unwrap();
    assert_eq!(cart["p-tent-01"]["qty"], 1);
    assert_eq!(cart["p-tent-01"]["price"], 8499);
    assert_eq!(state["mountrush_promo"], "null");
    assert_eq!(state["mountrush_wishlist"], "[]");
    assert!(state["mountrush_promos"].as_str().unwrap().contains("MOUNT10"));
}

#[tokio::test]
async fn test_scenarios_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open(&dir.path().join("state.json"), AnalyticsBeacon::log_only()).await;

    session.add_to_cart(&id("p-tent-01"), 1).unwrap();
    let totals = session.totals();
    assert_eq!(
        (totals.subtotal, totals.discount, totals.tax, totals.shipping, totals.grand_total),
        (Price::new(8499), Price::ZERO, Price::new(425), Price::new(49), Price::new(8973))
    );

    session.apply_promo("FREESHIP").unwrap();
    let totals = session.totals();
    assert_eq!(totals.shipping, Price::ZERO);
    assert_eq!(totals.discount, Price::ZERO);

    let outcome = session.apply_promo("BOGUS").unwrap();
    assert_eq!(outcome.message(), "Invalid promo code");
    assert!(matches!(outcome, PromoApplication::Rejected { .. }));
    assert!(session.active_promo().is_none());
    assert_eq!(session.totals().grand_total, Price::new(8973));
}

#[tokio::test]
async fn test_checkout_empties_persisted_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut session = open(&path, AnalyticsBeacon::log_only()).await;
    session.add_to_cart(&id("p-pack-01"), 1).unwrap();
    let receipt = session.checkout().unwrap();
    assert_eq!(receipt.totals.subtotal, Price::new(4999));
    assert!(matches!(
        session.checkout(),
        Err(ShopError::Checkout(CheckoutError::EmptyCart))
    ));
    drop(session);

    let session = open(&path, AnalyticsBeacon::log_only()).await;
    assert!(session.cart().is_empty());
}

#[tokio::test]
async fn test_analytics_beacons_reach_endpoint() {
    let server = StubServer::start(204, "").await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let beacon = AnalyticsBeacon::new(server.url("analytics"), reqwest::Client::new());

    let mut session = open(&dir.path().join("state.json"), beacon).await;
    session.add_to_cart(&id("p-tent-01"), 1).unwrap();
    session.flush_analytics(Duration::from_secs(5)).await;

    // shop_view + add_to_cart
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_corrupt_state_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "definitely not json").unwrap();

    let mut session = open(&path, AnalyticsBeacon::log_only()).await;
    assert!(session.cart().is_empty());
    session.add_to_cart(&id("p-boots-01"), 1).unwrap();
    drop(session);

    let session = open(&path, AnalyticsBeacon::log_only()).await;
    assert_eq!(session.item_count(), 1);
}
