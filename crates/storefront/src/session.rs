//! Shop session: the explicit state object behind every shop operation.
//!
//! A session owns its key-value store. Opening one loads the persisted cart,
//! wishlist, promo table and active promo (each degrading to its default when
//! absent or malformed) and resolves the catalog. Every mutation writes all
//! four shop keys back through the store.

use std::time::Duration;

use mountrush_core::{ActivePromo, CartLine, Product, ProductId, PromoCode, PromoTable};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::analytics::{AnalyticsBeacon, events};
use crate::cart::{Cart, PricingPolicy, Totals, compute_totals};
use crate::catalog::{Catalog, CatalogResolver};
use crate::error::{CheckoutError, Result};
use crate::promo::{PromoApplication, apply_code, default_promos};
use crate::storage::{KeyValueStore, codec, load_json, save_json, storage_keys};
use crate::wishlist::{Wishlist, WishlistChange};

/// A completed (simulated) checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub lines: Vec<CartLine>,
    pub totals: Totals,
    /// Code of the promo that was active at checkout.
    pub promo: Option<PromoCode>,
}

/// One shopper's state over a key-value store.
#[derive(Debug)]
pub struct ShopSession<S: KeyValueStore> {
    store: S,
    catalog: Catalog,
    cart: Cart,
    wishlist: Wishlist,
    promos: PromoTable,
    active_promo: Option<ActivePromo>,
    policy: PricingPolicy,
    beacon: AnalyticsBeacon,
}

impl<S: KeyValueStore> ShopSession<S> {
    /// Load persisted state from `store` and resolve the catalog.
    #[instrument(skip_all)]
    pub async fn open(
        store: S,
        resolver: &CatalogResolver,
        policy: PricingPolicy,
        beacon: AnalyticsBeacon,
    ) -> Self {
        let cart = load_json(&store, storage_keys::CART)
            .map(|value| Cart::from_lines(codec::decode_cart(value)))
            .unwrap_or_default();
        let wishlist = load_json(&store, storage_keys::WISHLIST)
            .map(|value| Wishlist::from_ids(codec::decode_wishlist(value)))
            .unwrap_or_default();
        let promos = load_json(&store, storage_keys::PROMOS)
            .and_then(codec::decode_promos)
            .unwrap_or_else(default_promos);
        let active_promo =
            load_json(&store, storage_keys::ACTIVE_PROMO).and_then(codec::decode_active_promo);

        let catalog = resolver.resolve(&store).await;

        let mut session = Self {
            store,
            catalog,
            cart,
            wishlist,
            promos,
            active_promo,
            policy,
            beacon,
        };
        session.beacon.track(
            events::SHOP_VIEW,
            json!({
                "tier": session.catalog.tier().to_string(),
                "products": session.catalog.len(),
            }),
        );
        session
    }

    /// Re-resolve the catalog, e.g. after the override list changed.
    pub async fn reload_catalog(&mut self, resolver: &CatalogResolver) {
        self.catalog = resolver.resolve(&self.store).await;
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add `quantity` of a catalog product. Unknown ids change nothing and
    /// return `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn add_to_cart(&mut self, id: &ProductId, quantity: u32) -> Result<bool> {
        if !self.cart.add(&self.catalog, id, quantity) {
            info!(id = %id, "Ignoring add for product not in catalog");
            return Ok(false);
        }

        self.persist()?;
        self.beacon.track(
            events::ADD_TO_CART,
            json!({ "id": id, "qty": quantity.max(1) }),
        );
        Ok(true)
    }

    /// Set the quantity of an existing line (floored, at least one).
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: f64) -> Result<bool> {
        if !self.cart.set_quantity(id, quantity) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Remove a line. Absent ids are a no-op returning `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Result<bool> {
        if !self.cart.remove(id) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<()> {
        self.cart.clear();
        self.persist()
    }

    // =========================================================================
    // Promos and wishlist
    // =========================================================================

    /// Apply a promo code typed by the shopper.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn apply_promo(&mut self, input: &str) -> Result<PromoApplication> {
        let outcome = apply_code(&self.promos, &mut self.active_promo, input);

        match &outcome {
            PromoApplication::MissingCode => return Ok(outcome),
            PromoApplication::Applied { code, .. } => {
                info!(code = %code, "Promo applied");
                self.beacon
                    .track(events::PROMO_APPLIED, json!({ "code": code }));
            }
            PromoApplication::Rejected { code } => {
                info!(
                    code = code.as_ref().map_or("", PromoCode::as_str),
                    "Promo rejected"
                );
            }
        }

        self.persist()?;
        Ok(outcome)
    }

    /// Add `id` to the wishlist, or remove it if already saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn toggle_wishlist(&mut self, id: &ProductId) -> Result<WishlistChange> {
        let change = self.wishlist.toggle(id);
        self.persist()?;
        Ok(change)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Simulated checkout: price the cart, then empty it. The active promo
    /// stays active.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when there is nothing to buy, or a
    /// storage error if the emptied cart cannot be persisted.
    pub fn checkout(&mut self) -> Result<Receipt> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }

        let receipt = Receipt {
            lines: self.cart.lines().cloned().collect(),
            totals: self.totals(),
            promo: self.active_promo.as_ref().map(|p| p.code.clone()),
        };

        self.cart.clear();
        self.persist()?;

        info!(
            total = %receipt.totals.grand_total,
            items = receipt.lines.len(),
            "Checkout complete"
        );
        self.beacon.track(
            events::CHECKOUT,
            json!({
                "total": receipt.totals.grand_total,
                "items": receipt.lines.len(),
            }),
        );
        Ok(receipt)
    }

    // =========================================================================
    // Views
    // =========================================================================

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Cart lines ordered by product id.
    pub fn cart_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.cart.lines()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Wishlisted products still in the catalog.
    #[must_use]
    pub fn wishlist_products(&self) -> Vec<&Product> {
        self.wishlist.resolve(&self.catalog)
    }

    #[must_use]
    pub const fn promos(&self) -> &PromoTable {
        &self.promos
    }

    #[must_use]
    pub const fn active_promo(&self) -> Option<&ActivePromo> {
        self.active_promo.as_ref()
    }

    #[must_use]
    pub const fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Totals for the current cart and active promo.
    #[must_use]
    pub fn totals(&self) -> Totals {
        compute_totals(
            &self.cart,
            self.active_promo.as_ref().map(|a| &a.promo),
            &self.policy,
        )
    }

    /// Give in-flight analytics beacons up to `timeout` to finish.
    pub async fn flush_analytics(&mut self, timeout: Duration) {
        self.beacon.flush(timeout).await;
    }

    /// Close the session, handing back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) -> Result<()> {
        save_json(&mut self.store, storage_keys::CART, self.cart.as_map())?;
        save_json(&mut self.store, storage_keys::WISHLIST, self.wishlist.ids())?;
        save_json(&mut self.store, storage_keys::PROMOS, &self.promos)?;
        save_json(&mut self.store, storage_keys::ACTIVE_PROMO, &self.active_promo)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mountrush_core::Price;

    use super::*;
    use crate::catalog::{CatalogSource, CatalogTier};
    use crate::error::ShopError;
    use crate::storage::MemoryStore;

    fn builtin_resolver() -> CatalogResolver {
        CatalogResolver::new(vec![CatalogSource::BuiltIn], reqwest::Client::new())
    }

    async fn open(store: MemoryStore) -> ShopSession<MemoryStore> {
        ShopSession::open(
            store,
            &builtin_resolver(),
            PricingPolicy::default(),
            AnalyticsBeacon::log_only(),
        )
        .await
    }

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_session_defaults() {
        let session = open(MemoryStore::new()).await;
        assert_eq!(session.catalog().tier(), CatalogTier::BuiltIn);
        assert!(session.cart().is_empty());
        assert!(session.wishlist().is_empty());
        assert!(session.active_promo().is_none());
        assert_eq!(session.promos(), &default_promos());
        assert_eq!(session.totals(), Totals::default());
    }

    #[tokio::test]
    async fn test_scenario_tent_with_percent_promo() {
        let mut session = open(MemoryStore::new()).await;
        assert!(session.add_to_cart(&id("p-tent-01"), 1).unwrap());

        let totals = session.totals();
        assert_eq!(totals.grand_total, Price::new(8973));

        let outcome = session.apply_promo("  mount10 ").unwrap();
        assert!(matches!(outcome, PromoApplication::Applied { .. }));
        let totals = session.totals();
        assert_eq!(totals.discount, Price::new(850));
        assert_eq!(totals.tax, Price::new(382));
        assert_eq!(totals.grand_total, Price::new(8080));
    }

    #[tokio::test]
    async fn test_bogus_promo_clears_active() {
        let mut session = open(MemoryStore::new()).await;
        session.apply_promo("FREESHIP").unwrap();
        assert!(session.active_promo().is_some());

        let outcome = session.apply_promo("BOGUS").unwrap();
        assert!(matches!(outcome, PromoApplication::Rejected { .. }));
        assert!(session.active_promo().is_none());
    }

    #[tokio::test]
    async fn test_empty_promo_keeps_active() {
        let mut session = open(MemoryStore::new()).await;
        session.apply_promo("FREESHIP").unwrap();

        let outcome = session.apply_promo("").unwrap();
        assert_eq!(outcome, PromoApplication::MissingCode);
        assert!(session.active_promo().is_some());
    }

    #[tokio::test]
    async fn test_whitespace_promo_clears_active() {
        let mut session = open(MemoryStore::new()).await;
        session.add_to_cart(&id("p-tent-01"), 1).unwrap();
        session.apply_promo("FREESHIP").unwrap();

        let outcome = session.apply_promo("   ").unwrap();
        assert_eq!(outcome, PromoApplication::Rejected { code: None });
        assert!(session.active_promo().is_none());
        assert_eq!(session.totals().shipping, Price::new(49));

        let session = open(session.into_store()).await;
        assert!(session.active_promo().is_none());
    }

    #[tokio::test]
    async fn test_unknown_product_does_not_touch_store() {
        let mut store = MemoryStore::new();
        let mut session = ShopSession::open(
            &mut store,
            &builtin_resolver(),
            PricingPolicy::default(),
            AnalyticsBeacon::log_only(),
        )
        .await;
        assert!(!session.add_to_cart(&id("p-ghost"), 3).unwrap());
        drop(session);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let mut session = open(MemoryStore::new()).await;
        session.add_to_cart(&id("p-boots-01"), 2).unwrap();
        session.toggle_wishlist(&id("p-pack-01")).unwrap();
        session.apply_promo("FREESHIP").unwrap();
        let store = session.into_store();

        let session = open(store).await;
        assert_eq!(session.item_count(), 2);
        assert_eq!(session.wishlist().ids(), &[id("p-pack-01")]);
        assert_eq!(
            session.active_promo().map(|a| a.code.as_str()),
            Some("FREESHIP")
        );
        assert_eq!(session.totals().shipping, Price::ZERO);
    }

    #[tokio::test]
    async fn test_corrupt_state_degrades_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(storage_keys::CART, "[1, 2".to_string()).unwrap();
        store.set(storage_keys::WISHLIST, "{}".to_string()).unwrap();
        store.set(storage_keys::PROMOS, "\"nope\"".to_string()).unwrap();
        store.set(storage_keys::ACTIVE_PROMO, "42".to_string()).unwrap();

        let session = open(store).await;
        assert!(session.cart().is_empty());
        assert!(session.wishlist().is_empty());
        assert_eq!(session.promos(), &default_promos());
        assert!(session.active_promo().is_none());
    }

    #[tokio::test]
    async fn test_set_and_remove() {
        let mut session = open(MemoryStore::new()).await;
        let stove = id("p-stove-01");
        session.add_to_cart(&stove, 1).unwrap();

        assert!(session.set_quantity(&stove, 3.7).unwrap());
        assert_eq!(session.item_count(), 3);

        assert!(session.remove_from_cart(&stove).unwrap());
        assert!(!session.remove_from_cart(&stove).unwrap());
        assert!(!session.set_quantity(&stove, 2.0).unwrap());
        assert_eq!(session.item_count(), 0);
    }

    #[tokio::test]
    async fn test_wishlist_products_skip_stale_ids() {
        let mut session = open(MemoryStore::new()).await;
        session.toggle_wishlist(&id("p-retired")).unwrap();
        session.toggle_wishlist(&id("p-tent-01")).unwrap();

        let products = session.wishlist_products();
        assert_eq!(products.len(), 1);
        assert_eq!(products.first().unwrap().id.as_str(), "p-tent-01");

        assert_eq!(
            session.toggle_wishlist(&id("p-tent-01")).unwrap(),
            WishlistChange::Removed
        );
    }

    #[tokio::test]
    async fn test_checkout() {
        let mut session = open(MemoryStore::new()).await;
        assert!(matches!(
            session.checkout(),
            Err(ShopError::Checkout(CheckoutError::EmptyCart))
        ));

        session.add_to_cart(&id("p-tent-01"), 1).unwrap();
        session.apply_promo("MOUNT10").unwrap();
        let receipt = session.checkout().unwrap();

        assert_eq!(receipt.lines.len(), 1);
        assert_eq!(receipt.totals.grand_total, Price::new(8080));
        assert_eq!(receipt.promo.map(String::from).as_deref(), Some("MOUNT10"));
        assert!(session.cart().is_empty());
        assert!(session.active_promo().is_some());
    }

    #[tokio::test]
    async fn test_reload_catalog_picks_up_override() {
        let mut store = MemoryStore::new();
        let resolver = CatalogResolver::new(
            vec![CatalogSource::Override, CatalogSource::BuiltIn],
            reqwest::Client::new(),
        );
        let mut session = ShopSession::open(
            &mut store,
            &resolver,
            PricingPolicy::default(),
            AnalyticsBeacon::log_only(),
        )
        .await;
        assert_eq!(session.catalog().tier(), CatalogTier::BuiltIn);

        save_json(
            &mut session.store,
            storage_keys::PRODUCTS,
            &json!([{ "id": "o-1", "title": "Lantern", "price": 799 }]),
        )
        .unwrap();
        session.reload_catalog(&resolver).await;
        assert_eq!(session.catalog().tier(), CatalogTier::Override);
        assert!(session.add_to_cart(&id("o-1"), 1).unwrap());
    }
}
