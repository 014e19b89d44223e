//! Wishlist: an ordered set of product ids.

use mountrush_core::{Product, ProductId};

use crate::catalog::Catalog;

/// Result of [`Wishlist::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistChange {
    Added,
    Removed,
}

/// Product ids in the order they were saved. Each id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    ids: Vec<ProductId>,
}

impl Wishlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored ids, keeping the first occurrence of duplicates.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut wishlist = Self::new();
        for id in ids {
            if !wishlist.contains(&id) {
                wishlist.ids.push(id);
            }
        }
        wishlist
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: &ProductId) -> WishlistChange {
        if let Some(pos) = self.ids.iter().position(|existing| existing == id) {
            self.ids.remove(pos);
            WishlistChange::Removed
        } else {
            self.ids.push(id.clone());
            WishlistChange::Added
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Saved products that are still in `catalog`, in wishlist order.
    /// Ids missing from the catalog are skipped.
    #[must_use]
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        self.ids.iter().filter_map(|id| catalog.find(id)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogTier, builtin};

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    #[test]
    fn test_toggle_is_symmetric() {
        let mut wishlist = Wishlist::new();
        assert_eq!(wishlist.toggle(&id("p-tent-01")), WishlistChange::Added);
        assert!(wishlist.contains(&id("p-tent-01")));
        assert_eq!(wishlist.toggle(&id("p-tent-01")), WishlistChange::Removed);
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut wishlist = Wishlist::new();
        wishlist.toggle(&id("b"));
        wishlist.toggle(&id("a"));
        wishlist.toggle(&id("c"));
        wishlist.toggle(&id("a"));
        wishlist.toggle(&id("a"));
        let ids: Vec<_> = wishlist.ids().iter().map(ProductId::as_str).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_from_ids_dedupes() {
        let wishlist = Wishlist::from_ids([id("x"), id("y"), id("x")]);
        assert_eq!(wishlist.len(), 2);
    }

    #[test]
    fn test_resolve_skips_stale_ids() {
        let catalog = Catalog::new(builtin::sample_products(), CatalogTier::BuiltIn);
        let wishlist = Wishlist::from_ids([id("p-pack-01"), id("p-gone"), id("p-tent-01")]);
        let titles: Vec<_> = wishlist
            .resolve(&catalog)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, ["Voyager 45L Pack", "Summit 2P Tent"]);
    }
}
