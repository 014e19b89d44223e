//! Product catalog: resolution and browsing.
//!
//! The active product list comes from the first tier that yields products:
//!
//! 1. the administrator's override in the key-value store
//! 2. a JSON product file (local path or http(s) URL)
//! 3. the built-in samples
//!
//! Resolution never fails; see [`CatalogResolver::resolve`].

pub mod builtin;
mod source;

use core::fmt;

use mountrush_core::{Product, ProductId};

pub use source::{CatalogError, CatalogResolver, CatalogSource};

/// Which tier supplied the active catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogTier {
    Override,
    File,
    Remote,
    BuiltIn,
}

impl fmt::Display for CatalogTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => write!(f, "override"),
            Self::File => write!(f, "file"),
            Self::Remote => write!(f, "remote"),
            Self::BuiltIn => write!(f, "built-in"),
        }
    }
}

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// There is no popularity signal; ranks by price, highest first.
    Popular,
}

impl SortOrder {
    /// Parse a sort order from a CLI/URL parameter.
    #[must_use]
    pub fn from_str_param(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "featured" | "default" => Some(Self::Featured),
            "price-asc" | "price_asc" => Some(Self::PriceAsc),
            "price-desc" | "price_desc" => Some(Self::PriceDesc),
            "popular" => Some(Self::Popular),
            _ => None,
        }
    }
}

/// Filter and sort options for [`Catalog::query`].
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Case-insensitive substring matched against title, description and category.
    pub search: Option<String>,
    /// Exact category; `None` or `"all"` means every category.
    pub category: Option<String>,
    pub sort: SortOrder,
}

/// The resolved product list for a session.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    tier: CatalogTier,
}

impl Catalog {
    /// Wrap a product list resolved from `tier`.
    #[must_use]
    pub const fn new(products: Vec<Product>, tier: CatalogTier) -> Self {
        Self { products, tier }
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Which tier supplied this catalog.
    #[must_use]
    pub const fn tier(&self) -> CatalogTier {
        self.tier
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Filter and sort the catalog.
    #[must_use]
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Product> {
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));
        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|n| p.search_text().contains(n))
            })
            .collect();

        match query.sort {
            SortOrder::Featured => {}
            SortOrder::PriceAsc => matches.sort_by_key(|p| p.price),
            SortOrder::PriceDesc | SortOrder::Popular => {
                matches.sort_by_key(|p| core::cmp::Reverse(p.price));
            }
        }
        matches
    }
}
