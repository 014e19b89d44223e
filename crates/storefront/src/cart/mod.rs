//! Shopping cart.
//!
//! The cart maps product ids to a snapshot of the product taken when it was
//! first added, plus a quantity. Every line present has a quantity of at least
//! one. Lines outlive catalog changes: a product that disappears from the
//! catalog stays in the cart at its snapshot price.

pub mod pricing;

use std::collections::BTreeMap;

use mountrush_core::{CartLine, ProductId};

use crate::catalog::Catalog;

pub use pricing::{PricingPolicy, Totals, compute_totals};

/// Product id -> cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: BTreeMap<ProductId, CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored lines. Zero-quantity lines are dropped.
    #[must_use]
    pub fn from_lines(lines: BTreeMap<ProductId, CartLine>) -> Self {
        let lines = lines
            .into_iter()
            .filter(|(_, line)| line.quantity >= 1)
            .collect();
        Self { lines }
    }

    /// Add `quantity` of a catalog product, creating the line if needed.
    ///
    /// Quantities below one count as one. Returns `false`, leaving the cart
    /// untouched, when the product is not in `catalog`.
    pub fn add(&mut self, catalog: &Catalog, id: &ProductId, quantity: u32) -> bool {
        let Some(product) = catalog.find(id) else {
            return false;
        };

        let quantity = quantity.max(1);
        self.lines
            .entry(id.clone())
            .and_modify(|line| line.quantity = line.quantity.saturating_add(quantity))
            .or_insert_with(|| CartLine {
                product: product.clone(),
                quantity,
            });
        true
    }

    /// Set the quantity of an existing line.
    ///
    /// The requested quantity is floored and clamped to at least one;
    /// non-finite input counts as one. Returns `false` when there is no line
    /// for `id`.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: f64) -> bool {
        match self.lines.get_mut(id) {
            Some(line) => {
                line.quantity = normalize_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Remove a line regardless of quantity. Returns whether a line was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        self.lines.remove(id).is_some()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.get(id)
    }

    /// Lines ordered by product id.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// The underlying mapping, in its persisted shape.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<ProductId, CartLine> {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.values().map(|l| u64::from(l.quantity)).sum()
    }
}

/// Floor and clamp a requested quantity into `1..=u32::MAX`.
fn normalize_quantity(raw: f64) -> u32 {
    if !raw.is_finite() {
        return 1;
    }
    let floored = raw.floor();
    if floored < 1.0 {
        return 1;
    }
    if floored >= f64::from(u32::MAX) {
        return u32::MAX;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 1..u32::MAX above
    let quantity = floored as u32;
    quantity
}
