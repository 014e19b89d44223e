//! Cart pricing.
//!
//! Totals are derived, never stored: every call recomputes them from the
//! cart lines, the active promo, the tax rate and the flat shipping charge.
//!
//! Order of operations:
//!
//! 1. `subtotal = Σ price × qty`
//! 2. `discount` - percent: `round(subtotal × value / 100)`; fixed: `value`
//!    (not capped at the subtotal); free shipping or no promo: 0
//! 3. `taxable = max(0, subtotal − discount)`
//! 4. `tax = round(taxable × tax_percent / 100)`
//! 5. `shipping` - 0 for an empty cart or a free-shipping promo, else the flat rate
//! 6. `grand_total = taxable + tax + shipping`
//!
//! Rounding is half away from zero.

use mountrush_core::{Price, Promo, PromoKind};
use rust_decimal::Decimal;
use serde::Serialize;

use super::Cart;

/// Default tax rate, in percent.
pub const DEFAULT_TAX_PERCENT: u32 = 5;

/// Default flat shipping charge.
pub const DEFAULT_SHIPPING: Price = Price::new(49);

/// Tax rate and shipping charge applied to every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Tax rate in percent, applied to the discounted subtotal.
    pub tax_percent: Decimal,
    /// Flat shipping charge for non-empty carts.
    pub base_shipping: Price,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_percent: Decimal::from(DEFAULT_TAX_PERCENT),
            base_shipping: DEFAULT_SHIPPING,
        }
    }
}

/// Order totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Price,
    pub discount: Price,
    pub tax: Price,
    pub shipping: Price,
    pub grand_total: Price,
}

impl Totals {
    /// The amount tax is charged on: subtotal less discount, floored at zero.
    #[must_use]
    pub const fn taxable(&self) -> Price {
        self.subtotal.saturating_sub(self.discount)
    }
}

/// Compute totals for `cart` with an optional promo.
#[must_use]
pub fn compute_totals(cart: &Cart, promo: Option<&Promo>, policy: &PricingPolicy) -> Totals {
    let subtotal_exact = cart.lines().fold(Decimal::ZERO, |acc, line| {
        acc.saturating_add(
            line.product
                .price
                .to_decimal()
                .saturating_mul(Decimal::from(line.quantity)),
        )
    });
    let subtotal = Price::round_from(subtotal_exact);

    let discount = match promo.map(|p| (p.kind, p.value)) {
        Some((PromoKind::Percent, value)) => Price::round_from(percent_of(subtotal_exact, value)),
        Some((PromoKind::Fixed, value)) => Price::round_from(value),
        Some((PromoKind::FreeShipping, _)) | None => Price::ZERO,
    };

    let taxable = subtotal.saturating_sub(discount);
    let tax = Price::round_from(percent_of(taxable.to_decimal(), policy.tax_percent));

    let free_shipping = promo.is_some_and(Promo::is_free_shipping);
    let shipping = if cart.is_empty() || free_shipping {
        Price::ZERO
    } else {
        policy.base_shipping
    };

    Totals {
        subtotal,
        discount,
        tax,
        shipping,
        grand_total: taxable.saturating_add(tax).saturating_add(shipping),
    }
}

fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount.saturating_mul(percent) / Decimal::ONE_HUNDRED
}
