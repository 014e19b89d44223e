//! Whole-unit price representation.
//!
//! The shop sells in Indian rupees with no fractional digits, so a price is a
//! non-negative integer in the smallest unit the shop displays. Intermediate
//! arithmetic (percentages, tax) goes through [`Decimal`] and is rounded back
//! with [`Price::round_from`].

use core::fmt;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Currency symbol used when formatting prices.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Errors that can occur when building a [`Price`] from loose numeric input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount is NaN or infinite.
    #[error("price must be a finite number")]
    NonFinite,
    /// The amount does not fit the integer representation.
    #[error("price is too large")]
    TooLarge,
}

/// A non-negative price in the smallest currency unit.
///
/// Deserializes from JSON integers, and from floats which are rounded half
/// away from zero. Negative and non-finite amounts are rejected.
///
/// ```
/// use mountrush_core::Price;
///
/// let price: Price = serde_json::from_str("8499").unwrap();
/// assert_eq!(price.to_string(), "₹8,499");
///
/// let rounded: Price = serde_json::from_str("2499.5").unwrap();
/// assert_eq!(rounded.amount(), 2500);
///
/// assert!(serde_json::from_str::<Price>("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from an integer amount.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the integer amount.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Get the amount as a decimal for intermediate arithmetic.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Round a decimal amount to a price.
    ///
    /// Rounds half away from zero. Negative amounts clamp to zero and amounts
    /// beyond the integer range saturate.
    #[must_use]
    pub fn round_from(value: Decimal) -> Self {
        if value.is_sign_negative() {
            return Self::ZERO;
        }
        let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self(rounded.to_u64().unwrap_or(u64::MAX))
    }

    /// Build a price from a float, rounding to the nearest whole unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is negative, non-finite, or too large.
    pub fn from_f64(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NonFinite);
        }
        if value < 0.0 {
            return Err(PriceError::Negative);
        }
        let decimal = Decimal::from_f64(value).ok_or(PriceError::TooLarge)?;
        decimal
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .map(Self)
            .ok_or(PriceError::TooLarge)
    }

    /// Multiply by a quantity, saturating at the integer limit.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Add two prices, saturating at the integer limit.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtract, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Price {
    /// Formats with the currency symbol and Indian digit grouping
    /// (`₹12,34,567`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{}", group_digits(self.0))
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

/// Group digits the en-IN way: the last three, then pairs.
fn group_digits(amount: u64) -> String {
    let digits = amount.to_string();
    let mut reversed = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, c) in digits.chars().rev().enumerate() {
        if i == 3 || (i > 3 && (i - 3) % 2 == 0) {
            reversed.push(',');
        }
        reversed.push(c);
    }
    reversed.chars().rev().collect()
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PriceVisitor;

        impl Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative number")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
                Ok(Price(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
                u64::try_from(v)
                    .map(Price)
                    .map_err(|_| E::custom(PriceError::Negative))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
                Price::from_f64(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}
