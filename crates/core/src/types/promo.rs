//! Promo codes and the promo table.

use std::collections::BTreeMap;

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::CURRENCY_SYMBOL;

/// Errors that can occur when parsing a [`PromoCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PromoCodeError {
    /// The input is empty or whitespace only.
    #[error("promo code cannot be empty")]
    Empty,
}

/// A promo code, normalized to trimmed upper case.
///
/// ```
/// use mountrush_core::PromoCode;
///
/// assert_eq!(PromoCode::parse(" mount10 ").unwrap().as_str(), "MOUNT10");
/// assert!(PromoCode::parse("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromoCode(String);

impl PromoCode {
    /// Parse and normalize a promo code.
    ///
    /// # Errors
    ///
    /// Returns [`PromoCodeError::Empty`] if the trimmed input is empty.
    pub fn parse(s: &str) -> Result<Self, PromoCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PromoCodeError::Empty);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PromoCode {
    type Err = PromoCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PromoCode {
    type Error = PromoCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PromoCode> for String {
    fn from(code: PromoCode) -> Self {
        code.0
    }
}

/// What a promo does to the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromoKind {
    /// Percentage off the subtotal.
    #[serde(rename = "percent")]
    Percent,
    /// Fixed amount off the subtotal.
    #[serde(rename = "fixed")]
    Fixed,
    /// Shipping is waived.
    #[serde(rename = "freeship", alias = "free-shipping")]
    FreeShipping,
}

impl PromoKind {
    /// Parse a kind from a CLI/form parameter.
    #[must_use]
    pub fn from_str_param(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "percent" | "pct" | "%" => Some(Self::Percent),
            "fixed" | "amount" => Some(Self::Fixed),
            "freeship" | "free-shipping" | "free_shipping" => Some(Self::FreeShipping),
            _ => None,
        }
    }

    /// The stored name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Fixed => "fixed",
            Self::FreeShipping => "freeship",
        }
    }
}

impl fmt::Display for PromoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A promo table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promo {
    #[serde(rename = "type")]
    pub kind: PromoKind,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub value: Decimal,
    #[serde(default, rename = "desc")]
    pub description: String,
}

impl Promo {
    /// Create a promo with an explicit description.
    #[must_use]
    pub fn new(kind: PromoKind, value: Decimal, description: impl Into<String>) -> Self {
        Self {
            kind,
            value,
            description: description.into(),
        }
    }

    /// Create a promo whose description is generated from kind and value
    /// (`10% off`, `₹500 off`, `Free shipping`).
    #[must_use]
    pub fn described(kind: PromoKind, value: Decimal) -> Self {
        let value = value.normalize();
        let description = match kind {
            PromoKind::Percent => format!("{value}% off"),
            PromoKind::Fixed => format!("{CURRENCY_SYMBOL}{value} off"),
            PromoKind::FreeShipping => "Free shipping".to_string(),
        };
        Self::new(kind, value, description)
    }

    /// Whether the promo waives shipping.
    #[must_use]
    pub const fn is_free_shipping(&self) -> bool {
        matches!(self.kind, PromoKind::FreeShipping)
    }
}

/// Mapping from code to promo, as persisted by the shop and the admin.
pub type PromoTable = BTreeMap<PromoCode, Promo>;

/// The promo currently applied to a session.
///
/// Persisted flattened: `{ "code": "MOUNT10", "type": "percent", "value": 10, "desc": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePromo {
    pub code: PromoCode,
    #[serde(flatten)]
    pub promo: Promo,
}
