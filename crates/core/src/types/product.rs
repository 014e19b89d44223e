//! Product and cart line records.
//!
//! These are the shapes persisted in the key-value store and read from
//! catalog files. Field names follow the stored JSON (`desc`, `qty`).

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Category assigned when a product record omits one.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Image shown when a product record omits one.
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.png";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

/// A catalog product.
///
/// Only `id` is required when deserializing. Missing text fields fall back to
/// defaults and a missing price is zero; a present-but-invalid price (negative,
/// non-numeric) rejects the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default, rename = "desc", alias = "description")]
    pub description: String,
}

impl Product {
    /// Create a product with the given id, title, category and price.
    ///
    /// Image and description start out as the placeholder and empty.
    #[must_use]
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        category: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            category: category.into(),
            price,
            image: default_image(),
            description: String::new(),
        }
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Text searched by the shop's free-text filter, lower-cased.
    #[must_use]
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.category).to_lowercase()
    }
}

/// A product snapshot in the cart together with its quantity.
///
/// Persisted flattened: `{ "id": ..., "title": ..., ..., "qty": 2 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartLine {
    /// Line total (`price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}
