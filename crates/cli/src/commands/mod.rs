//! Command implementations.
//!
//! Output for the user goes to stdout; logs go to stderr.

pub mod admin;
pub mod shop;

use mountrush_core::Product;

/// Result type shared by every command.
pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// One product as a fixed-width table row.
fn product_row(product: &Product) -> String {
    format!(
        "{:<18} {:<28} {:<14} {:>12}",
        product.id.as_str(),
        product.title,
        product.category,
        product.price.to_string()
    )
}
