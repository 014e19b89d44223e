//! Shop commands: catalog, cart, promo, wishlist and checkout.

#![allow(clippy::print_stdout)] // command output

use std::time::Duration;

use mountrush_core::ProductId;
use mountrush_storefront::analytics::AnalyticsBeacon;
use mountrush_storefront::cart::Totals;
use mountrush_storefront::catalog::{CatalogQuery, CatalogResolver, SortOrder};
use mountrush_storefront::config::ShopConfig;
use mountrush_storefront::storage::JsonFileStore;
use mountrush_storefront::wishlist::WishlistChange;
use mountrush_storefront::{ShopError, ShopSession};

use super::{CmdResult, product_row};

/// A session over the CLI's state file.
pub type Session = ShopSession<JsonFileStore>;

/// How long a command waits for analytics beacons before exiting.
pub const ANALYTICS_GRACE: Duration = Duration::from_secs(2);

/// Open a session with the configured catalog chain and analytics endpoint.
pub async fn open(store: JsonFileStore, config: &ShopConfig, client: &reqwest::Client) -> Session {
    let resolver = CatalogResolver::standard(&config.catalog_location, client.clone());
    let beacon = config.analytics_url.as_ref().map_or_else(AnalyticsBeacon::log_only, |url| {
        AnalyticsBeacon::new(url.clone(), client.clone())
    });
    ShopSession::open(store, &resolver, config.pricing, beacon).await
}

pub fn list_catalog(
    session: &Session,
    search: Option<String>,
    category: Option<String>,
    sort: &str,
) -> CmdResult {
    let sort = SortOrder::from_str_param(sort).ok_or_else(|| format!("Unknown sort order: {sort}"))?;
    let query = CatalogQuery {
        search,
        category,
        sort,
    };

    let catalog = session.catalog();
    let products = catalog.query(&query);
    println!("{} products ({} catalog)", products.len(), catalog.tier());
    for product in products {
        println!("{}", product_row(product));
    }
    Ok(())
}

pub fn list_categories(session: &Session) {
    for category in session.catalog().categories() {
        println!("{category}");
    }
}

pub fn show_cart(session: &Session) {
    if session.cart().is_empty() {
        println!("Your cart is empty");
        return;
    }

    for line in session.cart_lines() {
        println!(
            "{:<18} {:<28} {:>4} x {:>10} = {:>12}",
            line.product.id.as_str(),
            line.product.title,
            line.quantity,
            line.product.price.to_string(),
            line.line_total().to_string()
        );
    }
    if let Some(active) = session.active_promo() {
        println!("Promo: {} ({})", active.code, active.promo.description);
    }
    print_totals(&session.totals());
}

pub fn add(session: &mut Session, id: &ProductId, qty: u32) -> CmdResult {
    if session.add_to_cart(id, qty)? {
        println!("Added {id} ({} items in cart)", session.item_count());
    } else {
        println!("No product {id} in the catalog");
    }
    Ok(())
}

pub fn set(session: &mut Session, id: &ProductId, qty: f64) -> CmdResult {
    if session.set_quantity(id, qty)? {
        let quantity = session.cart().get(id).map_or(0, |line| line.quantity);
        println!("{id} quantity is now {quantity}");
    } else {
        println!("{id} is not in your cart");
    }
    Ok(())
}

pub fn remove(session: &mut Session, id: &ProductId) -> CmdResult {
    if session.remove_from_cart(id)? {
        println!("Removed {id}");
    } else {
        println!("{id} is not in your cart");
    }
    Ok(())
}

pub fn clear(session: &mut Session) -> CmdResult {
    session.clear_cart()?;
    println!("Cart cleared");
    Ok(())
}

pub fn apply_promo(session: &mut Session, code: &str) -> CmdResult {
    let outcome = session.apply_promo(code)?;
    println!("{}", outcome.message());
    Ok(())
}

pub fn show_wishlist(session: &Session) {
    let products = session.wishlist_products();
    if products.is_empty() {
        println!("Your wishlist is empty");
        return;
    }
    for product in products {
        println!("{}", product_row(product));
    }
}

pub fn toggle_wishlist(session: &mut Session, id: &ProductId) -> CmdResult {
    match session.toggle_wishlist(id)? {
        WishlistChange::Added => println!("Saved {id} to your wishlist"),
        WishlistChange::Removed => println!("Removed {id} from your wishlist"),
    }
    Ok(())
}

pub fn checkout(session: &mut Session) -> CmdResult {
    match session.checkout() {
        Ok(receipt) => {
            println!("Order placed (demo): {} lines", receipt.lines.len());
            if let Some(code) = &receipt.promo {
                println!("Promo: {code}");
            }
            print_totals(&receipt.totals);
            Ok(())
        }
        Err(ShopError::Checkout(e)) => {
            println!("{e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_totals(totals: &Totals) {
    let row = |label: &str, amount: String| println!("{label:<10} {amount:>14}");

    row("Subtotal", totals.subtotal.to_string());
    if totals.discount.amount() > 0 {
        row("Discount", format!("-{}", totals.discount));
    }
    row("Tax", totals.tax.to_string());
    row("Shipping", totals.shipping.to_string());
    row("Total", totals.grand_total.to_string());
}
