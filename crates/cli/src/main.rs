//! `MountRush` CLI - browse the catalog, shop, and manage products and coupons.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! mountrush catalog list --search tent --sort price-asc
//!
//! # Shop
//! mountrush cart add p-tent-01 --qty 2
//! mountrush promo apply MOUNT10
//! mountrush cart show
//! mountrush checkout
//!
//! # Manage
//! mountrush admin products apply products.json
//! mountrush admin coupons create SUMMER15 --kind percent --value 15
//! ```
//!
//! State lives in a JSON file (`MOUNTRUSH_STATE_PATH`, or `--state`). See
//! `mountrush_storefront::config` for the other environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mountrush_core::ProductId;
use mountrush_storefront::config::ShopConfig;
use mountrush_storefront::storage::JsonFileStore;
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "mountrush")]
#[command(author, version, about = "MountRush storefront CLI")]
struct Cli {
    /// State file (overrides `MOUNTRUSH_STATE_PATH`)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Catalog file or URL (overrides `MOUNTRUSH_CATALOG`)
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Shop(ShopCommand),
    /// Manage the product override and coupons
    Admin {
        #[command(subcommand)]
        area: AdminArea,
    },
}

#[derive(Subcommand)]
enum ShopCommand {
    /// Browse products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// View and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Apply promo codes
    Promo {
        #[command(subcommand)]
        action: PromoAction,
    },
    /// View and change the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Place the order (simulated) and empty the cart
    Checkout,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,

        /// Only this category (`all` for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// `featured`, `price-asc`, `price-desc` or `popular`
        #[arg(long, default_value = "featured")]
        sort: String,
    },
    /// List categories
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines and totals
    Show,
    /// Add a product
    Add {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Set the quantity of a line
    Set {
        id: ProductId,

        #[arg(allow_negative_numbers = true)]
        qty: f64,
    },
    /// Remove a line
    Remove { id: ProductId },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum PromoAction {
    /// Apply a promo code
    Apply { code: String },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save or unsave a product
    Toggle { id: ProductId },
}

#[derive(Subcommand)]
enum AdminArea {
    /// Manage the product override list
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage coupons
    Coupons {
        #[command(subcommand)]
        action: CouponsAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List override products
    List,
    /// Replace the override with a JSON product array file
    Apply { file: PathBuf },
    /// Print the override as JSON, or write it to a file
    Export {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Delete one override product
    Delete { id: ProductId },
    /// Remove the override
    Clear,
    /// Replace the override with products from a published CSV sheet
    ImportSheet { url: Url },
}

#[derive(Subcommand)]
enum CouponsAction {
    /// List coupons
    List,
    /// Create or replace a coupon
    Create {
        code: String,

        /// `percent`, `fixed` or `freeship`
        #[arg(short, long)]
        kind: String,

        #[arg(short, long, allow_negative_numbers = true)]
        value: Option<Decimal>,
    },
    /// Delete a coupon
    Delete { code: String },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mountrush=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> commands::CmdResult {
    let mut config = ShopConfig::from_env()?;
    if let Some(state) = cli.state {
        config.state_path = state;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog_location = catalog;
    }

    let store = JsonFileStore::open(&config.state_path)?;
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Admin { area } => run_admin(area, store, client).await,
        Commands::Shop(command) => {
            let mut session = commands::shop::open(store, &config, &client).await;
            let result = run_shop(command, &mut session);
            session.flush_analytics(commands::shop::ANALYTICS_GRACE).await;
            result
        }
    }
}

fn run_shop(command: ShopCommand, session: &mut commands::shop::Session) -> commands::CmdResult {
    use commands::shop;

    match command {
        ShopCommand::Catalog { action } => match action {
            CatalogAction::List {
                search,
                category,
                sort,
            } => shop::list_catalog(session, search, category, &sort)?,
            CatalogAction::Categories => shop::list_categories(session),
        },
        ShopCommand::Cart { action } => match action {
            CartAction::Show => shop::show_cart(session),
            CartAction::Add { id, qty } => shop::add(session, &id, qty)?,
            CartAction::Set { id, qty } => shop::set(session, &id, qty)?,
            CartAction::Remove { id } => shop::remove(session, &id)?,
            CartAction::Clear => shop::clear(session)?,
        },
        ShopCommand::Promo {
            action: PromoAction::Apply { code },
        } => shop::apply_promo(session, &code)?,
        ShopCommand::Wishlist { action } => match action {
            WishlistAction::Show => shop::show_wishlist(session),
            WishlistAction::Toggle { id } => shop::toggle_wishlist(session, &id)?,
        },
        ShopCommand::Checkout => shop::checkout(session)?,
    }
    Ok(())
}

async fn run_admin(
    area: AdminArea,
    mut store: JsonFileStore,
    client: reqwest::Client,
) -> commands::CmdResult {
    use commands::admin;

    match area {
        AdminArea::Products { action } => match action {
            ProductsAction::List => admin::list_products(&store),
            ProductsAction::Apply { file } => admin::apply_products(&mut store, &file).await?,
            ProductsAction::Export { out } => {
                admin::export_products(&store, out.as_deref()).await?;
            }
            ProductsAction::Delete { id } => admin::delete_product(&mut store, &id)?,
            ProductsAction::Clear => admin::clear_override(&mut store)?,
            ProductsAction::ImportSheet { url } => {
                admin::import_sheet(&mut store, client, &url).await?;
            }
        },
        AdminArea::Coupons { action } => match action {
            CouponsAction::List => admin::list_coupons(&store),
            CouponsAction::Create { code, kind, value } => {
                admin::create_coupon(&mut store, &code, &kind, value)?;
            }
            CouponsAction::Delete { code } => admin::delete_coupon(&mut store, &code)?,
        },
    }
    Ok(())
}
