//! Perfume House CLI - cart, wishlist, catalog and checkout from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! ph-cli catalog list --gender women --sort price_asc
//!
//! # Fill the cart
//! ph-cli cart add rose-oud -q 2
//! ph-cli cart update rose-oud 1
//! ph-cli cart show
//!
//! # Wishlist
//! ph-cli wishlist toggle citrus-veil
//!
//! # Place the order
//! ph-cli checkout --name "Asha Rao" --email asha@example.in --phone 9876543210 \
//!     --address "12 MG Road" --city Bengaluru --state Karnataka --postal-code 560001
//! ```
//!
//! Cart and wishlist persist under `PERFUME_HOUSE_DATA_DIR` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use perfume_house_core::{Gender, PaymentMethod};
use perfume_house_shop::{ShippingInfo, ShopConfig, SortBy};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ph-cli")]
#[command(author, version, about = "Perfume House CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Place an order for everything in the cart
    Checkout {
        /// Recipient full name
        #[arg(long)]
        name: String,

        /// Contact email address
        #[arg(long)]
        email: String,

        /// 10-digit mobile number
        #[arg(long)]
        phone: String,

        /// Street address
        #[arg(long)]
        address: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        state: String,

        #[arg(long)]
        postal_code: String,

        #[arg(long, default_value = "India")]
        country: String,

        /// Payment method (`card`, `upi`, `wallet`, `cod`)
        #[arg(long, default_value = "card")]
        payment: PaymentMethod,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Catalog product ID
        id: String,

        /// Number of units to add
        #[arg(short, long, default_value_t = perfume_house_shop::DEFAULT_QUANTITY)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove { id: String },
    /// Set the quantity of a cart line (0 or less removes it)
    Update {
        id: String,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Show cart lines and totals
    Show,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Add a product to the wishlist
    Add { id: String },
    /// Remove a product from the wishlist
    Remove { id: String },
    /// Add the product if absent, remove it if present
    Toggle { id: String },
    /// Show wishlisted products
    Show,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products matching the filters
    List {
        /// Case-insensitive match on name or description
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// `men`, `women` or `unisex`
        #[arg(long)]
        gender: Option<Gender>,

        #[arg(long, default_value = "0")]
        min: Decimal,

        #[arg(long, default_value = "10000")]
        max: Decimal,

        /// Only limited editions
        #[arg(long)]
        limited: bool,

        /// `featured`, `price_asc`, `price_desc`, `name_asc`, `name_desc`
        #[arg(long, default_value = "featured")]
        sort: SortBy,
    },
    /// List product categories
    Categories,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ShopConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration errors are reported after tracing is up
    let config = ShopConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "perfume_house_shop=info,ph_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ShopConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Add { id, quantity } => commands::cart::add(config, &id, quantity).await?,
            CartAction::Remove { id } => commands::cart::remove(config, &id),
            CartAction::Update { id, quantity } => commands::cart::update(config, &id, quantity)?,
            CartAction::Clear => commands::cart::clear(config),
            CartAction::Show => commands::cart::show(config),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Add { id } => commands::wishlist::add(config, &id).await?,
            WishlistAction::Remove { id } => commands::wishlist::remove(config, &id),
            WishlistAction::Toggle { id } => commands::wishlist::toggle(config, &id).await?,
            WishlistAction::Show => commands::wishlist::show(config),
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                search,
                category,
                gender,
                min,
                max,
                limited,
                sort,
            } => {
                let query = perfume_house_shop::ProductQuery {
                    search,
                    category,
                    gender,
                    min_price: min,
                    max_price: max,
                    limited_only: limited,
                    sort_by: sort,
                };
                commands::catalog::list(config, &query).await?;
            }
            CatalogAction::Categories => commands::catalog::categories(config).await?,
        },
        Commands::Checkout {
            name,
            email,
            phone,
            address,
            city,
            state,
            postal_code,
            country,
            payment,
        } => {
            let shipping = ShippingInfo {
                full_name: name,
                email,
                phone,
                address,
                city,
                state,
                postal_code,
                country,
            };
            commands::checkout::place(config, &shipping, payment)?;
        }
    }
    Ok(())
}
