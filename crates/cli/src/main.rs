//! Bazaar CLI - drive the storefront cart and checkout from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add product 12 to the cart (first seller listing)
//! bazaar cart add --product 12
//!
//! # Add product 12 from seller 3
//! bazaar cart add --product 12 --seller 3
//!
//! # Show the cart and write the cart fragment to a file
//! bazaar cart show --html cart.html
//!
//! # Change or remove a line
//! bazaar cart inc 41
//! bazaar cart dec 41
//! bazaar cart remove 41
//!
//! # Walk the order wizard with a filled-in form
//! bazaar checkout --draft order.yaml --total 100.00 --express-price 15.00
//! ```
//!
//! # Environment Variables
//!
//! See `bazaar_storefront::config`. `BAZAAR_LOG_JSON=1` switches logs to
//! JSON lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use bazaar_core::{CartLineId, ProductId, SellerId};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront cart and checkout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Walk the order wizard up to the confirmation step
    Checkout {
        /// YAML file with the form values
        #[arg(short, long)]
        draft: PathBuf,

        /// Order total when the checkout page was opened
        #[arg(short, long)]
        total: Decimal,

        /// Surcharge for express delivery
        #[arg(short, long, default_value = "0")]
        express_price: Decimal,

        /// Write the rendered wizard to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(short, long)]
        product: ProductId,

        /// Only use this seller's listing
        #[arg(short, long)]
        seller: Option<SellerId>,
    },
    /// Show lines and the total
    Show {
        /// Write the rendered cart to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Remove a line
    Remove { line: CartLineId },
    /// Add one unit to a line
    Inc { line: CartLineId },
    /// Take one unit from a line (removes it at zero)
    Dec { line: CartLineId },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_storefront=info,bazaar_cli=info".into());

    let json = std::env::var("BAZAAR_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Add { product, seller } => commands::cart::add(product, seller).await?,
            CartAction::Show { html } => commands::cart::show(html.as_deref()).await?,
            CartAction::Remove { line } => commands::cart::remove(line).await?,
            CartAction::Inc { line } => commands::cart::change(line, 1).await?,
            CartAction::Dec { line } => commands::cart::change(line, -1).await?,
        },
        Commands::Checkout {
            draft,
            total,
            express_price,
            html,
        } => commands::checkout::run(&draft, total, express_price, html.as_deref()).await?,
    }
    Ok(())
}
