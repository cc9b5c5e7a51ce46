//! Databundle CLI - Operator tools for agent storefronts.
//!
//! # Usage
//!
//! ```bash
//! # Check a number against a network's prefixes
//! bundle-cli phone YELLO 0241234567
//!
//! # List a store's bundles, filtered and sorted like the storefront
//! bundle-cli catalog ama-data --network TELECEL --sort price-asc
//!
//! # Verify a payment reference
//! bundle-cli verify ama-data T1234567890
//!
//! # Track a purchase by phone or reference
//! bundle-cli track 0241234567 --store ama-data
//! ```
//!
//! # Commands
//!
//! - `phone` - Validate a recipient number (no network access)
//! - `catalog` - Fetch and filter a store's products
//! - `verify` - Run a single payment verification
//! - `track` - Search orders or mobile-money purchases

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "bundle-cli")]
#[command(author, version, about = "Data-bundle storefront CLI tools")]
struct Cli {
    /// Commerce API base URL
    #[arg(long, global = true, env = "COMMERCE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a recipient phone number for a network
    Phone {
        /// Network code (YELLO, TELECEL, AT_PREMIUM)
        network: String,
        /// Phone number as typed by a customer
        number: String,
    },
    /// List a store's bundles
    Catalog {
        /// Store slug
        slug: String,
        /// Only show one network
        #[arg(long)]
        network: Option<String>,
        /// Match capacity or network
        #[arg(long)]
        search: Option<String>,
        /// Sort order (default, price-asc, price-desc, capacity-asc, capacity-desc)
        #[arg(long)]
        sort: Option<String>,
    },
    /// Verify a payment reference once
    Verify {
        /// Store slug
        slug: String,
        /// Payment reference returned by the gateway
        reference: String,
    },
    /// Track orders by phone number or payment reference
    Track {
        /// Phone number or payment reference
        query: String,
        /// Search one store's orders instead of mobile-money purchases
        #[arg(long)]
        store: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before parsing so `COMMERCE_API_URL` can come from it
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let api_url = cli.api_url.as_deref();
    match cli.command {
        Commands::Phone { network, number } => commands::phone::check(&network, &number)?,
        Commands::Catalog {
            slug,
            network,
            search,
            sort,
        } => {
            let client = commands::client(api_url)?;
            commands::catalog::list(
                &client,
                &slug,
                network.as_deref(),
                search.as_deref(),
                sort.as_deref(),
            )
            .await?;
        }
        Commands::Verify { slug, reference } => {
            let client = commands::client(api_url)?;
            commands::verify::run(&client, &slug, &reference).await?;
        }
        Commands::Track { query, store } => {
            let client = commands::client(api_url)?;
            commands::track::run(&client, &query, store.as_deref()).await?;
        }
    }
    Ok(())
}
