//! storefront CLI - browse products and manage the signed-in user's cart.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use storefront_auth::{AuthToken, InMemorySessionStore};
use storefront_cart::{CartItem, CheckoutSummary, MutationError, Notice};
use storefront_catalog::{CatalogQuery, ProductId};
use storefront_client::{CatalogSource, ClientConfig, HttpBackend, Storefront};
use storefront_observability::LogFormat;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(version)]
#[command(about = "Browse the storefront catalog and manage your cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend API URL (overrides STOREFRONT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides STOREFRONT_AUTH_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in seconds (overrides STOREFRONT_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log output format: json or pretty (overrides STOREFRONT_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only products whose name or category contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List the product categories
    Categories,

    /// Show the cart
    Cart,

    /// Show order details for checkout
    Checkout,

    /// Add a product to the cart
    Add {
        product_id: String,

        /// Reset quantity to 1 if the product is already in the cart
        #[arg(long)]
        allow_duplicate: bool,
    },

    /// Set a product's quantity (0 removes it)
    Set {
        product_id: String,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },

    /// Increase a product's quantity by one
    Inc { product_id: String },

    /// Decrease a product's quantity by one
    Dec { product_id: String },
}

#[derive(Serialize)]
struct CheckoutOutput {
    #[serde(flatten)]
    summary: CheckoutSummary,
    balance: Option<f64>,
    balance_after: Option<f64>,
}

#[derive(Serialize)]
struct CartOutput<'a> {
    items: &'a [CartItem],
    total: f64,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_cart(items: &[CartItem]) -> Result<()> {
    print_json(&CartOutput {
        items,
        total: storefront_cart::total_value(items),
    })
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("invalid configuration")?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(raw) = &cli.token {
        config.auth_token = Some(AuthToken::new(raw.as_str()).context("invalid --token")?);
    }
    if let Some(secs) = cli.timeout_secs {
        anyhow::ensure!(secs > 0, "--timeout-secs must be at least 1");
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn product_id(raw: &str) -> Result<ProductId> {
    ProductId::new(raw).with_context(|| format!("invalid product id {raw:?}"))
}

/// Attach what the user should do next to a failed mutation.
fn mutation_failed(err: MutationError) -> anyhow::Error {
    let hint = match err.notice() {
        Notice::Authenticate => "not signed in: set STOREFRONT_AUTH_TOKEN or pass --token",
        Notice::Validation => "request rejected",
        Notice::Transient => "cart unchanged, try again",
    };
    anyhow::Error::new(err).context(hint)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    storefront_observability::init(config.log_format);

    tracing::debug!(api_url = %config.api_url, "starting storefront client");

    let backend = Arc::new(HttpBackend::new(config.api_url.clone(), config.timeout)?);
    let session = Arc::new(InMemorySessionStore::new(config.session()));
    let mut storefront = Storefront::new(backend.clone(), backend.clone(), session);

    match cli.command {
        // Browsing needs no cart.
        Commands::Products { category, search } => {
            let query = CatalogQuery {
                category,
                text: search,
            };
            let catalog = backend.fetch_catalog(Some(&query)).await?;
            print_json(&catalog)?;
        }
        Commands::Categories => {
            let catalog = backend.fetch_catalog(None).await?;
            print_json(&catalog.categories())?;
        }
        Commands::Cart => {
            storefront.load(None).await?;
            print_cart(storefront.items())?;
        }
        Commands::Checkout => {
            storefront.load(None).await?;
            let output = CheckoutOutput {
                summary: storefront.checkout_summary(),
                balance: storefront.session().balance(),
                balance_after: storefront.balance_after_checkout(),
            };
            print_json(&output)?;
            if storefront.balance_covers_cart() == Some(false) {
                tracing::warn!(total = output.summary.total, "wallet balance does not cover the order");
            }
        }
        Commands::Add {
            product_id: raw,
            allow_duplicate,
        } => {
            storefront.load(None).await?;
            let items = storefront
                .add_to_cart(product_id(&raw)?, !allow_duplicate)
                .await
                .map_err(mutation_failed)?;
            print_cart(items)?;
        }
        Commands::Set {
            product_id: raw,
            quantity,
        } => {
            storefront.load(None).await?;
            let items = storefront
                .set_quantity(product_id(&raw)?, quantity)
                .await
                .map_err(mutation_failed)?;
            print_cart(items)?;
        }
        Commands::Inc { product_id: raw } => {
            storefront.load(None).await?;
            let items = storefront
                .increment(&product_id(&raw)?)
                .await
                .map_err(mutation_failed)?;
            print_cart(items)?;
        }
        Commands::Dec { product_id: raw } => {
            storefront.load(None).await?;
            let items = storefront
                .decrement(&product_id(&raw)?)
                .await
                .map_err(mutation_failed)?;
            print_cart(items)?;
        }
    }

    Ok(())
}
