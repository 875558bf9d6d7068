//! # Product Search CLI (`psearch`)
//!
//! Maintains a SQLite product catalog and answers case-insensitive keyword
//! searches over product name, description, brand and category.
//!
//! ## Usage
//!
//! ```bash
//! psearch --config ./config/psearch.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `psearch init` | Create the SQLite database and run schema migrations |
//! | `psearch add --name ..` | Add one product |
//! | `psearch import <file>` | Insert products from a JSON array |
//! | `psearch search <keyword>` | Keyword search |
//! | `psearch list` | List every product |
//! | `psearch get <id>` | Show one product |
//! | `psearch delete <id>` | Delete one product |
//! | `psearch export` | Dump the catalog as JSON |
//! | `psearch stats` | Catalog summary |
//! | `psearch serve` | Start the HTTP API |

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use product_search::models::NewProduct;
use product_search::{catalog, config, export, migrate, search, server, stats};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Product Search CLI — a SQLite product catalog with keyword search.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/psearch.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "psearch",
    about = "Product Search — a SQLite product catalog with case-insensitive keyword search",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/psearch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Idempotent; running it multiple times is safe.
    Init,

    /// Add a single product.
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
        /// Release date (YYYY-MM-DD).
        #[arg(long)]
        release_date: Option<NaiveDate>,
        #[arg(long, default_value_t = 0)]
        stock: i64,
        /// Mark the product as not available for sale.
        #[arg(long)]
        unavailable: bool,
    },

    /// Insert products from a JSON file containing an array of products.
    ///
    /// All products are inserted or none are.
    Import { file: PathBuf },

    /// Search products by keyword.
    ///
    /// Matches products whose name, description, brand or category contains
    /// the keyword, ignoring case. An empty keyword matches every product
    /// with at least one of those fields set.
    Search {
        keyword: String,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List every product.
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show a product by id.
    Get { id: i64 },

    /// Delete a product by id.
    Delete { id: i64 },

    /// Export the catalog as JSON.
    Export {
        /// Output file. Defaults to stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show catalog statistics.
    Stats,

    /// Start the HTTP API on `[server].bind`.
    Serve,
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    init_logging(&cfg.logging.filter);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Add {
            name,
            description,
            brand,
            category,
            price,
            release_date,
            stock,
            unavailable,
        } => {
            let product = NewProduct {
                name,
                description,
                brand,
                category,
                price,
                release_date,
                available: !unavailable,
                stock_quantity: stock,
            };
            catalog::run_add(&cfg, product).await?;
        }
        Commands::Import { file } => {
            catalog::run_import(&cfg, &file).await?;
        }
        Commands::Search { keyword, json } => {
            search::run_search(&cfg, &keyword, json).await?;
        }
        Commands::List { json } => {
            catalog::run_list(&cfg, json).await?;
        }
        Commands::Get { id } => {
            catalog::run_get(&cfg, id).await?;
        }
        Commands::Delete { id } => {
            catalog::run_delete(&cfg, id).await?;
        }
        Commands::Export { output } => {
            export::run_export(&cfg, output.as_deref()).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
