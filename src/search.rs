//! Keyword search over the product catalog.
//!
//! [`search_products`] opens the configured database and returns structured
//! results; `psearch search` prints them. The HTTP server keeps its own
//! store and calls [`ProductStore::search`](crate::store::ProductStore::search)
//! directly, which is where matching lives.

use anyhow::Result;

use crate::config::Config;
use crate::models::Product;
use crate::store::{ProductStore, SqliteProductStore};

/// Open the configured database and return every product matching `keyword`.
///
/// Results are ordered by ascending id. A data-access failure is returned
/// as an error, never as an empty result. The database must already exist;
/// searching never creates files or directories.
pub async fn search_products(config: &Config, keyword: &str) -> Result<Vec<Product>> {
    let store = SqliteProductStore::connect_existing(config).await?;
    let result = store.search(keyword).await;
    store.close().await;
    Ok(result?)
}

/// CLI entry point: run the search and print the matches.
pub async fn run_search(config: &Config, keyword: &str, json: bool) -> Result<()> {
    let products = search_products(config, keyword).await?;
    tracing::info!(keyword, matches = products.len(), "search complete");

    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    if products.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, p) in products.iter().enumerate() {
        print_product_summary(i + 1, p);
    }
    println!("{} result(s).", products.len());

    Ok(())
}

pub(crate) fn print_product_summary(position: usize, p: &Product) {
    println!(
        "{}. [{}] {}",
        position,
        p.id,
        p.name.as_deref().unwrap_or("(unnamed)")
    );
    println!(
        "    brand: {}  category: {}",
        p.brand.as_deref().unwrap_or("-"),
        p.category.as_deref().unwrap_or("-")
    );
    println!(
        "    price: {:.2}  stock: {}{}",
        p.price,
        p.stock_quantity,
        if p.available { "" } else { "  (unavailable)" }
    );
    if let Some(ref desc) = p.description {
        println!("    description: \"{}\"", desc.replace('\n', " ").trim());
    }
    println!();
}
