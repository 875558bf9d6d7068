//! Catalog maintenance commands: add, import, list, get and delete.
//!
//! Each command opens the configured database, performs one store
//! operation and prints the outcome.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::models::{NewProduct, Product};
use crate::search::print_product_summary;
use crate::store::{ProductStore, SqliteProductStore};

pub async fn run_add(config: &Config, product: NewProduct) -> Result<()> {
    let store = SqliteProductStore::connect(config).await?;
    let result = store.insert(&product).await;
    store.close().await;

    let created = result?;
    tracing::info!(id = created.id, "product added");
    println!("added product {}", created.id);
    Ok(())
}

/// Read a JSON array of products and insert them in one transaction.
pub async fn run_import(config: &Config, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    let products: Vec<NewProduct> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse import file: {}", path.display()))?;

    let store = SqliteProductStore::connect(config).await?;
    let result = store.insert_all(&products).await;
    store.close().await;

    let inserted = result.with_context(|| format!("import of {} aborted", path.display()))?;
    tracing::info!(count = inserted.len(), file = %path.display(), "import complete");
    println!("imported products: {}", inserted.len());
    Ok(())
}

pub async fn run_list(config: &Config, json: bool) -> Result<()> {
    let store = SqliteProductStore::connect(config).await?;
    let result = store.list().await;
    store.close().await;
    let products = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
    } else if products.is_empty() {
        println!("No products.");
    } else {
        for (i, p) in products.iter().enumerate() {
            print_product_summary(i + 1, p);
        }
    }
    Ok(())
}

/// Fetch one product, failing when the id is unknown.
pub async fn get_product(config: &Config, id: i64) -> Result<Product> {
    let store = SqliteProductStore::connect(config).await?;
    let result = store.get(id).await;
    store.close().await;

    match result? {
        Some(p) => Ok(p),
        None => bail!("product not found: {}", id),
    }
}

pub async fn run_get(config: &Config, id: i64) -> Result<()> {
    let p = get_product(config, id).await?;

    println!("--- Product ---");
    println!("id:             {}", p.id);
    println!("name:           {}", p.name.as_deref().unwrap_or("(unnamed)"));
    println!("brand:          {}", p.brand.as_deref().unwrap_or("-"));
    println!("category:       {}", p.category.as_deref().unwrap_or("-"));
    println!("price:          {:.2}", p.price);
    if let Some(date) = p.release_date {
        println!("release_date:   {}", date.format("%Y-%m-%d"));
    }
    println!("available:      {}", p.available);
    println!("stock_quantity: {}", p.stock_quantity);
    println!();
    println!("--- Description ---");
    println!("{}", p.description.as_deref().unwrap_or(""));

    Ok(())
}

pub async fn run_delete(config: &Config, id: i64) -> Result<()> {
    let store = SqliteProductStore::connect(config).await?;
    let result = store.delete(id).await;
    store.close().await;

    if !result? {
        bail!("product not found: {}", id);
    }
    tracing::info!(id, "product deleted");
    println!("deleted product {}", id);
    Ok(())
}
