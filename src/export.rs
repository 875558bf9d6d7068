//! Export the catalog as JSON.
//!
//! The output is a JSON array of products including their ids. The file can
//! be fed back to `psearch import` as-is: `id` is ignored on import and the
//! store assigns fresh ids.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::store::{ProductStore, SqliteProductStore};

/// Export every product as JSON.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub async fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let store = SqliteProductStore::connect(config).await?;
    let result = store.list().await;
    store.close().await;
    let products = result?;

    let json = serde_json::to_string_pretty(&products)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write export file: {}", path.display()))?;
            eprintln!(
                "Exported {} products to {}",
                products.len(),
                path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
