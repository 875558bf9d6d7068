//! Catalog statistics.
//!
//! Gives a quick summary of what is stored: product count, database size
//! and a per-category breakdown. Used by `psearch stats`.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::config::Config;
use crate::db;

/// Per-category product and stock counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    /// `None` for products without a category.
    pub category: Option<String>,
    pub product_count: i64,
    pub in_stock_count: i64,
}

pub async fn category_stats(pool: &SqlitePool) -> Result<Vec<CategoryStats>> {
    let rows = sqlx::query(
        r#"
        SELECT
            category,
            COUNT(*) AS product_count,
            SUM(CASE WHEN available = 1 AND stock_quantity > 0 THEN 1 ELSE 0 END) AS in_stock_count
        FROM products
        GROUP BY category
        ORDER BY product_count DESC, category ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| CategoryStats {
            category: row.get("category"),
            product_count: row.get("product_count"),
            in_stock_count: row.get("in_stock_count"),
        })
        .collect())
}

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;
    let categories = category_stats(&pool).await?;
    pool.close().await;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Product Search — Catalog Stats");
    println!("==============================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  Products:    {}", total);

    if !categories.is_empty() {
        println!();
        println!("  By category:");
        println!("  {:<32} {:>8} {:>9}", "CATEGORY", "PRODUCTS", "IN STOCK");
        println!("  {}", "-".repeat(51));
        for c in &categories {
            println!(
                "  {:<32} {:>8} {:>9}",
                c.category.as_deref().unwrap_or("(none)"),
                c.product_count,
                c.in_stock_count
            );
        }
    }

    println!();
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate;
    use crate::models::NewProduct;
    use crate::store::{ProductStore, SqliteProductStore};
    use tempfile::TempDir;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[tokio::test]
    async fn test_category_stats_groups_and_counts_stock() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::with_db_path(tmp.path().join("stats.sqlite"));
        let store = SqliteProductStore::connect(&cfg).await.unwrap();
        migrate::apply(store.pool()).await.unwrap();

        let item = |category: Option<&str>, stock: i64, available: bool| NewProduct {
            category: category.map(String::from),
            stock_quantity: stock,
            available,
            ..Default::default()
        };
        store
            .insert_all(&[
                item(Some("Footwear"), 3, true),
                item(Some("Footwear"), 0, true),
                item(Some("Footwear"), 5, false),
                item(Some("Shirts"), 1, true),
                item(None, 2, true),
            ])
            .await
            .unwrap();

        let stats = category_stats(store.pool()).await.unwrap();
        assert_eq!(
            stats[0],
            CategoryStats {
                category: Some("Footwear".into()),
                product_count: 3,
                in_stock_count: 1,
            }
        );
        assert_eq!(stats.len(), 3);
        assert!(stats
            .iter()
            .any(|s| s.category.is_none() && s.product_count == 1));
    }
}
