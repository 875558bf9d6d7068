use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::config::Config;
use crate::db;
use crate::store::fold_case;

/// Searchable columns and the case-folded copies keyword search runs on.
const FOLDED_COLUMNS: [(&str, &str); 4] = [
    ("name", "name_lc"),
    ("description", "description_lc"),
    ("brand", "brand_lc"),
    ("category", "category_lc"),
];

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply(&pool).await?;
    pool.close().await;
    tracing::info!(path = %config.db.path.display(), "schema migrations applied");
    Ok(())
}

/// Create the catalog schema on an open pool. Safe to run repeatedly.
pub async fn apply(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            description TEXT,
            brand TEXT,
            category TEXT,
            name_lc TEXT,
            description_lc TEXT,
            brand_lc TEXT,
            category_lc TEXT,
            price REAL NOT NULL DEFAULT 0,
            release_date TEXT,
            available INTEGER NOT NULL DEFAULT 1,
            stock_quantity INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Databases created before the folded columns existed
    let existing: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('products')")
        .fetch_all(pool)
        .await?;
    let mut added = false;
    for (_, folded) in FOLDED_COLUMNS {
        if !existing.iter().any(|c| c == folded) {
            sqlx::query(&format!("ALTER TABLE products ADD COLUMN {folded} TEXT"))
                .execute(pool)
                .await?;
            added = true;
        }
    }
    if added {
        backfill_folded_columns(pool).await?;
    }

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_category ON products(category)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_brand ON products(brand)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Recompute every `*_lc` column from its source column.
///
/// Done in Rust because SQLite's `lower()` only folds ASCII.
async fn backfill_folded_columns(pool: &SqlitePool) -> Result<()> {
    let rows = sqlx::query("SELECT id, name, description, brand, category FROM products")
        .fetch_all(pool)
        .await?;

    let mut tx = pool.begin().await?;
    for row in &rows {
        let id: i64 = row.get("id");
        let mut update = sqlx::query(
            "UPDATE products SET name_lc = ?, description_lc = ?, brand_lc = ?, category_lc = ? WHERE id = ?",
        );
        for (source, _) in FOLDED_COLUMNS {
            let value: Option<String> = row.get(source);
            update = update.bind(value.as_deref().map(fold_case));
        }
        update.bind(id).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(rows = rows.len(), "backfilled case-folded search columns");
    Ok(())
}
