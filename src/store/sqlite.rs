//! SQLite [`ProductStore`] backed by a `sqlx` connection pool.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::error::{StoreError, StoreResult};
use crate::models::{NewProduct, Product};

use super::{fold_case, like_pattern, ProductStore};

const COLUMNS: &str =
    "id, name, description, brand, category, price, release_date, available, stock_quantity";

pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `config` and wrap it.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(db::connect(config).await?))
    }

    /// Open a database that must already exist. Nothing is created on
    /// disk, so a wrong path is a data-access failure.
    pub async fn connect_existing(config: &Config) -> StoreResult<Self> {
        Ok(Self::new(db::connect_existing(config).await?))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn folded(field: &Option<String>) -> Option<String> {
    field.as_deref().map(fold_case)
}

async fn insert_with<'e, E>(executor: E, product: &NewProduct) -> StoreResult<Product>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    product.validate().map_err(StoreError::Invalid)?;

    let result = sqlx::query(
        r#"
        INSERT INTO products
            (name, description, brand, category,
             name_lc, description_lc, brand_lc, category_lc,
             price, release_date, available, stock_quantity)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.brand)
    .bind(&product.category)
    .bind(folded(&product.name))
    .bind(folded(&product.description))
    .bind(folded(&product.brand))
    .bind(folded(&product.category))
    .bind(product.price)
    .bind(product.release_date)
    .bind(product.available)
    .bind(product.stock_quantity)
    .execute(executor)
    .await?;

    Ok(product.clone().into_product(result.last_insert_rowid()))
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    async fn insert(&self, product: &NewProduct) -> StoreResult<Product> {
        insert_with(&self.pool, product).await
    }

    async fn insert_all(&self, products: &[NewProduct]) -> StoreResult<Vec<Product>> {
        for p in products {
            p.validate().map_err(StoreError::Invalid)?;
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(products.len());
        for p in products {
            inserted.push(insert_with(&mut *tx, p).await?);
        }
        tx.commit().await?;

        Ok(inserted)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Product>> {
        let product =
            sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(product)
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        let products =
            sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(products)
    }

    async fn search(&self, keyword: &str) -> StoreResult<Vec<Product>> {
        // The *_lc columns hold fold_case(field), so comparing them with the
        // folded keyword is the same as lower(field) LIKE lower(keyword) with
        // full Unicode folding. ?1 is reused by all four predicates; a NULL
        // field makes its predicate NULL, which OR treats as no match.
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM products
            WHERE name_lc LIKE ?1 ESCAPE '\'
               OR description_lc LIKE ?1 ESCAPE '\'
               OR brand_lc LIKE ?1 ESCAPE '\'
               OR category_lc LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(like_pattern(&fold_case(keyword)))
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(keyword, matches = products.len(), "keyword search");
        Ok(products)
    }

    async fn update(&self, id: i64, product: &NewProduct) -> StoreResult<Product> {
        product.validate().map_err(StoreError::Invalid)?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, brand = ?, category = ?,
                name_lc = ?, description_lc = ?, brand_lc = ?, category_lc = ?,
                price = ?, release_date = ?, available = ?, stock_quantity = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(folded(&product.name))
        .bind(folded(&product.description))
        .bind(folded(&product.brand))
        .bind(folded(&product.category))
        .bind(product.price)
        .bind(product.release_date)
        .bind(product.available)
        .bind(product.stock_quantity)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(product.clone().into_product(id))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
