//! Storage abstraction for the product catalog.
//!
//! The [`ProductStore`] trait defines every catalog operation the CLI and
//! HTTP server need, so callers can run against SQLite in production and
//! against the in-memory backend in tests.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.
//!
//! # Keyword matching
//!
//! Both backends share one definition of a match: a product matches a
//! keyword when any of `name`, `description`, `brand` or `category`
//! contains the keyword as a substring after Unicode lower-casing
//! ([`fold_case`]). A NULL field never matches, so the empty keyword returns
//! every product with at least one non-null searchable field.
//!
//! SQLite's built-in `lower()` only folds ASCII, so the SQLite backend stores
//! a [`fold_case`]d copy of each searchable column (`name_lc` and friends)
//! and matches against those instead.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{NewProduct, Product};

pub use memory::InMemoryProductStore;
pub use sqlite::SqliteProductStore;

/// Abstract catalog backend.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert`](ProductStore::insert) | Store a new product, assigning its id |
/// | [`insert_all`](ProductStore::insert_all) | Store a batch atomically |
/// | [`get`](ProductStore::get) | Look up one product by id |
/// | [`list`](ProductStore::list) | Every product, ascending id |
/// | [`search`](ProductStore::search) | Keyword search, ascending id |
/// | [`update`](ProductStore::update) | Replace a product's attributes |
/// | [`delete`](ProductStore::delete) | Remove a product |
/// | [`count`](ProductStore::count) | Number of stored products |
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: &NewProduct) -> StoreResult<Product>;

    /// Insert every product or none of them.
    async fn insert_all(&self, products: &[NewProduct]) -> StoreResult<Vec<Product>>;

    async fn get(&self, id: i64) -> StoreResult<Option<Product>>;

    async fn list(&self) -> StoreResult<Vec<Product>>;

    /// Return every product whose searchable fields contain `keyword`,
    /// ignoring case.
    async fn search(&self, keyword: &str) -> StoreResult<Vec<Product>>;

    /// Fails with [`StoreError::NotFound`](crate::error::StoreError::NotFound)
    /// when no product has this id.
    async fn update(&self, id: i64, product: &NewProduct) -> StoreResult<Product>;

    /// Returns `true` when a product was removed.
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<i64>;
}

/// Pure form of the keyword predicate, used by the in-memory backend.
pub fn matches_keyword(product: &Product, keyword: &str) -> bool {
    let needle = fold_case(keyword);
    product
        .searchable_fields()
        .iter()
        .flatten()
        .any(|field| fold_case(field).contains(&needle))
}

/// Case folding used for every keyword comparison.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Build a `LIKE` pattern matching `keyword` as a literal substring.
///
/// `%`, `_` and the escape character itself are escaped with `\`; the
/// query must declare `ESCAPE '\'`.
pub fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
