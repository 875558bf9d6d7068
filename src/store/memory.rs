//! In-memory [`ProductStore`] implementation for tests and embedding.
//!
//! Products live in a `BTreeMap` keyed by id behind `std::sync::RwLock`, so
//! iteration order is ascending id just like the SQLite backend. Search is
//! a linear scan with [`matches_keyword`].

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::models::{NewProduct, Product};

use super::{matches_keyword, ProductStore};

#[derive(Default)]
struct Inner {
    products: BTreeMap<i64, Product>,
    last_id: i64,
}

impl Inner {
    fn insert(&mut self, product: &NewProduct) -> Product {
        self.last_id += 1;
        let stored = product.clone().into_product(self.last_id);
        self.products.insert(stored.id, stored.clone());
        stored
    }
}

/// In-memory catalog.
#[derive(Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Inner>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave `Inner` half-updated, so
    // a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: &NewProduct) -> StoreResult<Product> {
        product.validate().map_err(StoreError::Invalid)?;
        Ok(self.write().insert(product))
    }

    async fn insert_all(&self, products: &[NewProduct]) -> StoreResult<Vec<Product>> {
        for p in products {
            p.validate().map_err(StoreError::Invalid)?;
        }
        let mut inner = self.write();
        Ok(products.iter().map(|p| inner.insert(p)).collect())
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(self.read().products.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.read().products.values().cloned().collect())
    }

    async fn search(&self, keyword: &str) -> StoreResult<Vec<Product>> {
        Ok(self
            .read()
            .products
            .values()
            .filter(|p| matches_keyword(p, keyword))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, product: &NewProduct) -> StoreResult<Product> {
        product.validate().map_err(StoreError::Invalid)?;
        let mut inner = self.write();
        match inner.products.get_mut(&id) {
            Some(slot) => {
                *slot = product.clone().into_product(id);
                Ok(slot.clone())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.write().products.remove(&id).is_some())
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.read().products.len() as i64)
    }
}
