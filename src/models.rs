//! Core data models.
//!
//! A [`Product`] is a stored catalog row; a [`NewProduct`] carries the same
//! attributes without an id and is what callers hand to a store for inserts
//! and updates (and what `import` reads from JSON).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A catalog record as stored in the database.
///
/// The four text fields are the searchable ones; any of them may be NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub release_date: Option<NaiveDate>,
    pub available: bool,
    pub stock_quantity: i64,
}

/// Product attributes without an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub stock_quantity: i64,
}

fn default_available() -> bool {
    true
}

impl Default for NewProduct {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            brand: None,
            category: None,
            price: 0.0,
            release_date: None,
            available: true,
            stock_quantity: 0,
        }
    }
}

impl NewProduct {
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            brand: self.brand,
            category: self.category,
            price: self.price,
            release_date: self.release_date,
            available: self.available,
            stock_quantity: self.stock_quantity,
        }
    }

    /// Reject attribute values no store should accept.
    pub fn validate(&self) -> Result<(), String> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("price must be a non-negative number, got {}", self.price));
        }
        if self.stock_quantity < 0 {
            return Err(format!(
                "stock_quantity must be >= 0, got {}",
                self.stock_quantity
            ));
        }
        Ok(())
    }
}

impl Product {
    /// The searchable text fields, in match order.
    pub fn searchable_fields(&self) -> [Option<&str>; 4] {
        [
            self.name.as_deref(),
            self.description.as_deref(),
            self.brand.as_deref(),
            self.category.as_deref(),
        ]
    }
}
