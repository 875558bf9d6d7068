//! Errors raised by the storage layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed to execute a statement (connectivity loss,
    /// malformed query, constraint violation, pool timeout).
    #[error("data access failure: {0}")]
    DataAccess(#[from] sqlx::Error),

    #[error("product not found: {0}")]
    NotFound(i64),

    #[error("invalid product: {0}")]
    Invalid(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
