use thiserror::Error;

use crate::domain::store::models::StoreId;

/// Error type for StoreName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreNameError {
    #[error("Store name is empty")]
    Empty,

    #[error("Store name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error type for all store-related operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Invalid store name: {0}")]
    InvalidStoreName(#[from] StoreNameError),

    #[error("Store not found: {0}")]
    NotFound(StoreId),

    #[error("A store with that name already exists: {0}")]
    NameAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
