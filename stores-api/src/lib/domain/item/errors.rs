use thiserror::Error;

use crate::domain::item::models::ItemId;
use crate::domain::store::models::StoreId;

/// Error for ItemName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemNameError {
    #[error("Item name is empty")]
    Empty,

    #[error("Item name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Price validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("Price must be a finite number")]
    NotFinite,

    #[error("Price must not be negative")]
    Negative,
}

/// Top-level error type for all item-related operations
#[derive(Debug, Clone, Error)]
pub enum ItemError {
    #[error("Invalid item name: {0}")]
    InvalidItemName(#[from] ItemNameError),

    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Item name must be unique: {0}")]
    NameAlreadyExists(String),

    #[error("Store does not exist: {0}")]
    UnknownStore(StoreId),

    #[error("Admin privilege required.")]
    AdminRequired,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
