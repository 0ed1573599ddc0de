use thiserror::Error;

use crate::domain::item::models::ItemId;
use crate::domain::store::models::StoreId;
use crate::domain::tag::models::TagId;

/// Error type for TagName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagNameError {
    #[error("Tag name is empty")]
    Empty,

    #[error("Tag name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error type for all tag-related operations
#[derive(Debug, Clone, Error)]
pub enum TagError {
    #[error("Invalid tag name: {0}")]
    InvalidTagName(#[from] TagNameError),

    #[error("Tag not found: {0}")]
    NotFound(TagId),

    #[error("Store not found: {0}")]
    StoreNotFound(StoreId),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("A tag with that name already exists in store {store_id}: {name}")]
    NameAlreadyExists { store_id: StoreId, name: String },

    #[error("Item {item_id} and tag {tag_id} belong to different stores")]
    StoreMismatch { item_id: ItemId, tag_id: TagId },

    #[error("Item {item_id} is not tagged with {tag_id}")]
    NotLinked { item_id: ItemId, tag_id: TagId },

    #[error("Could not delete tag {0}. Make sure tag is not associated with any items, then try again.")]
    StillLinked(TagId),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
