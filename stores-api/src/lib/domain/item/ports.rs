use async_trait::async_trait;

use crate::domain::item::errors::ItemError;
use crate::domain::item::models::Item;
use crate::domain::item::models::ItemFields;
use crate::domain::item::models::ItemId;
use crate::domain::item::models::Upserted;

/// Port for item domain service operations.
#[async_trait]
pub trait ItemServicePort: Send + Sync + 'static {
    /// List every item.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_items(&self) -> Result<Vec<Item>, ItemError>;

    /// Retrieve item by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Item does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_item(&self, id: ItemId) -> Result<Item, ItemError>;

    /// Create a new item.
    ///
    /// # Errors
    /// * `NameAlreadyExists` - Another item has this name
    /// * `UnknownStore` - Referenced store does not exist
    /// * `DatabaseError` - Database operation failed
    async fn create_item(&self, fields: ItemFields) -> Result<Item, ItemError>;

    /// Overwrite the item with `id`, or create a new one when it does not exist.
    ///
    /// A created item gets a newly assigned id, not `id`.
    ///
    /// # Errors
    /// * `NameAlreadyExists` - Another item has this name
    /// * `UnknownStore` - Referenced store does not exist
    /// * `DatabaseError` - Database operation failed
    async fn upsert_item(&self, id: ItemId, fields: ItemFields) -> Result<Upserted, ItemError>;

    /// Delete an item. Only admins may delete.
    ///
    /// # Arguments
    /// * `id` - Item to delete
    /// * `requested_by_admin` - Admin claim of the caller's token
    ///
    /// # Errors
    /// * `AdminRequired` - Caller is not an admin
    /// * `NotFound` - Item does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_item(&self, id: ItemId, requested_by_admin: bool) -> Result<(), ItemError>;
}

/// Persistence operations for items. Every write runs in its own transaction.
#[async_trait]
pub trait ItemRepository: Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<Item>, ItemError>;

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemError>;

    /// # Errors
    /// * `NameAlreadyExists` - Unique name violated
    /// * `UnknownStore` - Foreign key to stores violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, fields: ItemFields) -> Result<Item, ItemError>;

    /// Lookup and write happen in one transaction.
    ///
    /// # Errors
    /// * `NameAlreadyExists` - Unique name violated
    /// * `UnknownStore` - Foreign key to stores violated
    /// * `DatabaseError` - Database operation failed
    async fn upsert(&self, id: ItemId, fields: ItemFields) -> Result<Upserted, ItemError>;

    /// # Errors
    /// * `NotFound` - Item does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: ItemId) -> Result<(), ItemError>;
}
