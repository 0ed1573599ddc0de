use async_trait::async_trait;

use crate::domain::store::errors::StoreError;
use crate::domain::store::models::Store;
use crate::domain::store::models::StoreDetails;
use crate::domain::store::models::StoreId;
use crate::domain::store::models::StoreName;

/// Port for store domain service operations.
#[async_trait]
pub trait StoreServicePort: Send + Sync + 'static {
    async fn list_stores(&self) -> Result<Vec<Store>, StoreError>;

    /// Retrieve a store with its items and tags.
    ///
    /// # Errors
    /// * `NotFound` - Store does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_store(&self, id: StoreId) -> Result<StoreDetails, StoreError>;

    /// # Errors
    /// * `NameAlreadyExists` - Another store has this name
    /// * `DatabaseError` - Database operation failed
    async fn create_store(&self, name: StoreName) -> Result<Store, StoreError>;

    /// Delete a store together with its items, tags and their links.
    ///
    /// # Errors
    /// * `NotFound` - Store does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_store(&self, id: StoreId) -> Result<(), StoreError>;
}

/// Persistence operations for stores.
#[async_trait]
pub trait StoreRepository: Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<Store>, StoreError>;

    async fn find_details(&self, id: StoreId) -> Result<Option<StoreDetails>, StoreError>;

    async fn create(&self, name: StoreName) -> Result<Store, StoreError>;

    async fn delete(&self, id: StoreId) -> Result<(), StoreError>;
}
