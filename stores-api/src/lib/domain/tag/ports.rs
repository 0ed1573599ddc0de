use async_trait::async_trait;

use crate::domain::item::models::ItemId;
use crate::domain::store::models::StoreId;
use crate::domain::tag::errors::TagError;
use crate::domain::tag::models::ItemTagLink;
use crate::domain::tag::models::Tag;
use crate::domain::tag::models::TagDetails;
use crate::domain::tag::models::TagId;
use crate::domain::tag::models::TagName;

/// Port for tag domain service operations.
#[async_trait]
pub trait TagServicePort: Send + Sync + 'static {
    /// # Errors
    /// * `StoreNotFound` - Store does not exist
    async fn list_store_tags(&self, store_id: StoreId) -> Result<Vec<Tag>, TagError>;

    /// # Errors
    /// * `StoreNotFound` - Store does not exist
    /// * `NameAlreadyExists` - Store already has a tag with this name
    async fn create_tag(&self, store_id: StoreId, name: TagName) -> Result<Tag, TagError>;

    /// # Errors
    /// * `NotFound` - Tag does not exist
    async fn get_tag(&self, id: TagId) -> Result<TagDetails, TagError>;

    /// Delete a tag that no item carries.
    ///
    /// # Errors
    /// * `NotFound` - Tag does not exist
    /// * `StillLinked` - At least one item carries the tag
    async fn delete_tag(&self, id: TagId) -> Result<(), TagError>;

    /// Tag an item. Linking twice is not an error.
    ///
    /// # Errors
    /// * `ItemNotFound` / `NotFound` - Either side does not exist
    /// * `StoreMismatch` - Item and tag belong to different stores
    async fn link_item(&self, item_id: ItemId, tag_id: TagId) -> Result<ItemTagLink, TagError>;

    /// # Errors
    /// * `ItemNotFound` / `NotFound` - Either side does not exist
    /// * `NotLinked` - Item does not carry the tag
    async fn unlink_item(&self, item_id: ItemId, tag_id: TagId) -> Result<ItemTagLink, TagError>;
}

/// Persistence operations for tags and item/tag links.
#[async_trait]
pub trait TagRepository: Send + Sync + 'static {
    async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<Tag>, TagError>;

    async fn create(&self, store_id: StoreId, name: TagName) -> Result<Tag, TagError>;

    async fn find_details(&self, id: TagId) -> Result<Option<TagDetails>, TagError>;

    async fn delete(&self, id: TagId) -> Result<(), TagError>;

    async fn link(&self, item_id: ItemId, tag_id: TagId) -> Result<ItemTagLink, TagError>;

    async fn unlink(&self, item_id: ItemId, tag_id: TagId) -> Result<ItemTagLink, TagError>;
}
