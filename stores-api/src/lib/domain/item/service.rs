use std::sync::Arc;

use async_trait::async_trait;

use super::errors::ItemError;
use super::models::Item;
use super::models::ItemFields;
use super::models::ItemId;
use super::models::Upserted;
use super::ports::ItemRepository;
use super::ports::ItemServicePort;

/// Concrete implementation of ItemServicePort.
///
/// Generic over repository for testability.
pub struct ItemService<IR>
where
    IR: ItemRepository,
{
    item_repository: Arc<IR>,
}

impl<IR> ItemService<IR>
where
    IR: ItemRepository,
{
    pub fn new(item_repository: Arc<IR>) -> Self {
        Self { item_repository }
    }
}

#[async_trait]
impl<IR> ItemServicePort for ItemService<IR>
where
    IR: ItemRepository,
{
    async fn list_items(&self) -> Result<Vec<Item>, ItemError> {
        self.item_repository.list_all().await
    }

    async fn get_item(&self, id: ItemId) -> Result<Item, ItemError> {
        self.item_repository
            .find_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    async fn create_item(&self, fields: ItemFields) -> Result<Item, ItemError> {
        let item = self.item_repository.create(fields).await?;
        tracing::info!(item_id = %item.id, name = %item.name, "Item created");
        Ok(item)
    }

    async fn upsert_item(&self, id: ItemId, fields: ItemFields) -> Result<Upserted, ItemError> {
        let upserted = self.item_repository.upsert(id, fields).await?;
        match &upserted {
            Upserted::Created(item) => {
                tracing::info!(requested_id = %id, item_id = %item.id, "Item created by upsert")
            }
            Upserted::Updated(item) => tracing::info!(item_id = %item.id, "Item replaced"),
        }
        Ok(upserted)
    }

    async fn delete_item(&self, id: ItemId, requested_by_admin: bool) -> Result<(), ItemError> {
        if !requested_by_admin {
            tracing::warn!(item_id = %id, "Item deletion refused without admin claim");
            return Err(ItemError::AdminRequired);
        }

        self.item_repository.delete(id).await?;
        tracing::info!(item_id = %id, "Item deleted");
        Ok(())
    }
}
