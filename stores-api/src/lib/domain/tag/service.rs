use std::sync::Arc;

use async_trait::async_trait;

use super::errors::TagError;
use super::models::ItemTagLink;
use super::models::Tag;
use super::models::TagDetails;
use super::models::TagId;
use super::models::TagName;
use super::ports::TagRepository;
use super::ports::TagServicePort;
use crate::domain::item::models::ItemId;
use crate::domain::store::models::StoreId;

/// Concrete implementation of TagServicePort.
pub struct TagService<TR>
where
    TR: TagRepository,
{
    tag_repository: Arc<TR>,
}

impl<TR> TagService<TR>
where
    TR: TagRepository,
{
    pub fn new(tag_repository: Arc<TR>) -> Self {
        Self { tag_repository }
    }
}

#[async_trait]
impl<TR> TagServicePort for TagService<TR>
where
    TR: TagRepository,
{
    async fn list_store_tags(&self, store_id: StoreId) -> Result<Vec<Tag>, TagError> {
        self.tag_repository.list_by_store(store_id).await
    }

    async fn create_tag(&self, store_id: StoreId, name: TagName) -> Result<Tag, TagError> {
        let tag = self.tag_repository.create(store_id, name).await?;
        tracing::info!(tag_id = %tag.id, store_id = %store_id, name = %tag.name, "Tag created");
        Ok(tag)
    }

    async fn get_tag(&self, id: TagId) -> Result<TagDetails, TagError> {
        self.tag_repository
            .find_details(id)
            .await?
            .ok_or(TagError::NotFound(id))
    }

    async fn delete_tag(&self, id: TagId) -> Result<(), TagError> {
        self.tag_repository.delete(id).await?;
        tracing::info!(tag_id = %id, "Tag deleted");
        Ok(())
    }

    async fn link_item(&self, item_id: ItemId, tag_id: TagId) -> Result<ItemTagLink, TagError> {
        let link = self.tag_repository.link(item_id, tag_id).await?;
        tracing::debug!(item_id = %item_id, tag_id = %tag_id, "Item tagged");
        Ok(link)
    }

    async fn unlink_item(&self, item_id: ItemId, tag_id: TagId) -> Result<ItemTagLink, TagError> {
        let link = self.tag_repository.unlink(item_id, tag_id).await?;
        tracing::debug!(item_id = %item_id, tag_id = %tag_id, "Item untagged");
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;

    use super::*;

    mock! {
        pub TestTagRepository {}

        #[async_trait]
        impl TagRepository for TestTagRepository {
            async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<Tag>, TagError>;
            async fn create(&self, store_id: StoreId, name: TagName) -> Result<Tag, TagError>;
            async fn find_details(&self, id: TagId) -> Result<Option<TagDetails>, TagError>;
            async fn delete(&self, id: TagId) -> Result<(), TagError>;
            async fn link(&self, item_id: ItemId, tag_id: TagId) -> Result<ItemTagLink, TagError>;
            async fn unlink(&self, item_id: ItemId, tag_id: TagId) -> Result<ItemTagLink, TagError>;
        }
    }

    #[tokio::test]
    async fn test_get_tag_not_found() {
        let mut repository = MockTestTagRepository::new();
        repository
            .expect_find_details()
            .times(1)
            .returning(|_| Ok(None));

        let service = TagService::new(Arc::new(repository));

        let result = service.get_tag(TagId(2)).await;
        assert!(matches!(result.unwrap_err(), TagError::NotFound(TagId(2))));
    }

    #[tokio::test]
    async fn test_create_tag_in_store() {
        let mut repository = MockTestTagRepository::new();
        repository
            .expect_create()
            .withf(|store_id, name| *store_id == StoreId(1) && name.as_str() == "sale")
            .times(1)
            .returning(|store_id, name| {
                Ok(Tag {
                    id: TagId(1),
                    name,
                    store_id,
                })
            });

        let service = TagService::new(Arc::new(repository));

        let tag = service
            .create_tag(StoreId(1), TagName::new("sale".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(tag.store_id, StoreId(1));
    }

    #[tokio::test]
    async fn test_delete_linked_tag_refused() {
        let mut repository = MockTestTagRepository::new();
        repository
            .expect_delete()
            .times(1)
            .returning(|id| Err(TagError::StillLinked(id)));

        let service = TagService::new(Arc::new(repository));

        let result = service.delete_tag(TagId(5)).await;
        assert!(matches!(result.unwrap_err(), TagError::StillLinked(TagId(5))));
    }
}
