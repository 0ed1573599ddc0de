use std::sync::Arc;

use async_trait::async_trait;

use super::errors::StoreError;
use super::models::Store;
use super::models::StoreDetails;
use super::models::StoreId;
use super::models::StoreName;
use super::ports::StoreRepository;
use super::ports::StoreServicePort;

/// Concrete implementation of StoreServicePort.
pub struct StoreService<SR>
where
    SR: StoreRepository,
{
    store_repository: Arc<SR>,
}

impl<SR> StoreService<SR>
where
    SR: StoreRepository,
{
    pub fn new(store_repository: Arc<SR>) -> Self {
        Self { store_repository }
    }
}

#[async_trait]
impl<SR> StoreServicePort for StoreService<SR>
where
    SR: StoreRepository,
{
    async fn list_stores(&self) -> Result<Vec<Store>, StoreError> {
        self.store_repository.list_all().await
    }

    async fn get_store(&self, id: StoreId) -> Result<StoreDetails, StoreError> {
        self.store_repository
            .find_details(id)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn create_store(&self, name: StoreName) -> Result<Store, StoreError> {
        let store = self.store_repository.create(name).await?;
        tracing::info!(store_id = %store.id, name = %store.name, "Store created");
        Ok(store)
    }

    async fn delete_store(&self, id: StoreId) -> Result<(), StoreError> {
        self.store_repository.delete(id).await?;
        tracing::info!(store_id = %id, "Store deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;

    use super::*;

    mock! {
        pub TestStoreRepository {}

        #[async_trait]
        impl StoreRepository for TestStoreRepository {
            async fn list_all(&self) -> Result<Vec<Store>, StoreError>;
            async fn find_details(&self, id: StoreId) -> Result<Option<StoreDetails>, StoreError>;
            async fn create(&self, name: StoreName) -> Result<Store, StoreError>;
            async fn delete(&self, id: StoreId) -> Result<(), StoreError>;
        }
    }

    #[tokio::test]
    async fn test_get_store_with_contents() {
        let mut repository = MockTestStoreRepository::new();
        repository
            .expect_find_details()
            .withf(|id| *id == StoreId(1))
            .times(1)
            .returning(|id| {
                Ok(Some(StoreDetails {
                    store: Store {
                        id,
                        name: StoreName::new("Corner Shop".to_string()).unwrap(),
                    },
                    items: vec![],
                    tags: vec![],
                }))
            });

        let service = StoreService::new(Arc::new(repository));

        let details = service.get_store(StoreId(1)).await.unwrap();
        assert_eq!(details.store.name.as_str(), "Corner Shop");
    }

    #[tokio::test]
    async fn test_get_store_not_found() {
        let mut repository = MockTestStoreRepository::new();
        repository
            .expect_find_details()
            .times(1)
            .returning(|_| Ok(None));

        let service = StoreService::new(Arc::new(repository));

        let result = service.get_store(StoreId(3)).await;
        assert!(matches!(result.unwrap_err(), StoreError::NotFound(StoreId(3))));
    }

    #[tokio::test]
    async fn test_create_store_duplicate_name() {
        let mut repository = MockTestStoreRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|name| Err(StoreError::NameAlreadyExists(name.to_string())));

        let service = StoreService::new(Arc::new(repository));

        let name = StoreName::new("Corner Shop".to_string()).unwrap();
        let result = service.create_store(name).await;
        assert!(matches!(
            result.unwrap_err(),
            StoreError::NameAlreadyExists(_)
        ));
    }
}
