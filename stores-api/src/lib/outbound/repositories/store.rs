use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::SqlitePool;

use super::item::ItemRow;
use super::tag::TagRow;
use super::violation;
use super::Violation;
use crate::domain::item::models::Item;
use crate::domain::store::errors::StoreError;
use crate::domain::store::models::Store;
use crate::domain::store::models::StoreDetails;
use crate::domain::store::models::StoreId;
use crate::domain::store::models::StoreName;
use crate::domain::store::ports::StoreRepository;
use crate::domain::tag::models::Tag;

#[derive(Debug, FromRow)]
struct StoreRow {
    id: i64,
    name: String,
}

impl TryFrom<StoreRow> for Store {
    type Error = StoreError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        Ok(Store {
            id: StoreId(row.id),
            name: StoreName::new(row.name)?,
        })
    }
}

pub struct SqliteStoreRepository {
    pool: SqlitePool,
}

impl SqliteStoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> StoreError {
    tracing::error!(error = %e, "Store query failed");
    StoreError::DatabaseError(e.to_string())
}

fn corrupt_row(e: impl std::fmt::Display) -> StoreError {
    StoreError::DatabaseError(format!("Corrupt row: {}", e))
}

#[async_trait]
impl StoreRepository for SqliteStoreRepository {
    async fn list_all(&self) -> Result<Vec<Store>, StoreError> {
        sqlx::query_as::<_, StoreRow>("SELECT id, name FROM stores ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?
            .into_iter()
            .map(Store::try_from)
            .collect()
    }

    async fn find_details(&self, id: StoreId) -> Result<Option<StoreDetails>, StoreError> {
        // One transaction so the store and its contents come from the same snapshot.
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let Some(row) = sqlx::query_as::<_, StoreRow>("SELECT id, name FROM stores WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error)?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, price, store_id FROM items WHERE store_id = ? ORDER BY id",
        )
        .bind(id.0)
        .fetch_all(&mut *tx)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(|row| Item::try_from(row).map_err(corrupt_row))
        .collect::<Result<Vec<_>, _>>()?;

        let tags = sqlx::query_as::<_, TagRow>(
            "SELECT id, name, store_id FROM tags WHERE store_id = ? ORDER BY id",
        )
        .bind(id.0)
        .fetch_all(&mut *tx)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(|row| Tag::try_from(row).map_err(corrupt_row))
        .collect::<Result<Vec<_>, _>>()?;

        tx.commit().await.map_err(database_error)?;

        Ok(Some(StoreDetails {
            store: Store::try_from(row)?,
            items,
            tags,
        }))
    }

    async fn create(&self, name: StoreName) -> Result<Store, StoreError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let result = sqlx::query("INSERT INTO stores (name) VALUES (?)")
            .bind(name.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::Unique(_)) => StoreError::NameAlreadyExists(name.to_string()),
                _ => database_error(e),
            })?;

        tx.commit().await.map_err(database_error)?;

        Ok(Store {
            id: StoreId(result.last_insert_rowid()),
            name,
        })
    }

    async fn delete(&self, id: StoreId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        // Items, tags and their links go with the store through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM stores WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        tx.commit().await.map_err(database_error)?;
        Ok(())
    }
}
