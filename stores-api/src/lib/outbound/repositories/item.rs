use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::SqlitePool;

use super::violation;
use super::Violation;
use crate::domain::item::errors::ItemError;
use crate::domain::item::models::Item;
use crate::domain::item::models::ItemFields;
use crate::domain::item::models::ItemId;
use crate::domain::item::models::ItemName;
use crate::domain::item::models::Price;
use crate::domain::item::models::Upserted;
use crate::domain::item::ports::ItemRepository;
use crate::domain::store::models::StoreId;

/// Item row as stored; shared with the store and tag repositories.
#[derive(Debug, FromRow)]
pub(crate) struct ItemRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub store_id: i64,
}

impl TryFrom<ItemRow> for Item {
    type Error = ItemError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Item {
            id: ItemId(row.id),
            name: ItemName::new(row.name)?,
            price: Price::new(row.price)?,
            store_id: StoreId(row.store_id),
        })
    }
}

pub struct SqliteItemRepository {
    pool: SqlitePool,
}

impl SqliteItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> ItemError {
    tracing::error!(error = %e, "Item query failed");
    ItemError::DatabaseError(e.to_string())
}

/// Translate a failed item write into the domain error it stands for.
fn write_error(e: sqlx::Error, fields: &ItemFields) -> ItemError {
    match violation(&e) {
        Some(Violation::Unique(_)) => ItemError::NameAlreadyExists(fields.name.to_string()),
        Some(Violation::ForeignKey) => ItemError::UnknownStore(fields.store_id),
        None => database_error(e),
    }
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn list_all(&self) -> Result<Vec<Item>, ItemError> {
        sqlx::query_as::<_, ItemRow>("SELECT id, name, price, store_id FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?
            .into_iter()
            .map(Item::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemError> {
        sqlx::query_as::<_, ItemRow>("SELECT id, name, price, store_id FROM items WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .map(Item::try_from)
            .transpose()
    }

    async fn create(&self, fields: ItemFields) -> Result<Item, ItemError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let result = sqlx::query("INSERT INTO items (name, price, store_id) VALUES (?, ?, ?)")
            .bind(fields.name.as_str())
            .bind(fields.price.value())
            .bind(fields.store_id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(e, &fields))?;

        tx.commit().await.map_err(database_error)?;

        Ok(Item {
            id: ItemId(result.last_insert_rowid()),
            name: fields.name,
            price: fields.price,
            store_id: fields.store_id,
        })
    }

    async fn upsert(&self, id: ItemId, fields: ItemFields) -> Result<Upserted, ItemError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        // The first statement must write, so the transaction takes the
        // write lock up front instead of upgrading from a read snapshot.
        let updated =
            sqlx::query("UPDATE items SET name = ?, price = ?, store_id = ? WHERE id = ?")
                .bind(fields.name.as_str())
                .bind(fields.price.value())
                .bind(fields.store_id.0)
                .bind(id.0)
                .execute(&mut *tx)
                .await
                .map_err(|e| write_error(e, &fields))?;

        let upserted = if updated.rows_affected() > 0 {
            Upserted::Updated(Item {
                id,
                name: fields.name,
                price: fields.price,
                store_id: fields.store_id,
            })
        } else {
            let result = sqlx::query("INSERT INTO items (name, price, store_id) VALUES (?, ?, ?)")
                .bind(fields.name.as_str())
                .bind(fields.price.value())
                .bind(fields.store_id.0)
                .execute(&mut *tx)
                .await
                .map_err(|e| write_error(e, &fields))?;

            Upserted::Created(Item {
                id: ItemId(result.last_insert_rowid()),
                name: fields.name,
                price: fields.price,
                store_id: fields.store_id,
            })
        };

        tx.commit().await.map_err(database_error)?;
        Ok(upserted)
    }

    async fn delete(&self, id: ItemId) -> Result<(), ItemError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(ItemError::NotFound(id));
        }

        tx.commit().await.map_err(database_error)?;
        Ok(())
    }
}
