use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::Sqlite;
use sqlx::SqlitePool;
use sqlx::Transaction;

use super::item::ItemRow;
use super::violation;
use super::Violation;
use crate::domain::item::models::Item;
use crate::domain::item::models::ItemId;
use crate::domain::store::models::StoreId;
use crate::domain::tag::errors::TagError;
use crate::domain::tag::models::ItemTagLink;
use crate::domain::tag::models::Tag;
use crate::domain::tag::models::TagDetails;
use crate::domain::tag::models::TagId;
use crate::domain::tag::models::TagName;
use crate::domain::tag::ports::TagRepository;

/// Tag row as stored; shared with the store repository.
#[derive(Debug, FromRow)]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
    pub store_id: i64,
}

impl TryFrom<TagRow> for Tag {
    type Error = TagError;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        Ok(Tag {
            id: TagId(row.id),
            name: TagName::new(row.name)?,
            store_id: StoreId(row.store_id),
        })
    }
}

pub struct SqliteTagRepository {
    pool: SqlitePool,
}

impl SqliteTagRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> TagError {
    tracing::error!(error = %e, "Tag query failed");
    TagError::DatabaseError(e.to_string())
}

fn corrupt_row(e: impl std::fmt::Display) -> TagError {
    TagError::DatabaseError(format!("Corrupt row: {}", e))
}

async fn fetch_tag(tx: &mut Transaction<'_, Sqlite>, id: TagId) -> Result<Option<Tag>, TagError> {
    sqlx::query_as::<_, TagRow>("SELECT id, name, store_id FROM tags WHERE id = ?")
        .bind(id.0)
        .fetch_optional(&mut **tx)
        .await
        .map_err(database_error)?
        .map(Tag::try_from)
        .transpose()
}

async fn fetch_item(
    tx: &mut Transaction<'_, Sqlite>,
    id: ItemId,
) -> Result<Option<Item>, TagError> {
    sqlx::query_as::<_, ItemRow>("SELECT id, name, price, store_id FROM items WHERE id = ?")
        .bind(id.0)
        .fetch_optional(&mut **tx)
        .await
        .map_err(database_error)?
        .map(|row| Item::try_from(row).map_err(corrupt_row))
        .transpose()
}

/// Load both ends of a link, failing on whichever is missing.
async fn fetch_pair(
    tx: &mut Transaction<'_, Sqlite>,
    item_id: ItemId,
    tag_id: TagId,
) -> Result<ItemTagLink, TagError> {
    let item = fetch_item(tx, item_id)
        .await?
        .ok_or(TagError::ItemNotFound(item_id))?;
    let tag = fetch_tag(tx, tag_id).await?.ok_or(TagError::NotFound(tag_id))?;

    Ok(ItemTagLink { item, tag })
}

#[async_trait]
impl TagRepository for SqliteTagRepository {
    async fn list_by_store(&self, store_id: StoreId) -> Result<Vec<Tag>, TagError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let store: Option<i64> = sqlx::query_scalar("SELECT id FROM stores WHERE id = ?")
            .bind(store_id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error)?;

        if store.is_none() {
            return Err(TagError::StoreNotFound(store_id));
        }

        let tags = sqlx::query_as::<_, TagRow>(
            "SELECT id, name, store_id FROM tags WHERE store_id = ? ORDER BY id",
        )
        .bind(store_id.0)
        .fetch_all(&mut *tx)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(Tag::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        tx.commit().await.map_err(database_error)?;
        Ok(tags)
    }

    async fn create(&self, store_id: StoreId, name: TagName) -> Result<Tag, TagError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let result = sqlx::query("INSERT INTO tags (name, store_id) VALUES (?, ?)")
            .bind(name.as_str())
            .bind(store_id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::Unique(_)) => TagError::NameAlreadyExists {
                    store_id,
                    name: name.to_string(),
                },
                Some(Violation::ForeignKey) => TagError::StoreNotFound(store_id),
                None => database_error(e),
            })?;

        tx.commit().await.map_err(database_error)?;

        Ok(Tag {
            id: TagId(result.last_insert_rowid()),
            name,
            store_id,
        })
    }

    async fn find_details(&self, id: TagId) -> Result<Option<TagDetails>, TagError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let Some(tag) = fetch_tag(&mut tx, id).await? else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT items.id, items.name, items.price, items.store_id
            FROM items
            JOIN items_tags ON items_tags.item_id = items.id
            WHERE items_tags.tag_id = ?
            ORDER BY items.id
            "#,
        )
        .bind(id.0)
        .fetch_all(&mut *tx)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(|row| Item::try_from(row).map_err(corrupt_row))
        .collect::<Result<Vec<_>, _>>()?;

        tx.commit().await.map_err(database_error)?;
        Ok(Some(TagDetails { tag, items }))
    }

    async fn delete(&self, id: TagId) -> Result<(), TagError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let result = sqlx::query(
            "DELETE FROM tags WHERE id = ? AND NOT EXISTS (SELECT 1 FROM items_tags WHERE tag_id = ?)",
        )
        .bind(id.0)
        .bind(id.0)
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return match fetch_tag(&mut tx, id).await? {
                Some(_) => Err(TagError::StillLinked(id)),
                None => Err(TagError::NotFound(id)),
            };
        }

        tx.commit().await.map_err(database_error)?;
        Ok(())
    }

    async fn link(&self, item_id: ItemId, tag_id: TagId) -> Result<ItemTagLink, TagError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        // Inserts nothing unless both rows exist in the same store.
        // Linking twice is a no-op.
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO items_tags (item_id, tag_id)
            SELECT items.id, tags.id
            FROM items
            JOIN tags ON tags.store_id = items.store_id
            WHERE items.id = ? AND tags.id = ?
            "#,
        )
        .bind(item_id.0)
        .bind(tag_id.0)
        .execute(&mut *tx)
        .await
        .map_err(database_error)?;

        let link = fetch_pair(&mut tx, item_id, tag_id).await?;
        if link.item.store_id != link.tag.store_id {
            return Err(TagError::StoreMismatch { item_id, tag_id });
        }

        tx.commit().await.map_err(database_error)?;
        Ok(link)
    }

    async fn unlink(&self, item_id: ItemId, tag_id: TagId) -> Result<ItemTagLink, TagError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let result = sqlx::query("DELETE FROM items_tags WHERE item_id = ? AND tag_id = ?")
            .bind(item_id.0)
            .bind(tag_id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        let link = fetch_pair(&mut tx, item_id, tag_id).await?;
        if result.rows_affected() == 0 {
            return Err(TagError::NotLinked { item_id, tag_id });
        }

        tx.commit().await.map_err(database_error)?;
        Ok(link)
    }
}
