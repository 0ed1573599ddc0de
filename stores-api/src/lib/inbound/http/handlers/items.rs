use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::parse_id;
use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::item::errors::ItemError;
use crate::domain::item::models::Item;
use crate::domain::item::models::ItemFields;
use crate::domain::item::models::ItemId;
use crate::domain::item::models::ItemName;
use crate::domain::item::models::Price;
use crate::domain::item::models::Upserted;
use crate::domain::item::ports::ItemServicePort;
use crate::domain::store::models::StoreId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_items(State(state): State<AppState>) -> Result<ApiSuccess<Vec<ItemData>>, ApiError> {
    state
        .item_service
        .list_items()
        .await
        .map_err(ApiError::from)
        .map(|items| ApiSuccess::new(StatusCode::OK, items.iter().map(ItemData::from).collect()))
}

pub async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<ApiSuccess<ItemData>, ApiError> {
    let Json(body) = body?;
    state
        .item_service
        .create_item(body.try_into_fields()?)
        .await
        .map_err(ApiError::from)
        .map(|ref item| ApiSuccess::new(StatusCode::CREATED, item.into()))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<ApiSuccess<ItemData>, ApiError> {
    let item_id = ItemId(parse_id(&item_id)?);

    state
        .item_service
        .get_item(item_id)
        .await
        .map_err(ApiError::from)
        .map(|ref item| ApiSuccess::new(StatusCode::OK, item.into()))
}

/// Overwrite the item at `item_id`, or create a new one when it does not exist.
///
/// A created item gets a fresh id; the one in the path is not reused.
pub async fn put_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<ApiSuccess<ItemData>, ApiError> {
    let Json(body) = body?;
    let item_id = ItemId(parse_id(&item_id)?);

    let upserted = state
        .item_service
        .upsert_item(item_id, body.try_into_fields()?)
        .await?;

    if let Upserted::Created(item) = &upserted {
        tracing::debug!(requested_id = %item_id, item_id = %item.id, "PUT created a new item");
    }

    Ok(ApiSuccess::new(StatusCode::OK, upserted.item().into()))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(item_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let item_id = ItemId(parse_id(&item_id)?);

    state
        .item_service
        .delete_item(item_id, caller.is_admin)
        .await
        .map_err(|e| {
            if matches!(e, ItemError::AdminRequired) {
                tracing::warn!(user_id = %caller.user_id, item_id = %item_id, "Non-admin tried to delete item");
            }
            ApiError::from(e)
        })
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Item deleted.")))
}

/// HTTP request body for creating or replacing an item (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemRequest {
    name: String,
    price: f64,
    store_id: i64,
}

impl ItemRequest {
    fn try_into_fields(self) -> Result<ItemFields, ApiError> {
        let name = ItemName::new(self.name).map_err(ItemError::from)?;
        let price = Price::new(self.price).map_err(ItemError::from)?;
        if self.store_id <= 0 {
            return Err(ApiError::BadRequest(format!("Invalid store id: {}", self.store_id)));
        }
        let store_id = StoreId(self.store_id);

        Ok(ItemFields {
            name,
            price,
            store_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemData {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub store_id: i64,
}

impl From<&Item> for ItemData {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.0,
            name: item.name.as_str().to_string(),
            price: item.price.value(),
            store_id: item.store_id.0,
        }
    }
}
