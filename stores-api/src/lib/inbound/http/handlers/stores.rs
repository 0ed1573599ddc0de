use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::items::ItemData;
use super::parse_id;
use super::tags::TagData;
use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::store::errors::StoreNameError;
use crate::domain::store::models::Store;
use crate::domain::store::models::StoreDetails;
use crate::domain::store::models::StoreId;
use crate::domain::store::models::StoreName;
use crate::domain::store::ports::StoreServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_stores(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<StoreData>>, ApiError> {
    state
        .store_service
        .list_stores()
        .await
        .map_err(ApiError::from)
        .map(|stores| ApiSuccess::new(StatusCode::OK, stores.iter().map(StoreData::from).collect()))
}

pub async fn create_store(
    State(state): State<AppState>,
    body: Result<Json<StoreRequest>, JsonRejection>,
) -> Result<ApiSuccess<StoreData>, ApiError> {
    let Json(body) = body?;
    state
        .store_service
        .create_store(body.try_into_name()?)
        .await
        .map_err(ApiError::from)
        .map(|ref store| ApiSuccess::new(StatusCode::CREATED, store.into()))
}

pub async fn get_store(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<ApiSuccess<StoreDetailsData>, ApiError> {
    let store_id = StoreId(parse_id(&store_id)?);

    state
        .store_service
        .get_store(store_id)
        .await
        .map_err(ApiError::from)
        .map(|ref details| ApiSuccess::new(StatusCode::OK, details.into()))
}

/// Delete a store together with its items, tags and their links.
pub async fn delete_store(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let store_id = StoreId(parse_id(&store_id)?);

    state
        .store_service
        .delete_store(store_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Store deleted.")))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreRequest {
    name: String,
}

impl StoreRequest {
    fn try_into_name(self) -> Result<StoreName, StoreNameError> {
        StoreName::new(self.name)
    }
}

impl From<StoreNameError> for ApiError {
    fn from(err: StoreNameError) -> Self {
        ApiError::UnprocessableEntity(format!("Invalid store name: {}", err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreData {
    pub id: i64,
    pub name: String,
}

impl From<&Store> for StoreData {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id.0,
            name: store.name.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreDetailsData {
    pub id: i64,
    pub name: String,
    pub items: Vec<ItemData>,
    pub tags: Vec<TagData>,
}

impl From<&StoreDetails> for StoreDetailsData {
    fn from(details: &StoreDetails) -> Self {
        Self {
            id: details.store.id.0,
            name: details.store.name.as_str().to_string(),
            items: details.items.iter().map(ItemData::from).collect(),
            tags: details.tags.iter().map(TagData::from).collect(),
        }
    }
}
