use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::items::ItemData;
use super::parse_id;
use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::item::models::ItemId;
use crate::domain::store::models::StoreId;
use crate::domain::tag::errors::TagError;
use crate::domain::tag::models::ItemTagLink;
use crate::domain::tag::models::Tag;
use crate::domain::tag::models::TagDetails;
use crate::domain::tag::models::TagId;
use crate::domain::tag::models::TagName;
use crate::domain::tag::ports::TagServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_store_tags(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<ApiSuccess<Vec<TagData>>, ApiError> {
    let store_id = StoreId(parse_id(&store_id)?);

    state
        .tag_service
        .list_store_tags(store_id)
        .await
        .map_err(ApiError::from)
        .map(|tags| ApiSuccess::new(StatusCode::OK, tags.iter().map(TagData::from).collect()))
}

pub async fn create_tag(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    body: Result<Json<TagRequest>, JsonRejection>,
) -> Result<ApiSuccess<TagData>, ApiError> {
    let Json(body) = body?;
    let store_id = StoreId(parse_id(&store_id)?);
    let name = TagName::new(body.name).map_err(TagError::from)?;

    state
        .tag_service
        .create_tag(store_id, name)
        .await
        .map_err(ApiError::from)
        .map(|ref tag| ApiSuccess::new(StatusCode::CREATED, tag.into()))
}

pub async fn get_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<String>,
) -> Result<ApiSuccess<TagDetailsData>, ApiError> {
    let tag_id = TagId(parse_id(&tag_id)?);

    state
        .tag_service
        .get_tag(tag_id)
        .await
        .map_err(ApiError::from)
        .map(|ref details| ApiSuccess::new(StatusCode::OK, details.into()))
}

/// Delete a tag that no item carries any more.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let tag_id = TagId(parse_id(&tag_id)?);

    state
        .tag_service
        .delete_tag(tag_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::ACCEPTED, MessageData::new("Tag deleted.")))
}

pub async fn link_item_tag(
    State(state): State<AppState>,
    Path((item_id, tag_id)): Path<(String, String)>,
) -> Result<ApiSuccess<ItemTagData>, ApiError> {
    let item_id = ItemId(parse_id(&item_id)?);
    let tag_id = TagId(parse_id(&tag_id)?);

    state
        .tag_service
        .link_item(item_id, tag_id)
        .await
        .map_err(ApiError::from)
        .map(|ref link| {
            ApiSuccess::new(
                StatusCode::CREATED,
                ItemTagData::new("Item tagged.", link),
            )
        })
}

pub async fn unlink_item_tag(
    State(state): State<AppState>,
    Path((item_id, tag_id)): Path<(String, String)>,
) -> Result<ApiSuccess<ItemTagData>, ApiError> {
    let item_id = ItemId(parse_id(&item_id)?);
    let tag_id = TagId(parse_id(&tag_id)?);

    state
        .tag_service
        .unlink_item(item_id, tag_id)
        .await
        .map_err(ApiError::from)
        .map(|ref link| {
            ApiSuccess::new(
                StatusCode::OK,
                ItemTagData::new("Item removed from tag.", link),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagRequest {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagData {
    pub id: i64,
    pub name: String,
    pub store_id: i64,
}

impl From<&Tag> for TagData {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.0,
            name: tag.name.as_str().to_string(),
            store_id: tag.store_id.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagDetailsData {
    pub id: i64,
    pub name: String,
    pub store_id: i64,
    pub items: Vec<ItemData>,
}

impl From<&TagDetails> for TagDetailsData {
    fn from(details: &TagDetails) -> Self {
        Self {
            id: details.tag.id.0,
            name: details.tag.name.as_str().to_string(),
            store_id: details.tag.store_id.0,
            items: details.items.iter().map(ItemData::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTagData {
    pub message: String,
    pub item: ItemData,
    pub tag: TagData,
}

impl ItemTagData {
    fn new(message: &str, link: &ItemTagLink) -> Self {
        Self {
            message: message.to_string(),
            item: (&link.item).into(),
            tag: (&link.tag).into(),
        }
    }
}
