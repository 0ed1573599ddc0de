use std::fmt;

use crate::domain::item::models::Item;
use crate::domain::store::models::StoreId;
use crate::domain::tag::errors::TagNameError;

/// Tag entity. Tag names are unique within a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
    pub store_id: StoreId,
}

/// Tag together with the items carrying it.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDetails {
    pub tag: Tag,
    pub items: Vec<Item>,
}

/// An item/tag pair, returned when a link is added or removed.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTagLink {
    pub item: Item,
    pub tag: Tag,
}

/// Tag unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub i64);

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Tag name value type, trimmed and 1-80 characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName(String);

impl TagName {
    const MAX_LENGTH: usize = 80;

    pub fn new(name: String) -> Result<Self, TagNameError> {
        let trimmed = name.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(TagNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TagNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
