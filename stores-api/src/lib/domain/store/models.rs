use std::fmt;

use crate::domain::item::models::Item;
use crate::domain::store::errors::StoreNameError;
use crate::domain::tag::models::Tag;

/// Store entity. Owns its items and tags; deleting a store deletes both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    pub id: StoreId,
    pub name: StoreName,
}

/// Store together with everything it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreDetails {
    pub store: Store,
    pub items: Vec<Item>,
    pub tags: Vec<Tag>,
}

/// Store unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(pub i64);

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Store name value type, trimmed and 1-80 characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreName(String);

impl StoreName {
    const MAX_LENGTH: usize = 80;

    pub fn new(name: String) -> Result<Self, StoreNameError> {
        let trimmed = name.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(StoreNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(StoreNameError::TooLong {
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

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
