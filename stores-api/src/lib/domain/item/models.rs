use std::fmt;

use crate::domain::item::errors::ItemNameError;
use crate::domain::item::errors::PriceError;
use crate::domain::store::models::StoreId;

/// Item entity. Names are unique across all stores.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: ItemName,
    pub price: Price,
    pub store_id: StoreId,
}

/// Item unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Item name value type, trimmed and 1-80 characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemName(String);

impl ItemName {
    const MAX_LENGTH: usize = 80;

    /// # Errors
    /// * `Empty` - Name is blank after trimming
    /// * `TooLong` - Name longer than 80 characters
    pub fn new(name: String) -> Result<Self, ItemNameError> {
        let trimmed = name.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            return Err(ItemNameError::Empty);
        }
        if length > Self::MAX_LENGTH {
            return Err(ItemNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-negative finite price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// # Errors
    /// * `NotFinite` - NaN or infinite
    /// * `Negative` - Below zero
    pub fn new(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            Err(PriceError::NotFinite)
        } else if value < 0.0 {
            Err(PriceError::Negative)
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Writable fields of an item, shared by create and upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
    pub name: ItemName,
    pub price: Price,
    pub store_id: StoreId,
}

/// Outcome of an upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted {
    Created(Item),
    Updated(Item),
}

impl Upserted {
    pub fn item(&self) -> &Item {
        match self {
            Upserted::Created(item) | Upserted::Updated(item) => item,
        }
    }
}
