//! Bookable resource fields - rooms, halls, equipment

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::bounded_text;
use super::ValidationError;

const MAX_RESOURCE_NAME_LEN: usize = 128;
const MAX_RESOURCE_KIND_LEN: usize = 64;
const MAX_IMAGE_URL_LEN: usize = 2048;

/// Capacity bounds
pub const MIN_CAPACITY: i64 = 1;
pub const MAX_CAPACITY: i64 = 10_000;

/// Validated resource name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceName(String);

impl ResourceName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "name", MAX_RESOURCE_NAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resource category, stored in the `type` column ("Room", "Hall", ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceKind(String);

impl ResourceKind {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "type", MAX_RESOURCE_KIND_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Number of people (or units) a resource accommodates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Capacity(i64);

impl Capacity {
    pub fn new(n: i64) -> Result<Self, ValidationError> {
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&n) {
            return Err(ValidationError::OutOfRange {
                field: "capacity",
                min: MIN_CAPACITY,
                max: MAX_CAPACITY,
            });
        }
        Ok(Self(n))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

/// Optional image URL; blank strings collapse to `None`.
pub fn image_url(s: Option<&str>) -> Result<Option<String>, ValidationError> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(url) if url.len() > MAX_IMAGE_URL_LEN => Err(ValidationError::TooLong {
            field: "image_url",
            max: MAX_IMAGE_URL_LEN,
        }),
        Some(url) => Ok(Some(url.to_owned())),
    }
}

/// Whether a resource accepts new bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    #[default]
    Available,
    Cancelled,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_bookable(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl FromStr for ResourceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ValidationError::InvalidVariant {
                field: "resource status",
                value: other.to_owned(),
            }),
        }
    }
}

/// Ordering for the joined resource/booking listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceSort {
    /// Booking date ascending, unbooked resources last
    Date,
    Name,
    /// Largest first
    Capacity,
}

impl FromStr for ResourceSort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "name" => Ok(Self::Name),
            "capacity" => Ok(Self::Capacity),
            other => Err(ValidationError::InvalidVariant {
                field: "sort key",
                value: other.to_owned(),
            }),
        }
    }
}
