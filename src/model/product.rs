//! Catalog products and their identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path of the image shown when a product has no picture of its own.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";

/// Product identifier as delivered by the catalog backend.
///
/// The backend is not consistent about id types: most parts carry numeric
/// ids, some carry supplier codes. Both forms are kept as-is so that the id
/// sent back in a price request is exactly the one received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl ProductId {
    /// Parse an id typed by a user: digits become a numeric id.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Number)
    }

    /// Lowercased string form, used by the id substring filter.
    #[must_use]
    pub fn to_lowercase(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.to_lowercase(),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ProductId {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A repair part listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Relative path of the product thumbnail.
    ///
    /// Surfaces fall back to [`PLACEHOLDER_IMAGE`] when this path fails to load.
    #[must_use]
    pub fn image_path(&self) -> String {
        format!("/images/{}.jpg", self.id)
    }
}
