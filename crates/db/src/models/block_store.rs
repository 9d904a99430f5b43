//! Block store models and DTOs.
//!
//! The block store is a library of reusable single-block definitions. Entries
//! are copied into pages by the editor; the store only tracks how often each
//! one was used.

use empower_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use validator::Validate;

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "custom";

/// Icon used when none is given.
pub const DEFAULT_ICON: &str = "box";

/// Pseudo-category meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// A row from the `block_store` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BlockStoreEntry {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub content: Value,
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub usage_count: i32,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a store entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBlockStoreEntry {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub icon: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100))]
    pub block_type: String,
    pub content: Value,
    pub thumbnail: Option<String>,
    #[validate(length(max = 50))]
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

/// Partial update for a store entry.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBlockStoreEntry {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub icon: Option<String>,
    pub content: Option<Value>,
    pub thumbnail: Option<String>,
    #[validate(length(max = 50))]
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

/// Query parameters for listing the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockStoreFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl BlockStoreFilter {
    /// The category to filter on, treating `"all"` and blank as no filter.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }
}
