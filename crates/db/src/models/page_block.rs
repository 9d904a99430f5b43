//! Page block models and DTOs.
//!
//! The `block_type` and `sort_order` columns cross the API boundary as `type`
//! and `order`. JSON columns are returned as structured values, exactly as
//! they were stored.

use empower_core::block_content::{validate_settings, BlockContent};
use empower_core::block_meta::{Animation, Visibility};
use empower_core::error::CoreError;
use empower_core::ordering::{OrderAssignment, Positioned};
use empower_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `page_blocks` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PageBlock {
    pub id: DbId,
    pub page_id: DbId,
    #[serde(rename = "type")]
    pub block_type: String,
    pub content: Value,
    pub settings: Value,
    pub visibility: Value,
    pub animation: Value,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Positioned for PageBlock {
    type Key = DbId;

    fn key(&self) -> &DbId {
        &self.id
    }

    fn position(&self) -> i32 {
        self.sort_order
    }

    fn set_position(&mut self, position: i32) {
        self.sort_order = position;
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for creating a block. `order` defaults to the end of the page.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePageBlock {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100))]
    pub block_type: String,
    pub content: Value,
    pub settings: Option<Value>,
    pub visibility: Option<Value>,
    pub animation: Option<Value>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

impl CreatePageBlock {
    /// Check content against the block type and shape-check the metadata.
    pub fn validate_payload(&self) -> Result<(), CoreError> {
        BlockContent::parse(&self.block_type, &self.content)?;
        validate_metadata(
            self.settings.as_ref(),
            self.visibility.as_ref(),
            self.animation.as_ref(),
        )
    }
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Partial update for a block. Only present fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePageBlock {
    pub content: Option<Value>,
    pub settings: Option<Value>,
    pub visibility: Option<Value>,
    pub animation: Option<Value>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

impl UpdatePageBlock {
    /// Content or settings changes are snapshotted before being applied.
    ///
    /// A patch touching only order, visibility or animation writes no
    /// version, unlike an editor that snapshots on every save.
    pub fn touches_versioned_fields(&self) -> bool {
        self.content.is_some() || self.settings.is_some()
    }

    /// Validate the patch against the block's (immutable) type.
    pub fn validate_payload(&self, block_type: &str) -> Result<(), CoreError> {
        if let Some(content) = &self.content {
            BlockContent::parse(block_type, content)?;
        }
        validate_metadata(
            self.settings.as_ref(),
            self.visibility.as_ref(),
            self.animation.as_ref(),
        )
    }
}

fn validate_metadata(
    settings: Option<&Value>,
    visibility: Option<&Value>,
    animation: Option<&Value>,
) -> Result<(), CoreError> {
    if let Some(settings) = settings {
        validate_settings(settings)?;
    }
    if let Some(visibility) = visibility {
        Visibility::from_value(visibility)?;
    }
    if let Some(animation) = animation {
        Animation::from_value(animation)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Filters accepted by the block list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockListFilter {
    #[serde(rename = "type")]
    pub block_type: Option<String>,
    pub search: Option<String>,
}

/// Request body for reordering a page's blocks.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderBlocksRequest {
    pub blocks: Vec<OrderAssignment<DbId>>,
}

/// Result of a reorder.
#[derive(Debug, Clone, Serialize)]
pub struct ReorderResult {
    pub reordered: usize,
    pub updated: usize,
}

/// Result of normalising a page's block orders to `0..n`.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeResult {
    pub total_blocks: usize,
    pub updated: usize,
}
