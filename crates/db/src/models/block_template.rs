//! Block template models and DTOs.

use empower_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use validator::Validate;

/// A row from the `block_templates` table.
///
/// `blocks` is an array of `{type, content, settings}` definitions; see
/// [`empower_core::templates::TemplateBlock`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub blocks: Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBlockTemplate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub blocks: Value,
}

/// Partial update for a template.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBlockTemplate {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub blocks: Option<Value>,
}
