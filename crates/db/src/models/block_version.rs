//! Block version models.
//!
//! A version is an immutable snapshot of a block's content and settings taken
//! just before they were overwritten. There is no create DTO: versions are
//! only written by the block repository as a side effect of an update or
//! restore.

use empower_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A row from the `block_versions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BlockVersion {
    pub id: DbId,
    pub block_id: DbId,
    pub version_number: i32,
    pub content: Value,
    pub settings: Value,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}
