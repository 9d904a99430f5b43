//! Page zone models and DTOs.

use empower_core::ordering::OrderAssignment;
use empower_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A row from the `page_zones` table.
///
/// `blocks` holds the zone's entire ordered block array.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PageZone {
    pub id: DbId,
    pub page_slug: String,
    pub zone_name: String,
    pub blocks: Value,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for replacing a zone's blocks.
///
/// `blocks` is the JSON text of the array, exactly as the editor produced it.
/// Saving a zone activates it unless the body says otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertPageZone {
    pub blocks: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

/// Request body for toggling a zone.
#[derive(Debug, Clone, Deserialize)]
pub struct SetZoneActive {
    pub is_active: bool,
}

/// Request body for reordering the blocks inside a zone.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderZoneBlocks {
    pub blocks: Vec<OrderAssignment<String>>,
}
