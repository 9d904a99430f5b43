//! Page zones: named slots on hand-built pages that hold an ordered array of
//! blocks as a single JSON document.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::block_content::{reject_nul_chars, validate_block_type};
use crate::error::CoreError;
use crate::ordering::{
    apply_reorder, normalize_positions, sort_by_position, OrderAssignment, Positioned,
    ReorderError,
};

/// Maximum length of a page slug or zone name.
pub const MAX_SLUG_LEN: usize = 100;

/// Maximum number of blocks held by one zone.
pub const MAX_BLOCKS_PER_ZONE: usize = 200;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Zone catalog
// ---------------------------------------------------------------------------

/// A hand-built page that exposes zones to the editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZonePage {
    pub slug: &'static str,
    pub name: &'static str,
    pub zones: &'static [&'static str],
}

/// Pages whose layouts contain zone slots, and the slots each one renders.
pub const AVAILABLE_PAGES: &[ZonePage] = &[
    ZonePage {
        slug: "home",
        name: "Home",
        zones: &[
            "after-hero",
            "after-carousel",
            "before-community",
            "after-community",
            "before-footer",
        ],
    },
    ZonePage {
        slug: "about",
        name: "About",
        zones: &["after-hero", "before-content", "after-content", "before-footer"],
    },
    ZonePage {
        slug: "philosophy",
        name: "Philosophy",
        zones: &["after-hero", "after-pillars", "before-footer"],
    },
    ZonePage {
        slug: "community",
        name: "Community",
        zones: &["after-hero", "after-features", "before-footer"],
    },
    ZonePage {
        slug: "offerings",
        name: "Offerings",
        zones: &["after-hero", "after-grid", "before-footer"],
    },
    ZonePage {
        slug: "events",
        name: "Events",
        zones: &["after-hero", "after-calendar", "before-footer"],
    },
    ZonePage {
        slug: "contact",
        name: "Contact",
        zones: &["after-hero", "after-form", "before-footer"],
    },
    ZonePage {
        slug: "blog",
        name: "Blog",
        zones: &["after-hero", "after-articles", "sidebar", "before-footer"],
    },
];

/// Validate a page slug or zone name (`after-hero`, `home`).
pub fn validate_slug(field: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() || value.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be between 1 and {MAX_SLUG_LEN} characters"
        )));
    }
    if !SLUG_RE.is_match(value) {
        return Err(CoreError::Validation(format!(
            "{field} '{value}' must be lowercase words separated by '-'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Zone blocks
// ---------------------------------------------------------------------------

/// Typed view of one element of a zone's block array.
///
/// Only `id`, `type` and `order` are interpreted; everything else (content,
/// settings, renderer-specific keys) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Positioned for ZoneBlock {
    type Key = String;

    fn key(&self) -> &String {
        &self.id
    }

    fn position(&self) -> i32 {
        self.order.unwrap_or_default()
    }

    fn set_position(&mut self, position: i32) {
        self.order = Some(position);
    }
}

/// Parse a zone's blocks document, returning the raw value (stored verbatim)
/// alongside its typed view.
pub fn parse_zone_blocks(raw: &str) -> Result<(Value, Vec<ZoneBlock>), CoreError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| CoreError::Validation(format!("Zone blocks are not valid JSON: {e}")))?;
    let blocks = zone_blocks_from_value(&value)?;
    Ok((value, blocks))
}

/// Typed view of an already-parsed blocks document.
pub fn zone_blocks_from_value(value: &Value) -> Result<Vec<ZoneBlock>, CoreError> {
    let Value::Array(elements) = value else {
        return Err(CoreError::Validation(
            "Zone blocks must be a JSON array".into(),
        ));
    };
    if elements.len() > MAX_BLOCKS_PER_ZONE {
        return Err(CoreError::Validation(format!(
            "Zone holds {} blocks, exceeding the maximum of {MAX_BLOCKS_PER_ZONE}",
            elements.len()
        )));
    }
    reject_nul_chars("Zone blocks", value)?;

    let mut seen = HashSet::with_capacity(elements.len());
    let mut blocks = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let block: ZoneBlock = serde_json::from_value(element.clone()).map_err(|e| {
            CoreError::Validation(format!("Zone block at index {index} is malformed: {e}"))
        })?;
        validate_block_type(&block.block_type)?;
        if !seen.insert(block.id.clone()) {
            return Err(CoreError::Validation(format!(
                "Zone block id '{}' appears more than once",
                block.id
            )));
        }
        blocks.push(block);
    }
    Ok(blocks)
}

/// Reorder a zone's blocks.
///
/// Blocks without an explicit `order` take their array index first. After
/// applying the assignments the array is re-sorted and every `order` is
/// rewritten to the block's new index, so array position and `order` agree.
pub fn reorder_zone_blocks(
    mut blocks: Vec<ZoneBlock>,
    assignments: &[OrderAssignment<String>],
) -> Result<Vec<ZoneBlock>, ReorderError<String>> {
    for (index, block) in blocks.iter_mut().enumerate() {
        if block.order.is_none() {
            block.order = Some(index as i32);
        }
    }
    apply_reorder(&mut blocks, assignments)?;
    sort_by_position(&mut blocks);
    normalize_positions(&mut blocks);
    Ok(blocks)
}
