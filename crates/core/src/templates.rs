//! Block template documents.
//!
//! A template is an ordered list of block definitions. Array index is the
//! only position information; when loaded into a page the blocks are placed
//! after the page's last block in template order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block_content::{validate_settings, BlockContent};
use crate::error::CoreError;

/// Maximum number of blocks in one template.
pub const MAX_TEMPLATE_BLOCKS: usize = 100;

/// One block definition inside a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub content: Value,
    #[serde(default = "empty_settings")]
    pub settings: Value,
}

fn empty_settings() -> Value {
    Value::Object(Default::default())
}

/// Parse and validate a template's `blocks` array.
///
/// Every entry is checked with the same content rules as a page block, so a
/// template can never load content the block endpoints would have rejected.
pub fn parse_template_blocks(blocks: &Value) -> Result<Vec<TemplateBlock>, CoreError> {
    let parsed: Vec<TemplateBlock> = serde_json::from_value(blocks.clone()).map_err(|e| {
        CoreError::Validation(format!("Template blocks must be an array of blocks: {e}"))
    })?;

    if parsed.is_empty() {
        return Err(CoreError::Validation(
            "Template must contain at least one block".into(),
        ));
    }
    if parsed.len() > MAX_TEMPLATE_BLOCKS {
        return Err(CoreError::Validation(format!(
            "Template has {} blocks, exceeding the maximum of {MAX_TEMPLATE_BLOCKS}",
            parsed.len()
        )));
    }

    for (index, block) in parsed.iter().enumerate() {
        BlockContent::parse(&block.block_type, &block.content)
            .and_then(|_| validate_settings(&block.settings))
            .map_err(|e| match e {
                CoreError::Validation(msg) => {
                    CoreError::Validation(format!("Template block {index}: {msg}"))
                }
                other => other,
            })?;
    }
    Ok(parsed)
}
