//! Block type tags and the typed content model.
//!
//! Block content is persisted as the exact JSON the editor sent, but every
//! write is first parsed into a [`BlockContent`] variant keyed by the block's
//! type. Known types must match their schema; any other type must be a
//! well-formed custom block id and may carry arbitrary JSON.
//!
//! Each known type accepts two shapes: a bare scalar (the legacy editor sent
//! plain strings, e.g. a text block's body or an image URL) or an object keyed
//! the way the editor's field panels write it. Only image `src` and video
//! `url` are required.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Block type constants
// ---------------------------------------------------------------------------

/// Built-in block types understood by the renderer.
pub mod block_types {
    pub const TEXT: &str = "text";
    pub const IMAGE: &str = "image";
    pub const VIDEO: &str = "video";
    pub const QUOTE: &str = "quote";
    pub const CTA: &str = "cta";
    pub const SPACER: &str = "spacer";

    /// All built-in block types.
    pub const ALL: &[&str] = &[TEXT, IMAGE, VIDEO, QUOTE, CTA, SPACER];
}

/// Maximum length of a block type tag.
pub const MAX_BLOCK_TYPE_LEN: usize = 100;

/// Maximum height of a spacer block in pixels, per breakpoint.
pub const MAX_SPACER_HEIGHT: u32 = 500;

/// Custom block ids: lowercase alphanumerics separated by `-` or `_`.
static CUSTOM_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Typed content variants
// ---------------------------------------------------------------------------

// Field names follow the editor's camelCase keys. Style and layout keys the
// server does not interpret are ignored here and stored as sent.

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextContent {
    /// Rich text HTML.
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageContent {
    pub src: String,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoContent {
    pub url: String,
    pub poster: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteContent {
    pub quote: Option<String>,
    pub author: Option<String>,
    pub role: Option<String>,
    pub author_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaContent {
    pub heading: Option<String>,
    pub description: Option<String>,
    pub primary_button_text: Option<String>,
    pub primary_button_link: Option<String>,
    pub secondary_button_text: Option<String>,
    pub secondary_button_link: Option<String>,
    pub background_image: Option<String>,
}

/// Heights in pixels; mobile and tablet fall back to `height` when unset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacerContent {
    pub height: Option<u32>,
    pub mobile_height: Option<u32>,
    pub tablet_height: Option<u32>,
}

/// Content of a block, keyed by its type.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Text(TextContent),
    Image(ImageContent),
    Video(VideoContent),
    Quote(QuoteContent),
    Cta(CtaContent),
    Spacer(SpacerContent),
    /// A block type the server does not know the schema of (JE blocks,
    /// composite blocks from the block store).
    Custom { block_type: String, content: Value },
}

impl BlockContent {
    /// Parse and validate `content` for the given block type.
    pub fn parse(block_type: &str, content: &Value) -> Result<Self, CoreError> {
        validate_block_type(block_type)?;
        reject_nul_chars("Block content", content)?;

        match block_type {
            block_types::TEXT => {
                let text: TextContent = parse_shape(block_type, content, "content", |s| {
                    TextContent {
                        content: Some(s.to_string()),
                    }
                })?;
                Ok(BlockContent::Text(text))
            }
            block_types::IMAGE => {
                let image: ImageContent = parse_shape(block_type, content, "src", |s| {
                    ImageContent {
                        src: s.to_string(),
                        alt: None,
                        caption: None,
                    }
                })?;
                require_non_empty(block_type, "src", &image.src)?;
                Ok(BlockContent::Image(image))
            }
            block_types::VIDEO => {
                let video: VideoContent = parse_shape(block_type, content, "url", |s| {
                    VideoContent {
                        url: s.to_string(),
                        poster: None,
                        title: None,
                    }
                })?;
                require_non_empty(block_type, "url", &video.url)?;
                Ok(BlockContent::Video(video))
            }
            block_types::QUOTE => {
                let quote: QuoteContent = parse_shape(block_type, content, "quote", |s| {
                    QuoteContent {
                        quote: Some(s.to_string()),
                        ..Default::default()
                    }
                })?;
                Ok(BlockContent::Quote(quote))
            }
            block_types::CTA => {
                let cta: CtaContent = parse_shape(block_type, content, "heading", |s| {
                    CtaContent {
                        heading: Some(s.to_string()),
                        ..Default::default()
                    }
                })?;
                Ok(BlockContent::Cta(cta))
            }
            block_types::SPACER => {
                let spacer = match content {
                    Value::Number(n) => SpacerContent {
                        height: Some(
                            n.as_u64()
                                .and_then(|h| u32::try_from(h).ok())
                                .ok_or_else(|| {
                                    invalid(block_type, "height must be a non-negative integer")
                                })?,
                        ),
                        ..Default::default()
                    },
                    Value::Object(_) => serde_json::from_value(content.clone())
                        .map_err(|e| invalid(block_type, &e.to_string()))?,
                    _ => {
                        return Err(invalid(
                            block_type,
                            "expected a height or an object of heights",
                        ))
                    }
                };
                for (field, height) in [
                    ("height", spacer.height),
                    ("mobileHeight", spacer.mobile_height),
                    ("tabletHeight", spacer.tablet_height),
                ] {
                    if let Some(height) = height.filter(|h| *h > MAX_SPACER_HEIGHT) {
                        return Err(invalid(
                            block_type,
                            &format!("{field} {height} exceeds {MAX_SPACER_HEIGHT}"),
                        ));
                    }
                }
                Ok(BlockContent::Spacer(spacer))
            }
            custom => Ok(BlockContent::Custom {
                block_type: custom.to_string(),
                content: content.clone(),
            }),
        }
    }

    /// The type tag this content was parsed for.
    pub fn block_type(&self) -> &str {
        match self {
            BlockContent::Text(_) => block_types::TEXT,
            BlockContent::Image(_) => block_types::IMAGE,
            BlockContent::Video(_) => block_types::VIDEO,
            BlockContent::Quote(_) => block_types::QUOTE,
            BlockContent::Cta(_) => block_types::CTA,
            BlockContent::Spacer(_) => block_types::SPACER,
            BlockContent::Custom { block_type, .. } => block_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check whether a type tag is one of the built-in block types.
pub fn is_builtin_block_type(block_type: &str) -> bool {
    block_types::ALL.contains(&block_type)
}

/// Validate a block type tag (built-in or custom id).
pub fn validate_block_type(block_type: &str) -> Result<(), CoreError> {
    if block_type.is_empty() {
        return Err(CoreError::Validation("Block type must not be empty".into()));
    }
    if block_type.len() > MAX_BLOCK_TYPE_LEN {
        return Err(CoreError::Validation(format!(
            "Block type exceeds {MAX_BLOCK_TYPE_LEN} characters"
        )));
    }
    if !is_builtin_block_type(block_type) && !CUSTOM_TYPE_RE.is_match(block_type) {
        return Err(CoreError::Validation(format!(
            "Invalid block type '{block_type}': use lowercase letters, digits, '-' or '_'"
        )));
    }
    Ok(())
}

/// Block settings are free-form per type but must be a JSON object.
pub fn validate_settings(settings: &Value) -> Result<(), CoreError> {
    if !settings.is_object() {
        return Err(CoreError::Validation(
            "Block settings must be a JSON object".into(),
        ));
    }
    reject_nul_chars("Block settings", settings)
}

/// Reject documents containing a NUL character (`\u0000`) in any string or
/// key. It is valid JSON, but Postgres cannot store it in `jsonb` or `text`.
pub fn reject_nul_chars(what: &str, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::String(s) if s.contains('\0') => Err(nul_error(what)),
        Value::Array(items) => items.iter().try_for_each(|v| reject_nul_chars(what, v)),
        Value::Object(map) => map.iter().try_for_each(|(key, v)| {
            if key.contains('\0') {
                Err(nul_error(what))
            } else {
                reject_nul_chars(what, v)
            }
        }),
        _ => Ok(()),
    }
}

fn nul_error(what: &str) -> CoreError {
    CoreError::Validation(format!("{what} must not contain NUL characters (\\u0000)"))
}

/// Accept either a bare string (mapped through `from_bare`) or an object
/// deserialized into `T`.
fn parse_shape<T, F>(
    block_type: &str,
    content: &Value,
    primary: &str,
    from_bare: F,
) -> Result<T, CoreError>
where
    T: serde::de::DeserializeOwned,
    F: FnOnce(&str) -> T,
{
    match content {
        Value::String(s) => Ok(from_bare(s)),
        Value::Object(_) => serde_json::from_value(content.clone())
            .map_err(|e| invalid(block_type, &e.to_string())),
        _ => Err(invalid(
            block_type,
            &format!("expected a string or an object with \"{primary}\""),
        )),
    }
}

fn require_non_empty(block_type: &str, field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(invalid(block_type, &format!("\"{field}\" must not be empty")))
    } else {
        Ok(())
    }
}

fn invalid(block_type: &str, detail: &str) -> CoreError {
    CoreError::Validation(format!("Invalid content for block type '{block_type}': {detail}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
