//! Visibility and animation metadata attached to a block.
//!
//! Both documents are stored exactly as sent and returned exactly as stored.
//! The server validates their shape only; evaluating a schedule or a device
//! rule is the renderer's job.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block_content::reject_nul_chars;
use crate::error::CoreError;

/// Animation type that disables animation entirely.
pub const ANIMATION_NONE: &str = "none";

/// Upper bound for `duration` and `delay`, in milliseconds.
pub const MAX_ANIMATION_MS: u32 = 60_000;

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Conditional visibility rules for a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Visibility {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<DeviceVisibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthVisibility>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceVisibility {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<bool>,
}

/// Publication window. Dates are RFC 3339 strings, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthVisibility {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_in: Option<bool>,
}

impl Visibility {
    /// Validate a raw visibility document.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        reject_nul_chars("Visibility", value)?;
        let visibility: Visibility = serde_json::from_value(value.clone())
            .map_err(|e| CoreError::Validation(format!("Invalid visibility: {e}")))?;

        if let Some(schedule) = &visibility.schedule {
            schedule.validate()?;
        }
        Ok(visibility)
    }
}

impl Schedule {
    fn validate(&self) -> Result<(), CoreError> {
        let start = self
            .start_date
            .as_deref()
            .map(|s| parse_date("startDate", s))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|s| parse_date("endDate", s))
            .transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(CoreError::Validation(
                    "Invalid visibility: schedule startDate is after endDate".into(),
                ));
            }
        }
        Ok(())
    }
}

fn parse_date(field: &str, raw: &str) -> Result<DateTime<FixedOffset>, CoreError> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| {
        CoreError::Validation(format!(
            "Invalid visibility: schedule {field} '{raw}' is not an RFC 3339 date ({e})"
        ))
    })
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// Entrance/interaction animation for a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Animation {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

impl Animation {
    /// Validate a raw animation document.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        reject_nul_chars("Animation", value)?;
        let animation: Animation = serde_json::from_value(value.clone())
            .map_err(|e| CoreError::Validation(format!("Invalid animation: {e}")))?;

        for (field, ms) in [("duration", animation.duration), ("delay", animation.delay)] {
            if let Some(ms) = ms {
                if ms > MAX_ANIMATION_MS {
                    return Err(CoreError::Validation(format!(
                        "Invalid animation: {field} {ms}ms exceeds {MAX_ANIMATION_MS}ms"
                    )));
                }
            }
        }
        Ok(animation)
    }

    /// Whether this animation actually animates anything.
    pub fn is_enabled(&self) -> bool {
        matches!(self.kind.as_deref(), Some(kind) if kind != ANIMATION_NONE)
    }
}
