//! Block version retention policy.

use serde::Serialize;

/// Versions kept per block when no retention is configured.
pub const DEFAULT_VERSION_RETENTION: i64 = 50;

/// Retention can never drop below one, otherwise a restore would have nothing
/// to restore.
pub const MIN_VERSION_RETENTION: i64 = 1;

/// How many snapshots to keep for each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionRetention(i64);

impl VersionRetention {
    pub fn new(keep: i64) -> Self {
        Self(keep.max(MIN_VERSION_RETENTION))
    }

    /// Parse a configured value, falling back to the default when it is
    /// missing or not a number.
    pub fn from_setting(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn keep(self) -> i64 {
        self.0
    }
}

impl Default for VersionRetention {
    fn default() -> Self {
        Self(DEFAULT_VERSION_RETENTION)
    }
}
