use serde::{Deserialize, Serialize};

use crate::date::CanonDate;

/// A member's stored birthday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthdayRecord {
    pub user_id: String,
    pub username: String,
    /// Free-text name used in announcements when present.
    pub display_name: Option<String>,
    pub date: CanonDate,
}

/// One entry of the next-occurrence ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upcoming {
    pub user_id: String,
    pub display_name: Option<String>,
    pub month: u32,
    pub day: u32,
    /// 0 = today, 1 = tomorrow.
    pub days_until: i64,
}

/// Announcement channel configuration as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Durable channel identifier, authoritative when present.
    pub id: Option<String>,
    /// Human-readable channel name, possibly stale.
    pub name: Option<String>,
}

impl ChannelConfig {
    /// Terminal fallback when nothing is configured.
    pub const DEFAULT_CHANNEL: &'static str = "general";

    /// The handle dispatch should address: durable id first, then the
    /// display name, then the fixed default. Never fails.
    pub fn resolve(&self) -> &str {
        self.id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(Self::DEFAULT_CHANNEL)
    }
}

/// Outcome of validating a CSV batch without importing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Outcome of importing a CSV batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: usize,
    /// Per-row failures that did not stop the rest of the batch.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Outcome of one daily dispatch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Records whose month/day matched today.
    pub matched: usize,
    pub sent: usize,
    pub failed: usize,
    /// Channel handle the announcements went to; `None` when there was
    /// nothing to send.
    pub channel: Option<String>,
}
