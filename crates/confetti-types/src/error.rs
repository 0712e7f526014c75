use thiserror::Error;

use crate::models::ValidationReport;

pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors. These are returned as values from the public
/// operations — validation and authorization failures never unwind past
/// the engine boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Month or day outside the permissive calendar range.
    #[error("invalid date: month {month}, day {day}")]
    InvalidDate { month: u32, day: u32 },

    #[error("user {user_id} is not an admin")]
    Unauthorized { user_id: String },

    #[error("no birthday recorded for {user_id}")]
    NotFound { user_id: String },

    /// The CSV batch had at least one hard error; nothing was imported.
    #[error("CSV validation failed with {} error(s)", .report.errors.len())]
    ValidationFailed { report: ValidationReport },

    #[error("channel {channel} could not be verified: {reason}")]
    ChannelUnavailable { channel: String, reason: String },

    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}
