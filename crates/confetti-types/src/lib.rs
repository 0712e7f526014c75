pub mod date;
pub mod error;
pub mod models;

pub use date::{CanonDate, DAYS_IN_MONTH, SENTINEL_YEAR};
pub use error::{Error, Result};
pub use models::{
    BirthdayRecord, ChannelConfig, DispatchReport, ImportReport, Upcoming, ValidationReport,
};
