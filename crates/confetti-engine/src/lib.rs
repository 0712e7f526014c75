//! Birthday directory and notification engine.
//!
//! The engine owns no platform wiring: adapters hand it already-extracted
//! primitives (user ids, date parts, raw CSV text) and it reaches back out
//! only through the [`Messenger`] capability. All state lives in the
//! database; every operation re-reads current rows, so concurrent admin
//! actions are observed on the next read.

pub mod admin;
pub mod channel;
pub mod csv;
pub mod dispatch;
pub mod rank;

use chrono::NaiveDate;
use tracing::{info, warn};

use confetti_db::Database;
use confetti_db::models::BirthdayRow;
use confetti_types::{
    BirthdayRecord, CanonDate, ChannelConfig, DispatchReport, Error, ImportReport, Result,
    Upcoming, ValidationReport,
};

pub use dispatch::Messenger;

pub struct Engine {
    db: Database,
}

impl Engine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // -- Birthdays --

    /// Insert or overwrite a member's birthday. Last write wins.
    pub fn set_birthday(
        &self,
        user_id: &str,
        username: &str,
        month: u32,
        day: u32,
        display_name: Option<&str>,
    ) -> Result<()> {
        let date = CanonDate::new(month, day)?;
        self.db
            .upsert_birthday(user_id, username, display_name, &date.to_string())?;
        info!("Birthday set for {} ({}): {}", username, user_id, date);
        Ok(())
    }

    /// Update the announcement display name of an existing record.
    pub fn set_display_name(&self, user_id: &str, display_name: &str) -> Result<()> {
        if !self.db.set_display_name(user_id, display_name)? {
            return Err(Error::NotFound {
                user_id: user_id.to_string(),
            });
        }
        info!("Display name updated for {}: \"{}\"", user_id, display_name);
        Ok(())
    }

    /// Returns false when there was no record to remove.
    pub fn remove_birthday(&self, user_id: &str) -> Result<bool> {
        let removed = self.db.delete_birthday(user_id)?;
        if removed {
            info!("Birthday removed for {}", user_id);
        }
        Ok(removed)
    }

    /// Record the same date for many members at once. Writes stay
    /// sequential; a failure for one member is logged and skipped.
    pub fn bulk_set_birthdays(
        &self,
        users: &[(String, String)],
        month: u32,
        day: u32,
    ) -> Result<usize> {
        let date = CanonDate::new(month, day)?;
        let birthdate = date.to_string();

        let mut written = 0;
        for (user_id, username) in users {
            match self.db.upsert_birthday(user_id, username, None, &birthdate) {
                Ok(()) => written += 1,
                Err(e) => warn!("Bulk set failed for {}: {}", user_id, e),
            }
        }
        info!("Bulk set {} birthdays to {}", written, date);
        Ok(written)
    }

    pub fn bulk_remove_birthdays(&self, user_ids: &[String]) -> Result<usize> {
        let removed = self.db.delete_birthdays(user_ids)?;
        info!("Bulk removed {} birthdays", removed);
        Ok(removed)
    }

    pub fn get_birthday(&self, user_id: &str) -> Result<Option<BirthdayRecord>> {
        let Some(row) = self.db.get_birthday(user_id)? else {
            return Ok(None);
        };
        Ok(record_from_row(row))
    }

    /// All records ordered by month, then day.
    pub fn list_birthdays(&self) -> Result<Vec<BirthdayRecord>> {
        let rows = self.db.list_birthdays()?;
        Ok(rows.into_iter().filter_map(record_from_row).collect())
    }

    /// Upcoming birthdays from `today`, closest first. `limit` bounds the
    /// result, `None` returns the full ranking.
    pub fn rank_upcoming(&self, today: NaiveDate, limit: Option<usize>) -> Result<Vec<Upcoming>> {
        let records = self.list_birthdays()?;
        let mut ranked = rank::rank(&records, today);
        if let Some(n) = limit {
            ranked.truncate(n);
        }
        Ok(ranked)
    }

    // -- CSV --

    pub fn validate_csv(&self, text: &str) -> ValidationReport {
        csv::validate(text)
    }

    pub fn import_csv(&self, text: &str) -> Result<ImportReport> {
        csv::import(&self.db, text)
    }

    pub fn csv_template(&self) -> String {
        csv::template()
    }

    // -- Admins --

    pub fn list_admins(&self) -> Vec<String> {
        admin::list_admins(&self.db)
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        admin::is_admin(&self.db, user_id)
    }

    pub fn add_admin(&self, user_id: &str) -> bool {
        admin::add_admin(&self.db, user_id)
    }

    pub fn remove_admin(&self, user_id: &str) -> bool {
        admin::remove_admin(&self.db, user_id)
    }

    pub fn require_admin(&self, user_id: &str) -> Result<()> {
        admin::require_admin(&self.db, user_id)
    }

    // -- Channel --

    pub fn set_channel(&self, id: &str, name: &str) -> Result<()> {
        channel::set_channel(&self.db, id, name)
    }

    /// Identifier-capable path: verify the handle through the messaging
    /// adapter, then store the id together with the resolved name.
    pub async fn set_channel_checked(
        &self,
        messenger: &dyn Messenger,
        id: &str,
    ) -> Result<String> {
        let name = messenger
            .resolve_channel(id)
            .await
            .map_err(|e| Error::ChannelUnavailable {
                channel: id.to_string(),
                reason: e.to_string(),
            })?;
        channel::set_channel(&self.db, id, &name)?;
        Ok(name)
    }

    pub fn set_channel_name(&self, name: &str) -> Result<()> {
        channel::set_channel_name(&self.db, name)
    }

    pub fn get_channel(&self) -> Result<ChannelConfig> {
        channel::get_channel(&self.db)
    }

    // -- Dispatch --

    pub async fn run_daily_check(
        &self,
        messenger: &dyn Messenger,
        today: NaiveDate,
    ) -> Result<DispatchReport> {
        dispatch::run_daily_check(&self.db, messenger, today).await
    }
}

/// A stored row whose birthdate no longer parses is logged and dropped
/// rather than failing the whole read.
fn record_from_row(row: BirthdayRow) -> Option<BirthdayRecord> {
    match row.birthdate.parse::<CanonDate>() {
        Ok(date) => Some(BirthdayRecord {
            user_id: row.user_id,
            username: row.username,
            display_name: row.display_name,
            date,
        }),
        Err(_) => {
            warn!("Corrupt birthdate '{}' for {}", row.birthdate, row.user_id);
            None
        }
    }
}
