//! Announcement channel configuration.
//!
//! Two config keys are kept: the durable channel id (authoritative) and
//! the display name (for humans, possibly stale). Dispatch resolution is
//! id first, then name, then the fixed default.

use confetti_db::Database;
use confetti_types::{ChannelConfig, Result};
use tracing::info;

pub const CHANNEL_ID_KEY: &str = "birthdayChannelId";
pub const CHANNEL_NAME_KEY: &str = "birthdayChannelName";

/// Identifier-capable path: store both the durable id and the name.
pub fn set_channel(db: &Database, id: &str, name: &str) -> Result<()> {
    db.set_config(CHANNEL_ID_KEY, id)?;
    db.set_config(CHANNEL_NAME_KEY, name)?;
    info!("Announcement channel set to #{} ({})", name, id);
    Ok(())
}

/// Legacy plain-text path: writes only the name. A stored id, when
/// present, still wins at resolution time.
pub fn set_channel_name(db: &Database, name: &str) -> Result<()> {
    db.set_config(CHANNEL_NAME_KEY, name)?;
    info!("Announcement channel name set to #{}", name);
    Ok(())
}

pub fn get_channel(db: &Database) -> Result<ChannelConfig> {
    Ok(ChannelConfig {
        id: db.get_config(CHANNEL_ID_KEY)?,
        name: db.get_config(CHANNEL_NAME_KEY)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_seeded_name_resolves_until_id_is_set() {
        let (_dir, db) = open_test_db();

        // Migrations seed birthdayChannelName = general
        let config = get_channel(&db).unwrap();
        assert_eq!(config.id, None);
        assert_eq!(config.resolve(), "general");

        set_channel(&db, "C123", "randoms").unwrap();
        let config = get_channel(&db).unwrap();
        assert_eq!(config.resolve(), "C123");
        assert_eq!(config.name.as_deref(), Some("randoms"));
    }

    #[test]
    fn test_stored_id_still_wins_over_legacy_name_write() {
        let (_dir, db) = open_test_db();

        set_channel(&db, "C123", "randoms").unwrap();
        set_channel_name(&db, "parties").unwrap();

        let config = get_channel(&db).unwrap();
        assert_eq!(config.resolve(), "C123");
        assert_eq!(config.name.as_deref(), Some("parties"));
    }
}
