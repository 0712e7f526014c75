use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS birthdays (
            user_id       TEXT PRIMARY KEY,
            username      TEXT NOT NULL,
            display_name  TEXT,
            birthdate     TEXT NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_birthdays_date
            ON birthdays(birthdate);

        CREATE TABLE IF NOT EXISTS config (
            key    TEXT PRIMARY KEY,
            value  TEXT NOT NULL
        );

        -- Seed the default announcement channel name
        INSERT OR IGNORE INTO config (key, value)
            VALUES ('birthdayChannelName', 'general');
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
