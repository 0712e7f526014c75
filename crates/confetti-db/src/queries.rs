use anyhow::Result;
use rusqlite::{OptionalExtension, params};

use crate::Database;
use crate::models::BirthdayRow;

impl Database {
    // -- Birthdays --

    /// Insert or overwrite the record for `user_id`. Last write wins.
    pub fn upsert_birthday(
        &self,
        user_id: &str,
        username: &str,
        display_name: Option<&str>,
        birthdate: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO birthdays (user_id, username, display_name, birthdate)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                     username = excluded.username,
                     display_name = excluded.display_name,
                     birthdate = excluded.birthdate,
                     updated_at = datetime('now')",
                params![user_id, username, display_name, birthdate],
            )?;
            Ok(())
        })
    }

    /// Returns false when the user has no record to update.
    pub fn set_display_name(&self, user_id: &str, display_name: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE birthdays SET display_name = ?2, updated_at = datetime('now')
                 WHERE user_id = ?1",
                params![user_id, display_name],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn get_birthday(&self, user_id: &str) -> Result<Option<BirthdayRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT user_id, username, display_name, birthdate
                 FROM birthdays WHERE user_id = ?1",
                [user_id],
                row_to_birthday,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn delete_birthday(&self, user_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM birthdays WHERE user_id = ?1", [user_id])?;
            Ok(changed > 0)
        })
    }

    pub fn delete_birthdays(&self, user_ids: &[String]) -> Result<usize> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        self.with_conn_mut(|conn| {
            let placeholders: Vec<String> = (1..=user_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "DELETE FROM birthdays WHERE user_id IN ({})",
                placeholders.join(", ")
            );

            let db_params: Vec<&dyn rusqlite::types::ToSql> = user_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let changed = conn.execute(&sql, db_params.as_slice())?;
            Ok(changed)
        })
    }

    /// All birthdays in calendar order. The zero-padded sentinel-year
    /// text form sorts lexicographically by month, then day.
    pub fn list_birthdays(&self) -> Result<Vec<BirthdayRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, username, display_name, birthdate
                 FROM birthdays ORDER BY birthdate, rowid",
            )?;
            let rows = stmt
                .query_map([], row_to_birthday)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Exact month+day matches. The comparison decomposes the stored
    /// text form with substr, not SQLite's date functions, so it stays
    /// insensitive to the connection's timezone handling.
    pub fn birthdays_on(&self, month: u32, day: u32) -> Result<Vec<BirthdayRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, username, display_name, birthdate
                 FROM birthdays
                 WHERE substr(birthdate, 6, 2) = ?1 AND substr(birthdate, 9, 2) = ?2
                 ORDER BY user_id",
            )?;
            let rows = stmt
                .query_map(
                    params![format!("{month:02}"), format!("{day:02}")],
                    row_to_birthday,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Config --

    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM config WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO config (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
    }
}

fn row_to_birthday(row: &rusqlite::Row<'_>) -> rusqlite::Result<BirthdayRow> {
    Ok(BirthdayRow {
        user_id: row.get(0)?,
        username: row.get(1)?,
        display_name: row.get(2)?,
        birthdate: row.get(3)?,
    })
}
