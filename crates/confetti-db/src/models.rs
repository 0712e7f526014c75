/// Database row types — these map directly to SQLite rows.
/// Distinct from confetti-types models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct BirthdayRow {
    pub user_id: String,
    pub username: String,
    pub display_name: Option<String>,
    /// Canonical sentinel-year form, `2000-MM-DD`.
    pub birthdate: String,
}
