//! Admin authorization backed by the config store.
//!
//! An absent or empty `adminUserIds` entry is the open policy: every
//! user is treated as an admin. That includes the bootstrap window in
//! which anyone may add themselves as the first admin — a documented
//! trust-boundary behavior, kept as-is.

use confetti_db::Database;
use confetti_types::{Error, Result};
use tracing::warn;

pub const ADMIN_IDS_KEY: &str = "adminUserIds";

/// Current admin set, in stored order. A read failure degrades to the
/// open-policy empty list.
pub fn list_admins(db: &Database) -> Vec<String> {
    match db.get_config(ADMIN_IDS_KEY) {
        Ok(Some(value)) => value
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect(),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Failed to read admin list, treating as open: {}", e);
            Vec::new()
        }
    }
}

pub fn is_admin(db: &Database, user_id: &str) -> bool {
    let admins = list_admins(db);
    admins.is_empty() || admins.iter().any(|id| id == user_id)
}

/// Idempotent: adding an existing admin succeeds without a write.
/// Returns false only when persistence fails.
pub fn add_admin(db: &Database, user_id: &str) -> bool {
    let mut admins = list_admins(db);
    if admins.iter().any(|id| id == user_id) {
        return true;
    }
    admins.push(user_id.to_string());
    persist(db, &admins)
}

/// Idempotent: removing an absent admin succeeds without a write.
pub fn remove_admin(db: &Database, user_id: &str) -> bool {
    let admins = list_admins(db);
    if !admins.iter().any(|id| id == user_id) {
        return true;
    }
    let remaining: Vec<String> = admins.into_iter().filter(|id| id != user_id).collect();
    persist(db, &remaining)
}

/// Gate for privileged operations. Denials are logged with the actor.
pub fn require_admin(db: &Database, user_id: &str) -> Result<()> {
    if is_admin(db, user_id) {
        return Ok(());
    }
    warn!("Unauthorized admin operation attempted by {}", user_id);
    Err(Error::Unauthorized {
        user_id: user_id.to_string(),
    })
}

fn persist(db: &Database, admins: &[String]) -> bool {
    let mut deduped: Vec<&str> = Vec::new();
    for id in admins {
        if !deduped.contains(&id.as_str()) {
            deduped.push(id);
        }
    }

    match db.set_config(ADMIN_IDS_KEY, &deduped.join(",")) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to persist admin list: {}", e);
            false
        }
    }
}
