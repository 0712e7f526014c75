//! Daily birthday dispatch.
//!
//! Finds today's birthdays, resolves the announcement channel, and sends
//! one message per match. Sends are isolated: a failure for one user is
//! logged and counted, the remaining users still get their message.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use confetti_db::Database;
use confetti_types::{DispatchReport, Result};
use tracing::{error, info};

use crate::channel;

/// Outbound messaging capability. `channel` is whatever handle the
/// platform accepts — a durable id or a plain name.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, channel: &str, text: &str) -> anyhow::Result<()>;

    /// Verify a channel handle, returning its display name.
    async fn resolve_channel(&self, channel: &str) -> anyhow::Result<String>;
}

/// Run one birthday check for `today`.
///
/// There is no guard against running twice on the same calendar day; a
/// manual trigger on top of the scheduled one re-announces.
pub async fn run_daily_check(
    db: &Database,
    messenger: &dyn Messenger,
    today: NaiveDate,
) -> Result<DispatchReport> {
    info!("Checking for birthdays on {:02}/{:02}", today.day(), today.month());

    let rows = db.birthdays_on(today.month(), today.day())?;
    if rows.is_empty() {
        info!("No birthdays today");
        return Ok(DispatchReport {
            matched: 0,
            sent: 0,
            failed: 0,
            channel: None,
        });
    }

    let config = channel::get_channel(db)?;
    let target = config.resolve();

    info!("Found {} birthdays today, announcing in #{}", rows.len(), target);

    let mut sent = 0;
    let mut failed = 0;
    for row in &rows {
        let mention = format!("<@{}>", row.user_id);
        let display = row.display_name.clone().unwrap_or_else(|| mention.clone());
        let text = format!(":birthday: Happy Birthday {display} ({mention})! :cake: :tada:");

        match messenger.send_message(target, &text).await {
            Ok(()) => {
                info!(
                    "Sent birthday message for {} ({})",
                    row.display_name.as_deref().unwrap_or(&row.username),
                    row.user_id
                );
                sent += 1;
            }
            Err(e) => {
                error!("Failed to send birthday message for {}: {}", row.user_id, e);
                failed += 1;
            }
        }
    }

    Ok(DispatchReport {
        matched: rows.len(),
        sent,
        failed,
        channel: Some(target.to_string()),
    })
}
