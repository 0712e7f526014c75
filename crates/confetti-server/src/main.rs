use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use confetti_db::Database;
use confetti_engine::Engine;

mod scheduler;
mod webhook;

use webhook::WebhookMessenger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confetti=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("CONFETTI_DB_PATH").unwrap_or_else(|_| "confetti.db".into());
    let webhook_url = std::env::var("CONFETTI_WEBHOOK_URL")
        .context("CONFETTI_WEBHOOK_URL must point at the outbound message webhook")?;
    let announce_at = std::env::var("CONFETTI_ANNOUNCE_AT").unwrap_or_else(|_| "09:00".into());
    let announce_time = scheduler::parse_announce_at(&announce_at)
        .context("CONFETTI_ANNOUNCE_AT must be HH:MM")?;

    // Init database and engine
    let db = Database::open(&PathBuf::from(&db_path))?;
    let engine = Arc::new(Engine::new(db));
    let messenger = Arc::new(WebhookMessenger::new(webhook_url));

    info!("Birthday bot up, announcing daily at {}", announce_time.format("%H:%M"));

    scheduler::run_daily_loop(engine, messenger, announce_time).await;

    Ok(())
}
