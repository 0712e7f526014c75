//! Daily announcement trigger.
//!
//! Sleeps until the next configured wall-clock time, runs one birthday
//! check with the current local date, and repeats. Errors are logged and
//! the loop keeps going.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use tracing::{error, info};

use confetti_engine::{Engine, Messenger};

pub fn parse_announce_at(s: &str) -> Option<NaiveTime> {
    let (h, m) = s.split_once(':')?;
    NaiveTime::from_hms_opt(h.trim().parse().ok()?, m.trim().parse().ok()?, 0)
}

/// Next occurrence of `at`, strictly after `now`.
pub fn next_run_at(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today_run = now.date().and_time(at);
    if today_run > now {
        today_run
    } else {
        (now.date() + chrono::Days::new(1)).and_time(at)
    }
}

pub async fn run_daily_loop(
    engine: Arc<Engine>,
    messenger: Arc<dyn Messenger>,
    at: NaiveTime,
) {
    loop {
        let now = Local::now().naive_local();
        let next = next_run_at(now, at);
        let wait = (next - now).to_std().unwrap_or(Duration::from_secs(60));
        info!("Next birthday check at {}", next);
        tokio::time::sleep(wait).await;

        let today = Local::now().date_naive();
        match engine.run_daily_check(messenger.as_ref(), today).await {
            Ok(report) => {
                if report.matched > 0 {
                    info!(
                        "Birthday dispatch: {} matched, {} sent, {} failed",
                        report.matched, report.sent, report.failed
                    );
                }
            }
            Err(e) => error!("Birthday check failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn datetime(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_announce_at() {
        assert_eq!(parse_announce_at("09:00"), Some(at(9, 0)));
        assert_eq!(parse_announce_at("23:59"), Some(at(23, 59)));
        assert_eq!(parse_announce_at("24:00"), None);
        assert_eq!(parse_announce_at("9"), None);
        assert_eq!(parse_announce_at("morning"), None);
    }

    #[test]
    fn test_next_run_later_today() {
        let next = next_run_at(datetime("2024-06-15T08:30:00"), at(9, 0));
        assert_eq!(next, datetime("2024-06-15T09:00:00"));
    }

    #[test]
    fn test_next_run_rolls_to_tomorrow() {
        let next = next_run_at(datetime("2024-06-15T09:00:00"), at(9, 0));
        assert_eq!(next, datetime("2024-06-16T09:00:00"));

        let next = next_run_at(datetime("2024-12-31T23:30:00"), at(9, 0));
        assert_eq!(next, datetime("2025-01-01T09:00:00"));
    }
}
