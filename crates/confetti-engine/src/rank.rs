//! Next-occurrence ranking.

use chrono::{Datelike, NaiveDate};
use confetti_types::{BirthdayRecord, Upcoming};

/// Rank records by days until their next occurrence from `today`.
///
/// 0 = today, 1 = tomorrow. The sort is stable, so ties keep the input
/// order; there is no secondary key.
pub fn rank(records: &[BirthdayRecord], today: NaiveDate) -> Vec<Upcoming> {
    let mut upcoming: Vec<Upcoming> = records
        .iter()
        .map(|record| {
            let target = next_occurrence(record.date.month(), record.date.day(), today);
            Upcoming {
                user_id: record.user_id.clone(),
                display_name: record.display_name.clone(),
                month: record.date.month(),
                day: record.date.day(),
                days_until: (target - today).num_days(),
            }
        })
        .collect();

    upcoming.sort_by_key(|u| u.days_until);
    upcoming
}

/// The occurrence in `today`'s year, or next year's when it has already
/// passed. Strictly-before comparison, so today counts as this year.
fn next_occurrence(month: u32, day: u32, today: NaiveDate) -> NaiveDate {
    let this_year = occurrence_in(today.year(), month, day);
    if this_year < today {
        occurrence_in(today.year() + 1, month, day)
    } else {
        this_year
    }
}

/// Feb 29 rolls over to Mar 1 in non-leap years, so a leap-day record
/// always yields a valid occurrence.
fn occurrence_in(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use confetti_types::CanonDate;

    fn record(user_id: &str, month: u32, day: u32) -> BirthdayRecord {
        BirthdayRecord {
            user_id: user_id.into(),
            username: user_id.to_lowercase(),
            display_name: None,
            date: CanonDate::new(month, day).unwrap(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_orders_by_days_until() {
        let records = vec![
            record("U1", 12, 25),
            record("U2", 6, 20),
            record("U3", 6, 16),
        ];
        let ranked = rank(&records, day(2024, 6, 15));

        let ids: Vec<&str> = ranked.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, ["U3", "U2", "U1"]);
        assert_eq!(ranked[0].days_until, 1);
        assert_eq!(ranked[1].days_until, 5);
    }

    #[test]
    fn test_today_is_zero_days() {
        let ranked = rank(&[record("U1", 6, 15)], day(2024, 6, 15));
        assert_eq!(ranked[0].days_until, 0);
    }

    #[test]
    fn test_passed_birthday_wraps_to_next_year() {
        // 2024-06-14 already passed; 2025-06-14 is 364 days out
        let ranked = rank(&[record("U1", 6, 14)], day(2024, 6, 15));
        assert_eq!(ranked[0].days_until, 364);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            record("U1", 7, 1),
            record("U2", 7, 1),
            record("U3", 7, 1),
        ];
        let ranked = rank(&records, day(2024, 6, 15));

        let ids: Vec<&str> = ranked.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, ["U1", "U2", "U3"]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let records = vec![
            record("U1", 3, 3),
            record("U2", 7, 1),
            record("U3", 7, 1),
            record("U4", 1, 30),
        ];
        let today = day(2024, 6, 15);
        assert_eq!(rank(&records, today), rank(&records, today));
    }

    #[test]
    fn test_leap_day_in_non_leap_year() {
        // 2025 is not a leap year: Feb 29 resolves to Mar 1
        let ranked = rank(&[record("U1", 2, 29)], day(2025, 2, 27));
        assert_eq!(ranked[0].days_until, 2);

        // After the roll-over date, next year's Feb 29 is real (2028 is leap)
        let ranked = rank(&[record("U1", 2, 29)], day(2027, 3, 2));
        assert_eq!(ranked[0].days_until, 364);
    }

    #[test]
    fn test_leap_day_in_leap_year() {
        let ranked = rank(&[record("U1", 2, 29)], day(2024, 2, 1));
        assert_eq!(ranked[0].days_until, 28);
    }
}
