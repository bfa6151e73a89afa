//! Canonical local-calendar day keys.
//!
//! Every component that produces or consumes a `YYYY-MM-DD` date string
//! goes through this module, so "yesterday relative to day D" means the
//! same thing everywhere. Keys are always derived from the user's local
//! calendar day; no UTC conversion happens mid-calculation.

use chrono::{Local, NaiveDate};

/// Date format used for all day keys.
const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a calendar day as its canonical `YYYY-MM-DD` key.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a day key back into a calendar day.
///
/// Returns `None` for anything that is not a strict `YYYY-MM-DD` date;
/// callers decide whether to skip or fail.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}

/// The calendar day immediately before `date`.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    // pred_opt only fails at NaiveDate::MIN, far outside any real history
    date.pred_opt().unwrap_or(date)
}

/// Today's date in the local calendar.
///
/// Recalculation computes this exactly once per pass and threads it
/// through, so a pass that straddles midnight stays internally
/// consistent.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// All calendar days from `first` through `last`, inclusive, ascending.
///
/// Empty when `first > last`.
pub fn date_range(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = first;
    while current <= last {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_day_key_roundtrip() {
        let date = d(2025, 3, 9);
        assert_eq!(day_key(date), "2025-03-09");
        assert_eq!(parse_day_key("2025-03-09"), Some(date));
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert_eq!(parse_day_key(""), None);
        assert_eq!(parse_day_key("not-a-date"), None);
        assert_eq!(parse_day_key("2025-13-01"), None);
        assert_eq!(parse_day_key("2025-02-30"), None);
    }

    #[test]
    fn test_previous_day_crosses_month_and_year() {
        assert_eq!(previous_day(d(2025, 3, 1)), d(2025, 2, 28));
        assert_eq!(previous_day(d(2025, 1, 1)), d(2024, 12, 31));
        // leap year
        assert_eq!(previous_day(d(2024, 3, 1)), d(2024, 2, 29));
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = date_range(d(2025, 1, 30), d(2025, 2, 2));
        assert_eq!(
            range,
            vec![d(2025, 1, 30), d(2025, 1, 31), d(2025, 2, 1), d(2025, 2, 2)]
        );
    }

    #[test]
    fn test_date_range_single_day_and_empty() {
        assert_eq!(date_range(d(2025, 5, 5), d(2025, 5, 5)), vec![d(2025, 5, 5)]);
        assert!(date_range(d(2025, 5, 6), d(2025, 5, 5)).is_empty());
    }
}
