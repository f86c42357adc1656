//! Local-date calculator and calendar-date arithmetic
//!
//! Instant-to-date conversion happens exactly once per request path, via
//! [`local_date`]; everything downstream operates on `NaiveDate` so DST and
//! offset rules cannot compound across operations.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::core::constants::CHALLENGE_LENGTH_DAYS;

/// Parse an IANA timezone string using chrono-tz.
/// Returns `None` if the string is missing, empty, or not a valid identifier.
pub fn parse_timezone(tz: Option<&str>) -> Option<Tz> {
    tz.and_then(|s| s.parse::<Tz>().ok())
}

/// Convert an instant to the calendar date it falls on in the given timezone,
/// using the timezone's civil calendar rules (DST-aware)
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Shift a calendar date by whole days. Pure calendar math, never touches
/// instants or offsets.
pub fn add_days(date: NaiveDate, delta: i64) -> NaiveDate {
    date + Duration::days(delta)
}

/// Whole days from `from` to `to` (negative when `to` is earlier)
pub fn diff_days(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Lower clamp flavor for [`day_number`].
///
/// The two flavors are intentional per call site, not a unification target:
/// `Zero` gates a user's own progress (day 0 = challenge not started from
/// their frame), `One` renders a specific historical day view (there is no
/// day 0 to view).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFloor {
    Zero,
    One,
}

/// 1-based challenge day number for `today` measured against `start`,
/// clamped to `[floor, CHALLENGE_LENGTH_DAYS]`
pub fn day_number(start: NaiveDate, today: NaiveDate, floor: DayFloor) -> u32 {
    let raw = diff_days(start, today) + 1;
    let lower = match floor {
        DayFloor::Zero => 0,
        DayFloor::One => 1,
    };
    raw.clamp(lower, CHALLENGE_LENGTH_DAYS as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone(Some("UTC")), Some(chrono_tz::UTC));
        assert_eq!(
            parse_timezone(Some("America/New_York")),
            Some(chrono_tz::America::New_York)
        );
        assert_eq!(parse_timezone(Some("Invalid/Zone")), None);
        assert_eq!(parse_timezone(Some("")), None);
        assert_eq!(parse_timezone(None), None);
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 03:30 UTC on Jan 15 is still Jan 14 in New York (UTC-5)
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 3, 30, 0).unwrap();
        assert_eq!(
            local_date(instant, chrono_tz::America::New_York),
            date(2024, 1, 14)
        );
        assert_eq!(local_date(instant, chrono_tz::UTC), date(2024, 1, 15));
    }

    #[test]
    fn test_local_date_ahead_of_utc() {
        // 16:00 UTC is already the next day in Tokyo (UTC+9)
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 16, 0, 0).unwrap();
        assert_eq!(
            local_date(instant, chrono_tz::Asia::Tokyo),
            date(2024, 6, 2)
        );
    }

    #[test]
    fn test_local_date_dst_transition() {
        // US spring-forward 2024-03-10: 06:30 UTC is 01:30 EST, still Mar 10
        let instant = Utc.with_ymd_and_hms(2024, 3, 10, 6, 30, 0).unwrap();
        assert_eq!(
            local_date(instant, chrono_tz::America::New_York),
            date(2024, 3, 10)
        );
    }

    #[test]
    fn test_add_days() {
        assert_eq!(add_days(date(2024, 1, 31), 1), date(2024, 2, 1));
        assert_eq!(add_days(date(2024, 3, 1), -1), date(2024, 2, 29));
        assert_eq!(add_days(date(2024, 1, 14), 0), date(2024, 1, 14));
    }

    #[test]
    fn test_diff_days() {
        assert_eq!(diff_days(date(2024, 1, 14), date(2024, 1, 14)), 0);
        assert_eq!(diff_days(date(2024, 1, 14), date(2024, 1, 20)), 6);
        assert_eq!(diff_days(date(2024, 1, 20), date(2024, 1, 14)), -6);
        // Crosses a leap day
        assert_eq!(diff_days(date(2024, 2, 28), date(2024, 3, 1)), 2);
    }

    #[test]
    fn test_day_number_zero_floor() {
        let start = date(2024, 1, 14);
        assert_eq!(day_number(start, date(2024, 1, 14), DayFloor::Zero), 1);
        assert_eq!(day_number(start, date(2024, 1, 15), DayFloor::Zero), 2);
        // Before the start the zero-floor flavor reports "not started"
        assert_eq!(day_number(start, date(2024, 1, 13), DayFloor::Zero), 0);
        assert_eq!(day_number(start, date(2023, 12, 1), DayFloor::Zero), 0);
    }

    #[test]
    fn test_day_number_one_floor() {
        let start = date(2024, 1, 14);
        assert_eq!(day_number(start, date(2024, 1, 14), DayFloor::One), 1);
        // There is no day 0 to view
        assert_eq!(day_number(start, date(2024, 1, 13), DayFloor::One), 1);
    }

    #[test]
    fn test_day_number_caps_at_challenge_length() {
        let start = date(2024, 1, 1);
        assert_eq!(day_number(start, date(2024, 3, 15), DayFloor::Zero), 75);
        assert_eq!(day_number(start, date(2025, 1, 1), DayFloor::Zero), 75);
        assert_eq!(day_number(start, date(2025, 1, 1), DayFloor::One), 75);
    }

    #[test]
    fn test_day_number_stays_in_range() {
        let start = date(2024, 1, 14);
        for offset in -100i64..200 {
            let today = add_days(start, offset);
            let zero = day_number(start, today, DayFloor::Zero);
            let one = day_number(start, today, DayFloor::One);
            assert!(zero <= CHALLENGE_LENGTH_DAYS);
            assert!((1..=CHALLENGE_LENGTH_DAYS).contains(&one));
        }
    }
}
