//! "HH:MM" clock arithmetic and date helpers

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::{AppError, AppResult},
    models::Weekday,
};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid time regex"));

/// Parse "HH:MM" (24h, one or two hour digits) into minutes since midnight.
pub fn to_minutes(time: &str) -> AppResult<u32> {
    let caps = TIME_RE
        .captures(time.trim())
        .ok_or_else(|| AppError::InvalidFormat(format!("Invalid time '{}' (use HH:MM)", time)))?;

    let hours: u32 = caps[1]
        .parse()
        .map_err(|_| AppError::InvalidFormat(format!("Invalid hours in '{}'", time)))?;
    let minutes: u32 = caps[2]
        .parse()
        .map_err(|_| AppError::InvalidFormat(format!("Invalid minutes in '{}'", time)))?;

    if hours > 23 || minutes > 59 {
        return Err(AppError::InvalidFormat(format!("Time '{}' is out of range", time)));
    }
    Ok(hours * 60 + minutes)
}

/// Format minutes since midnight as zero-padded "HH:MM". Values wrap at 24h;
/// callers reject ranges that cross midnight before formatting.
pub fn to_time_string(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Canonical "HH:MM" form of a user supplied time ("9:05" -> "09:05")
pub fn normalize_time(time: &str) -> AppResult<String> {
    to_minutes(time).map(to_time_string)
}

/// Parse and validate a same-day range, returning (start, end) in minutes
pub fn parse_range(start: &str, end: &str) -> AppResult<(u32, u32)> {
    let start_min = to_minutes(start)?;
    let end_min = to_minutes(end)?;
    if start_min >= end_min {
        return Err(AppError::InvalidRange(format!(
            "Start time {} must be before end time {}",
            start, end
        )));
    }
    Ok((start_min, end_min))
}

/// 12-hour display form: "13:30" -> "1:30 PM", "00:15" -> "12:15 AM"
pub fn format_12h(time: &str) -> AppResult<String> {
    let total = to_minutes(time)?;
    let hours = total / 60;
    let period = if hours >= 12 { "PM" } else { "AM" };
    let hour12 = match hours % 12 {
        0 => 12,
        h => h,
    };
    Ok(format!("{}:{:02} {}", hour12, total % 60, period))
}

/// "9:00 AM - 10:00 AM"
pub fn format_time_range(start: &str, end: &str) -> AppResult<String> {
    Ok(format!("{} - {}", format_12h(start)?, format_12h(end)?))
}

/// Half-open interval overlap on minutes since midnight
pub fn ranges_overlap(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Parse a "YYYY-MM-DD" date. An ISO timestamp is accepted and truncated to its date part.
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    let date_part = match value.split_once('T') {
        Some((date, _)) => date,
        None => value,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidArgument(format!("Invalid date '{}' (use YYYY-MM-DD)", value)))
}

/// ISO weekday of a calendar date
pub fn weekday_of(date: NaiveDate) -> Weekday {
    Weekday::from(date.weekday())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minutes() {
        assert_eq!(to_minutes("00:00").unwrap(), 0);
        assert_eq!(to_minutes("09:30").unwrap(), 570);
        assert_eq!(to_minutes("9:30").unwrap(), 570);
        assert_eq!(to_minutes("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_to_minutes_rejects_bad_input() {
        for bad in ["24:00", "12:60", "1230", "12:5", "ab:cd", "", "123:00", "-1:00"] {
            assert!(
                matches!(to_minutes(bad), Err(AppError::InvalidFormat(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_round_trip_all_times() {
        for minutes in 0..MINUTES_PER_DAY {
            let text = to_time_string(minutes);
            assert_eq!(to_minutes(&text).unwrap(), minutes);
            assert_eq!(to_time_string(to_minutes(&text).unwrap()), text);
        }
    }

    #[test]
    fn test_to_time_string_wraps() {
        assert_eq!(to_time_string(1440), "00:00");
        assert_eq!(to_time_string(1500), "01:00");
    }

    #[test]
    fn test_format_12h() {
        assert_eq!(format_12h("00:00").unwrap(), "12:00 AM");
        assert_eq!(format_12h("12:00").unwrap(), "12:00 PM");
        assert_eq!(format_12h("09:05").unwrap(), "9:05 AM");
        assert_eq!(format_12h("23:45").unwrap(), "11:45 PM");
        assert_eq!(
            format_time_range("09:00", "10:00").unwrap(),
            "9:00 AM - 10:00 AM"
        );
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("09:00", "11:00").unwrap(), (540, 660));
        assert!(matches!(parse_range("11:00", "09:00"), Err(AppError::InvalidRange(_))));
        assert!(matches!(parse_range("10:00", "10:00"), Err(AppError::InvalidRange(_))));
    }

    #[test]
    fn test_overlap() {
        assert!(ranges_overlap((540, 600), (570, 630)));
        assert!(!ranges_overlap((540, 600), (600, 660)));
    }

    #[test]
    fn test_parse_date_and_weekday() {
        let date = parse_date("2024-06-03").unwrap();
        assert_eq!(weekday_of(date), Weekday::Monday);
        assert_eq!(parse_date("2024-06-03T10:00:00.000Z").unwrap(), date);
        assert!(matches!(parse_date("03/06/2024"), Err(AppError::InvalidArgument(_))));
        assert!(matches!(parse_date("2024-02-30"), Err(AppError::InvalidArgument(_))));
    }
}
