//! Shared parsing utilities for the dataset loaders.
//!
//! Day-first date parsing and count coercion used by the accident loader.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Date formats tried in order. Day-first throughout.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Time formats tried in order.
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// Parses a day-first date (`DD/MM/YYYY`).
#[must_use]
pub fn parse_day_first_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parses a `HH:MM` time of day.
#[must_use]
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

/// Combines a day-first date and an optional time into a timestamp.
///
/// A missing or unparseable time falls back to `00:00`. Returns `None` only
/// when the date itself cannot be parsed.
#[must_use]
pub fn parse_date_time(date: &str, time: Option<&str>) -> Option<NaiveDateTime> {
    let date = parse_day_first_date(date)?;
    let time = time.and_then(parse_time).unwrap_or(NaiveTime::MIN);
    Some(date.and_time(time))
}

/// Parses a non-negative integer count. Accepts float-formatted integers
/// such as `"2.0"`, which spreadsheet exports sometimes produce.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_count(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(v) = s.parse::<u32>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}
