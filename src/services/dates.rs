//! Display normalization for dates of uncertain shape.
//!
//! Form fields and backend records carry dates as `dd/MM/yyyy` strings,
//! ISO timestamps, or the output of a browser's `Date.toString()`. Everything
//! is normalized to `dd/MM/yyyy` before it is sent back.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;

/// Output for inputs that do not name a real calendar date.
pub const INVALID_DATE: &str = "Invalid Date";

/// Display format used by the backend.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Day-first input, which must never be read month-first.
static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap());

/// Trailing zone name in `Date.toString()` output, e.g. ` (Indochina Time)`.
static ZONE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap());

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%a %b %d %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// A date value or a string that may contain one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(&'a str),
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        DateInput::DateTime(dt)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput<'_> {
    fn from(dt: DateTime<Tz>) -> Self {
        DateInput::DateTime(dt.naive_local())
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(s: &'a str) -> Self {
        DateInput::Text(s)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(s: &'a String) -> Self {
        DateInput::Text(s.as_str())
    }
}

/// Format any date-like input as `dd/MM/yyyy`, or [`INVALID_DATE`].
pub fn parse_flexible_date<'a>(input: impl Into<DateInput<'a>>) -> String {
    let date = match input.into() {
        DateInput::Date(date) => Some(date),
        DateInput::DateTime(dt) => Some(dt.date()),
        DateInput::Text(text) if DAY_FIRST.is_match(text) => {
            NaiveDate::parse_from_str(text, DISPLAY_FORMAT).ok()
        }
        DateInput::Text(text) => parse_free_form(text),
    };

    match date {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Best-effort parse of the formats browsers and the backend produce.
///
/// Zoned timestamps keep the calendar date of their own offset.
fn parse_free_form(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }

    let without_zone = ZONE_NAME.replace(text, "");
    if let Ok(dt) = DateTime::parse_from_str(&without_zone, "%a %b %d %Y %H:%M:%S GMT%z") {
        return Some(dt.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}
