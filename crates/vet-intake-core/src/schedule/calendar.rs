//! Date and weekday resolution for intake and schedule dates.
//!
//! Dates are stored as `YYYY-MM-DD` strings. Full RFC 3339 timestamps and
//! naive `YYYY-MM-DDTHH:MM[:SS]` values are also accepted; a naive value is
//! read as UTC.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Weekday};

/// Sort key for undated or unparsable dates: after everything else.
pub const UNDATED_KEY: i64 = i64::MAX;

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// A parsed date string: the calendar date it names and its instant in
/// epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParsedDate {
    date: NaiveDate,
    epoch_millis: i64,
}

fn parse(value: &str) -> Option<ParsedDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        let epoch_millis = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis();
        return Some(ParsedDate { date, epoch_millis });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(ParsedDate {
            date: dt.date_naive(),
            epoch_millis: dt.timestamp_millis(),
        });
    }

    NAIVE_DATETIME_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .map(|dt| ParsedDate {
                date: dt.date(),
                epoch_millis: dt.and_utc().timestamp_millis(),
            })
    })
}

/// Parse a date string to its calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse(value).map(|parsed| parsed.date)
}

/// Monotonic sort key for a date string. Empty or unparsable input maps to
/// [`UNDATED_KEY`] so it sorts last in ascending order.
pub fn orderable_instant(value: &str) -> i64 {
    parse(value)
        .map(|parsed| parsed.epoch_millis)
        .unwrap_or(UNDATED_KEY)
}

/// Weekday of the calendar date named by `value`, or `None` if unparsable.
pub fn weekday_of(value: &str) -> Option<Weekday> {
    parse(value).map(|parsed| parsed.date.weekday())
}

/// Sunday-first weekday ordinal (0 = Sunday .. 6 = Saturday).
pub fn weekday_index(weekday: Weekday) -> u32 {
    weekday.num_days_from_sunday()
}

/// Inverse of [`weekday_index`]; `None` outside `0..=6`.
pub fn weekday_from_index(index: i64) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_short_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

/// Format a calendar date in the stored `YYYY-MM-DD` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's date on the local calendar, for defaulting intake forms.
pub fn today() -> String {
    format_date(Local::now().date_naive())
}
