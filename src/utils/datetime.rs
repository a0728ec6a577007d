//! Date and time helpers.
//!
//! Study plan dates travel as plain `YYYY-MM-DD` strings and note creation
//! times as RFC3339 timestamps. Both are shown relative to today in the lists
//! ("yesterday", "today", "in 12 days", ...).

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use std::fmt::Write;

/// Date format stored in the `study_plan.date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp layouts accepted besides RFC3339
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
}

/// Whether `date_str` is a real calendar date written exactly as `YYYY-MM-DD`.
///
/// `2025-02-30` and `25-1-1` are rejected, as is anything with surrounding text.
pub fn is_valid_date(date_str: &str) -> bool {
    date_str.len() == 10 && parse_date(date_str).is_ok()
}

pub fn format_ymd(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Today's local date as `YYYY-MM-DD`
pub fn format_today() -> String {
    format_ymd(Local::now().date_naive())
}

/// Render a stored date with another chrono format string.
///
/// Dates that do not parse are returned unchanged.
pub fn reformat_date(date_str: &str, format: &str) -> String {
    parse_date(date_str)
        .map(|date| date.format(format).to_string())
        .unwrap_or_else(|_| date_str.to_string())
}

/// Whether `format` renders a date without error.
pub fn is_valid_output_format(format: &str) -> bool {
    let mut out = String::new();
    write!(out, "{}", NaiveDate::MIN.format(format)).is_ok()
}

/// The first `target` weekday strictly after `from`.
pub fn next_weekday(from: NaiveDate, target: Weekday) -> NaiveDate {
    let ahead = (target.num_days_from_monday() as i64 - from.weekday().num_days_from_monday() as i64).rem_euclid(7);
    from + Duration::days(if ahead == 0 { 7 } else { ahead })
}

/// Describe a `YYYY-MM-DD` date relative to today.
///
/// Within a week the weekday is named ("next Friday", "last Monday"), within
/// a month the distance in days is given, and anything further shows the
/// month and day, plus the year when it is not the current one.
pub fn format_human_date(date_str: &str) -> String {
    match parse_date(date_str) {
        Ok(date) => describe_relative(date, Local::now().date_naive()),
        Err(_) => date_str.to_string(),
    }
}

fn describe_relative(date: NaiveDate, today: NaiveDate) -> String {
    let days = (date - today).num_days();
    let weekday = weekday_name(date.weekday());

    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        2..=7 => format!("next {}", weekday),
        -7..=-2 => format!("last {}", weekday),
        8..=30 => format!("in {} days", days),
        -30..=-8 => format!("{} days ago", -days),
        _ if date.year() == today.year() => date.format("%b %d").to_string(),
        _ => date.format("%b %d, %Y").to_string(),
    }
}

/// Describe a creation timestamp as "<relative date> at HH:MM" in local time.
///
/// Strings that are not timestamps fall back to [`format_human_date`].
pub fn format_human_datetime(datetime_str: &str) -> String {
    match parse_timestamp(datetime_str) {
        Some(local) => format!(
            "{} at {}",
            describe_relative(local.date_naive(), Local::now().date_naive()),
            local.format("%H:%M")
        ),
        None => format_human_date(datetime_str),
    }
}

/// RFC3339 (as stored by the backend) or a naive local timestamp.
fn parse_timestamp(value: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local));
    }

    NAIVE_TIMESTAMP_FORMATS.iter().find_map(|format| {
        let naive = NaiveDateTime::parse_from_str(value, format).ok()?;
        Some(
            Local
                .from_local_datetime(&naive)
                .single()
                .unwrap_or_else(|| Local.from_utc_datetime(&naive)),
        )
    })
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
