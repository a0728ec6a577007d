use chrono::{Duration, Local, NaiveDate, Weekday};
use studynotes::utils::datetime::*;

#[test]
fn test_format_ymd() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    assert_eq!(format_ymd(date), "2025-01-15");
}

#[test]
fn test_is_valid_date() {
    assert!(is_valid_date("2025-02-28"));
    assert!(is_valid_date("2024-02-29")); // leap year
    assert!(!is_valid_date("2025-02-30"));
    assert!(!is_valid_date("25-1-1"));
    assert!(!is_valid_date("2025-01-15 exam"));
    assert!(!is_valid_date(""));
}

#[test]
fn test_reformat_date() {
    assert_eq!(reformat_date("2025-03-10", "%d/%m/%Y"), "10/03/2025");
    // Unparseable input is shown as stored
    assert_eq!(reformat_date("someday", "%d/%m/%Y"), "someday");
}

#[test]
fn test_next_weekday_monday() {
    let friday = NaiveDate::from_ymd_opt(2023, 12, 22).unwrap(); // Friday
    let next_monday = next_weekday(friday, Weekday::Mon);
    assert_eq!(next_monday, NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());
}

#[test]
fn test_next_weekday_same_day() {
    let monday = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap(); // Monday
    let next_monday = next_weekday(monday, Weekday::Mon);
    assert_eq!(next_monday, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()); // 7 days later
}

#[test]
fn test_format_human_date_relative() {
    let today = Local::now().date_naive();
    assert_eq!(format_human_date(&format_ymd(today)), "today");
    assert_eq!(format_human_date(&format_ymd(today + Duration::days(1))), "tomorrow");
    assert_eq!(format_human_date(&format_ymd(today - Duration::days(1))), "yesterday");
    assert_eq!(format_human_date(&format_ymd(today + Duration::days(10))), "in 10 days");
    assert_eq!(format_human_date(&format_ymd(today - Duration::days(10))), "10 days ago");
}

#[test]
fn test_format_today_is_valid() {
    assert!(is_valid_date(&format_today()));
}

#[test]
fn test_format_human_datetime_iso_format() {
    let formatted = format_human_datetime("2025-09-16T09:00:00");
    assert!(formatted.contains("at"));
    assert!(formatted.contains("09:00"));
}
