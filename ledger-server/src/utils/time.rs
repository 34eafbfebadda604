//! Time helpers — business-timezone conversions
//!
//! Date→timestamp conversion happens above the repository layer; the
//! repositories only see `i64` Unix millis and ISO dates.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::invalid(format!("Invalid date format: {}", date)))
}

/// Parse an HH:MM time-of-day string, falling back to 00:00
pub fn parse_hhmm(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse time-of-day '{}': {}, falling back to 00:00",
            value,
            e
        );
        NaiveTime::MIN
    })
}

/// Parse a first-day-of-week name (mon..sun), falling back to Monday
pub fn parse_weekday(value: &str) -> Weekday {
    value.parse().unwrap_or_else(|_| {
        tracing::warn!(
            "Failed to parse first day of week '{}', falling back to Monday",
            value
        );
        Weekday::Mon
    })
}

/// Date + hour/minute/second → Unix millis in the business timezone.
///
/// DST gap fallback: when the local time does not exist, fall back to UTC.
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, sec).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of day (00:00:00) → Unix millis in the business timezone
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// End of day → next day 00:00:00 Unix millis; callers use `< end`
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

/// Calendar date of a Unix-millis timestamp in the business timezone
pub fn millis_to_date(millis: i64, tz: Tz) -> NaiveDate {
    use chrono::TimeZone;
    tz.timestamp_millis_opt(millis)
        .latest()
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| chrono::Utc::now().with_timezone(&tz).date_naive())
}

/// First day of the week containing `date`, for a configurable week start
pub fn start_of_week(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() as i64
        - first_day.num_days_from_monday() as i64)
        % 7;
    date - Duration::days(offset)
}

/// Weekly period containing `date`: (start, start + 6 days)
pub fn week_period(date: NaiveDate, first_day: Weekday) -> (NaiveDate, NaiveDate) {
    let start = start_of_week(date, first_day);
    (start, start + Duration::days(6))
}

/// Whole minutes between two Unix-millis timestamps
pub fn minutes_between(start_millis: i64, end_millis: i64) -> i64 {
    (end_millis - start_millis) / 60_000
}

/// Truncate a Unix-millis timestamp to the minute
pub fn truncate_to_minute(millis: i64) -> i64 {
    millis - millis.rem_euclid(60_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn week_start_honors_configured_first_day() {
        // 2024-01-03 is a Wednesday
        assert_eq!(start_of_week(d("2024-01-03"), Weekday::Mon), d("2024-01-01"));
        assert_eq!(start_of_week(d("2024-01-03"), Weekday::Sun), d("2023-12-31"));
        // A date on the week start maps to itself
        assert_eq!(start_of_week(d("2024-01-01"), Weekday::Mon), d("2024-01-01"));
        assert_eq!(start_of_week(d("2023-12-31"), Weekday::Sun), d("2023-12-31"));
    }

    #[test]
    fn week_period_spans_seven_days() {
        let (start, end) = week_period(d("2024-01-03"), Weekday::Mon);
        assert_eq!(start, d("2024-01-01"));
        assert_eq!(end, d("2024-01-07"));
    }

    #[test]
    fn minutes_and_minute_truncation() {
        assert_eq!(minutes_between(0, 90 * 60_000), 90);
        assert_eq!(truncate_to_minute(61_500), 60_000);
    }

    #[test]
    fn hhmm_parsing_falls_back_to_midnight() {
        assert_eq!(parse_hhmm("17:30"), NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert_eq!(parse_hhmm("not-a-time"), NaiveTime::MIN);
    }
}
