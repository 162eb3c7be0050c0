//! Date parsing and display helpers.
//!
//! The backend is not consistent about timestamp formats: record endpoints
//! return RFC 3339, while log lines carry Python `logging` timestamps
//! (`2024-05-01 10:22:33,123`). Everything is normalized to UTC here and
//! converted to local time only for display.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Naive layouts tried after RFC 3339 / RFC 2822, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S,%3f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a timestamp in any of the formats the backend emits.
///
/// Returns `None` when nothing matches.
#[must_use]
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    parse_date_input(input).map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Parses a `YYYY-MM-DD` date typed into a filter input.
#[must_use]
pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Returns the inclusive UTC bounds covering a whole calendar day.
#[must_use]
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let end = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .map_or(start, |end| Utc.from_utc_datetime(&end));
    (start, end)
}

/// Formats a timestamp as local date and time, e.g. `2024-05-01 12:22`.
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Formats a timestamp as a local date, e.g. `May 01, 2024`.
#[must_use]
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%b %d, %Y").to_string()
}

/// Formats a timestamp relative to `now` ("5 minutes ago").
///
/// Anything older than a week falls back to [`format_date`]. Timestamps in
/// the future (clock skew) read as "just now".
#[must_use]
pub fn format_relative(dt: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*dt);
    let seconds = elapsed.num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }

    let days = elapsed.num_days();
    if days < 7 {
        return plural(days, "day");
    }

    format_date(dt)
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-05-01T10:22:33+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
        assert_eq!(dt.minute(), 22);
    }

    #[test]
    fn test_parse_python_logging_timestamp() {
        let dt = parse_timestamp("2024-05-01 10:22:33,123").unwrap();
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.second(), 33);
        assert_eq!(dt.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_parse_dotted_fraction_and_plain() {
        assert!(parse_timestamp("2024-05-01 10:22:33.456789").is_some());
        assert!(parse_timestamp("2024-05-01 10:22:33").is_some());
        assert!(parse_timestamp("2024-05-01").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[test]
    fn test_day_bounds_cover_whole_day() {
        let date = parse_date_input("2024-02-29").unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start.hour(), 0);
        assert_eq!(end.hour(), 23);
        assert_eq!(end.minute(), 59);
        assert!(end > start);
    }

    #[test]
    fn test_format_relative() {
        let now = parse_timestamp("2024-05-10T12:00:00Z").unwrap();
        assert_eq!(format_relative(&now, now), "just now");
        assert_eq!(
            format_relative(&(now - Duration::minutes(1)), now),
            "1 minute ago"
        );
        assert_eq!(
            format_relative(&(now - Duration::minutes(5)), now),
            "5 minutes ago"
        );
        assert_eq!(
            format_relative(&(now - Duration::hours(3)), now),
            "3 hours ago"
        );
        assert_eq!(format_relative(&(now - Duration::days(2)), now), "2 days ago");
        assert_eq!(
            format_relative(&(now + Duration::minutes(10)), now),
            "just now"
        );
    }

    #[test]
    fn test_format_relative_falls_back_to_date() {
        let now = parse_timestamp("2024-05-30T12:00:00Z").unwrap();
        let old = now - Duration::days(20);
        assert_eq!(format_relative(&old, now), format_date(&old));
    }
}
