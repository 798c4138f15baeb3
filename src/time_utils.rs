// SPDX-License-Identifier: MIT

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a date supplied by a form field.
///
/// Accepts either a bare calendar date (`2024-01-01`, interpreted as
/// midnight UTC) or a full RFC3339 timestamp.
pub fn parse_form_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a datetime-local form value (`2024-01-01T18:30`), falling back to
/// RFC3339 and bare dates.
pub fn parse_form_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(dt.and_utc());
    }
    parse_form_date(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_bare_date() {
        let dt = parse_form_date("2024-01-01").unwrap();
        assert_eq!(format_utc_rfc3339(dt), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_form_date("2024-01-01T10:30:00Z").unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_parse_datetime_local() {
        let dt = parse_form_datetime("2024-06-15T18:30").unwrap();
        assert_eq!(format_utc_rfc3339(dt), "2024-06-15T18:30:00Z");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_form_date("not-a-date").is_none());
        assert!(parse_form_datetime("13/01/2024").is_none());
    }
}
