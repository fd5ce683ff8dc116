//! Parsing of user-supplied expiration timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses an expiration timestamp.
///
/// Accepts RFC 3339 (`2025-01-01T12:00:00Z`, `...+02:00`). Timestamps without
/// an offset and bare dates are read as UTC; a bare date means midnight.
///
/// Returns `None` if the input matches none of these forms.
pub fn parse_expires_at(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_utc() {
        assert_eq!(
            parse_expires_at("2030-05-01T10:30:00Z"),
            Some(Utc.with_ymd_and_hms(2030, 5, 1, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_rfc3339_with_millis() {
        let parsed = parse_expires_at("2030-05-01T10:30:00.000Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 5, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_offset_is_converted() {
        assert_eq!(
            parse_expires_at("2030-05-01T12:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2030, 5, 1, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_naive_is_utc() {
        assert_eq!(
            parse_expires_at("2030-05-01T10:30"),
            Some(Utc.with_ymd_and_hms(2030, 5, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(
            parse_expires_at("2030-05-01 10:30:15"),
            Some(Utc.with_ymd_and_hms(2030, 5, 1, 10, 30, 15).unwrap())
        );
    }

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        assert_eq!(
            parse_expires_at("2030-05-01"),
            Some(Utc.with_ymd_and_hms(2030, 5, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_expires_at("tomorrow"), None);
        assert_eq!(parse_expires_at("2030-13-45"), None);
        assert_eq!(parse_expires_at(""), None);
    }
}
