use chrono::{DateTime, NaiveDateTime, Utc};

/// Get the current time as a UTC datetime.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a result-file timestamp into a UTC datetime.
///
/// Supports:
/// - RFC 3339 / ISO 8601 with offset (e.g. `"2026-02-08T05:00:00.000Z"`)
/// - Naive ISO 8601, assumed UTC (e.g. `"2026-02-08T05:00:00.123456"`)
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Human-readable stamp used in playlist headers.
pub fn format_header(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2026-02-08T05:00:00.000Z").unwrap();
        assert_eq!(dt.timestamp(), 1770526800);
    }

    #[test]
    fn test_parse_naive_iso() {
        let dt = parse_timestamp("2026-02-08T05:00:00.250000").unwrap();
        assert_eq!(dt.timestamp(), 1770526800);

        let dt = parse_timestamp("2026-02-08T05:00:00").unwrap();
        assert_eq!(dt.timestamp(), 1770526800);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_timestamp("not-a-timestamp").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("1770526800").is_none());
    }

    #[test]
    fn test_format_header() {
        let dt = parse_timestamp("2026-02-08T05:00:00Z").unwrap();
        assert_eq!(format_header(&dt), "2026-02-08 05:00:00");
    }
}
