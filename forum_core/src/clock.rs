use chrono::{DateTime, SecondsFormat, Utc};

// Timestamps are stored as text; a fixed precision and a `Z` suffix keep
// lexical order equal to chronological order.

pub fn now() -> String {
    format(Utc::now())
}

pub fn format(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses any RFC 3339 timestamp and re-renders it in storage form.
pub fn normalize(raw: &str) -> Result<String, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| format(ts.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_converts_offsets_to_utc() {
        assert_eq!(
            normalize("2017-01-01T03:00:00+03:00").unwrap(),
            "2017-01-01T00:00:00.000Z"
        );
        assert_eq!(
            normalize("2017-01-01T00:00:00.5Z").unwrap(),
            "2017-01-01T00:00:00.500Z"
        );
    }

    #[test]
    fn test_normalized_text_orders_chronologically() {
        let first = normalize("2017-01-01T00:00:00.123+00:00").unwrap();
        let second = normalize("2017-01-01T00:00:00.5Z").unwrap();
        let third = normalize("2017-01-01T00:00:01Z").unwrap();
        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize("yesterday").is_err());
    }
}
