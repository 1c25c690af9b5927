//! Time helpers

use chrono::{DateTime, TimeZone, Utc};

/// Current time as epoch milliseconds (order dates)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time as an RFC 3339 string (account creation stamps)
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Render epoch milliseconds as an RFC 3339 string, for report rows
pub fn millis_to_rfc3339(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt: DateTime<Utc>| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_roundtrip() {
        let rendered = millis_to_rfc3339(0).unwrap();
        assert!(rendered.starts_with("1970-01-01T00:00:00"));
    }

    #[test]
    fn test_now_millis_is_positive() {
        assert!(now_millis() > 0);
    }
}
