//! Timestamp normalization and numeric helpers shared by the projector.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Reduce an API timestamp to its calendar date.
///
/// Accepts:
/// - RFC3339 datetime -> YYYY-MM-DD (date in the timestamp's own offset)
/// - Naive datetime YYYY-MM-DDTHH:MM:SS -> YYYY-MM-DD
/// - YYYY-MM-DD (returned as-is)
pub fn date_only(s: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.date().format("%Y-%m-%d").to_string());
    }
    if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
        return Some(s.to_string());
    }
    None
}

/// Normalize an API timestamp to ISO-8601 with second precision.
///
/// RFC3339 input is converted to UTC (`2024-05-01T06:30:00Z`); naive input
/// keeps its wall-clock value without an offset.
pub fn iso_timestamp(s: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.format("%Y-%m-%dT%H:%M:%S").to_string());
    }
    None
}

/// Round to two decimals, the precision used for every converted column.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
