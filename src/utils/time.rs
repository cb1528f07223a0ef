use chrono::{DateTime, Utc};

/// Returns current timestamp in nanoseconds (Unix epoch)
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

/// Calendar date of a nanosecond timestamp, e.g. `2024-03-05`.
pub fn format_date(timestamp_ns: i64) -> String {
    DateTime::from_timestamp_nanos(timestamp_ns)
        .format("%Y-%m-%d")
        .to_string()
}
