//! Timestamp helpers.
//!
//! Timestamps travel as Unix milliseconds; they are only turned into
//! calendar time for display.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Offset used for display (JST, UTC+9).
pub const DISPLAY_OFFSET_SECS: i32 = 9 * 3600;

/// Current Unix timestamp in milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

fn to_display_datetime(millis: i64) -> Option<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&display_offset()))
}

/// Convert Unix milliseconds to an RFC 3339 string in the display offset.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(millis: i64) -> String {
    to_display_datetime(millis)
        .unwrap_or_else(|| DateTime::<Utc>::default().with_timezone(&display_offset()))
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, false)
}

/// Format Unix milliseconds as `HH:MM:SS` in the display offset.
pub fn format_time_of_day(millis: i64) -> String {
    match to_display_datetime(millis) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}
