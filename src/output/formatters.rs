//! Reusable formatting utilities for CLI output

use chrono::{TimeZone, Utc};

/// Format a Unix timestamp (seconds) as local date/time.
///
/// Returns "N/A" if the timestamp is zero or invalid.
pub fn format_timestamp_secs(secs: i64) -> String {
    if secs <= 0 {
        return "N/A".to_string();
    }

    match Utc.timestamp_opt(secs, 0) {
        chrono::LocalResult::Single(dt) => dt
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        _ => "N/A".to_string(),
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Parse a percentage string like "46%" into a number; junk reads as 0
pub fn parse_percent(raw: &str) -> f32 {
    raw.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0)
}
