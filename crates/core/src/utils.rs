use std::time::Duration;

use chrono::{DateTime, Local};

/// Formats the run timestamp shown in the report metadata block
pub fn format_run_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Two-decimal money display
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Elapsed time in seconds at four decimals
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.4} seconds", elapsed.as_secs_f64())
}

/// Replaces control characters so a value cannot break a table row
pub fn sanitize_cell(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Truncates or pads `value` to exactly `width` characters
pub fn fit_column(value: &str, width: usize) -> String {
    let sanitized = sanitize_cell(value);
    let truncated: String = sanitized.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}
