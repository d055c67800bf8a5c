//! Human-readable formatting for snapshot values.
//!
//! Numbers are rendered the way a page script would render them, so the
//! strings a consumer sees match what the browser itself would print.

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// Render a number like JavaScript's `String(n)`.
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if value == 0.0 {
        return "0".into();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{:.0}", value);
    }
    format!("{}", value)
}

/// Render a number like JavaScript's `n.toFixed(digits)`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return js_number(value);
    }
    // Collapse -0 so it never prints a sign.
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", digits, value)
}

/// Format a byte count with binary thresholds: B, KB, MB (1 dp), GB (2 dp).
pub fn format_bytes(bytes: f64) -> String {
    if bytes < KIB {
        format!("{} B", js_number(bytes))
    } else if bytes < MIB {
        format!("{} KB", to_fixed(bytes / KIB, 1))
    } else if bytes < GIB {
        format!("{} MB", to_fixed(bytes / MIB, 1))
    } else {
        format!("{} GB", to_fixed(bytes / GIB, 2))
    }
}

/// Format a duration in seconds as `"2h 5m"`, `"2 min"` or `"45s"`.
/// Non-finite durations (the battery API reports `Infinity` for "never")
/// become `"N/A"`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "N/A".into();
    }
    let hours = (seconds / 3600.0).floor();
    let minutes = ((seconds % 3600.0) / 60.0).floor();
    if hours > 0.0 {
        format!("{}h {}m", js_number(hours), js_number(minutes))
    } else if minutes > 0.0 {
        format!("{} min", js_number(minutes))
    } else {
        format!("{}s", js_number(seconds))
    }
}

/// Format a `Date.getTimezoneOffset()` value (minutes *behind* UTC) as
/// `UTC+HH:MM` / `UTC-HH:MM`.
pub fn format_utc_offset(offset_minutes: i32) -> String {
    let sign = if offset_minutes <= 0 { '+' } else { '-' };
    let magnitude = offset_minutes.unsigned_abs();
    format!("UTC{}{:02}:{:02}", sign, magnitude / 60, magnitude % 60)
}
