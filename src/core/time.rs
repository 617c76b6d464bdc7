//! Time and size formatting for the monitoring views.
//! Playback positions are plain seconds (f64), as reported by the media host.

use chrono::{DateTime, TimeZone};

/// Playback position or duration in seconds
pub type Seconds = f64;

/// Conversion constants
pub mod constants {
    pub const SECONDS_PER_MINUTE: u64 = 60;
    pub const SECONDS_PER_HOUR: u64 = 3600;
    pub const BYTES_PER_KIB: f64 = 1024.0;
}

/// Units used by [`format_file_size`], smallest first
const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Whole seconds of a position; non-finite and non-positive values count as zero
#[inline]
fn whole_seconds(seconds: Seconds) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}

/// Format a position as `mm:ss`.
///
/// Minutes are not wrapped into hours, so a 75 minute position reads `75:00`.
/// Unknown (NaN), zero and negative positions render as `00:00`.
pub fn format_clock(seconds: Seconds) -> String {
    let total = whole_seconds(seconds);
    let minutes = total / constants::SECONDS_PER_MINUTE;
    let secs = total % constants::SECONDS_PER_MINUTE;
    format!("{:02}:{:02}", minutes, secs)
}

/// Format a clip length, adding an hour field only when needed
/// (`05:07` or `01:02:03`).
pub fn format_duration(seconds: Seconds) -> String {
    let total = whole_seconds(seconds);
    let hours = total / constants::SECONDS_PER_HOUR;
    let minutes = (total % constants::SECONDS_PER_HOUR) / constants::SECONDS_PER_MINUTE;
    let secs = total % constants::SECONDS_PER_MINUTE;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Format a byte count with binary (1024) steps, e.g. `1.5 KB`.
///
/// The value is rounded to two decimals and trailing zeros are dropped,
/// so exactly 1024 bytes reads `1 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= constants::BYTES_PER_KIB && unit < SIZE_UNITS.len() - 1 {
        value /= constants::BYTES_PER_KIB;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Format a unix timestamp (seconds, possibly fractional) in the given zone
/// as `YYYY-MM-DD HH:MM:SS`. Returns `None` when the timestamp is out of range.
pub fn format_created<Tz: TimeZone>(unix: f64, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    if !unix.is_finite() {
        return None;
    }
    let secs = unix.floor() as i64;
    let nanos = ((unix - unix.floor()) * 1e9) as u32;
    let utc = DateTime::from_timestamp(secs, nanos)?;
    Some(utc.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string())
}

/// [`format_created`] in the machine's local zone
pub fn format_created_local(unix: f64) -> String {
    format_created(unix, &chrono::Local).unwrap_or_else(|| "N/A".to_string())
}
