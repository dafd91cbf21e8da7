//! Units formatting and conversion utilities
//!
//! Provides the fixed-precision figures used in the summary block and the
//! human-readable sizes and durations used in the environment header.

use std::time::Duration;

use crate::BYTES_PER_MIB;

/// Format bytes into human-readable size with binary units
///
/// # Examples
/// ```
/// use triobench::util::units::format_bytes;
///
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(1048576), "1.0 MiB");
/// assert_eq!(format_bytes(1073741824), "1.0 GiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Signed difference of two byte counters expressed in MiB
///
/// # Examples
/// ```
/// use triobench::util::units::delta_mib;
///
/// assert_eq!(delta_mib(0, 2 * 1024 * 1024), 2.0);
/// assert_eq!(delta_mib(1024 * 1024, 0), -1.0);
/// ```
pub fn delta_mib(start: u64, end: u64) -> f64 {
    (end as f64 - start as f64) / BYTES_PER_MIB
}

/// Two-decimal rendering used for every figure in the summary
pub fn format_fixed(value: f64) -> String {
    format!("{:.2}", value)
}

/// Render an optional resource limit given in seconds
///
/// # Examples
/// ```
/// use triobench::util::units::format_seconds_limit;
///
/// assert_eq!(format_seconds_limit(None), "unlimited");
/// assert_eq!(format_seconds_limit(Some(90)), "1m 30s");
/// ```
pub fn format_seconds_limit(limit: Option<u64>) -> String {
    match limit {
        Some(secs) => humantime::format_duration(Duration::from_secs(secs)).to_string(),
        None => "unlimited".to_string(),
    }
}

/// Render an optional resource limit given in bytes
pub fn format_bytes_limit(limit: Option<u64>) -> String {
    match limit {
        Some(bytes) => format_bytes(bytes),
        None => "unlimited".to_string(),
    }
}

/// Format a duration for log lines
pub fn format_duration(duration: Duration) -> String {
    // humantime prints every unit down to nanoseconds; milliseconds are enough here
    let millis = Duration::from_millis(duration.as_millis() as u64);
    humantime::format_duration(millis).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.0 KiB");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(450000), "439.5 KiB");
        assert_eq!(format_bytes(1073741824), "1.0 GiB");
        assert_eq!(format_bytes(u64::MAX), "16.0 EiB");
    }

    #[test]
    fn test_delta_mib() {
        assert_eq!(delta_mib(0, 0), 0.0);
        assert_eq!(delta_mib(1024 * 1024, 3 * 1024 * 1024), 2.0);
        assert!(delta_mib(5, 1) < 0.0);
        assert!(delta_mib(u64::MAX, 0).is_finite());
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(0.0), "0.00");
        assert_eq!(format_fixed(12.346), "12.35");
        assert_eq!(format_fixed(-1.5), "-1.50");
        assert_eq!(format_fixed(832.0), "832.00");
    }

    #[test]
    fn test_limits() {
        assert_eq!(format_seconds_limit(Some(30)), "30s");
        assert_eq!(format_seconds_limit(Some(3600)), "1h");
        assert_eq!(format_bytes_limit(None), "unlimited");
        assert_eq!(format_bytes_limit(Some(128 * 1024 * 1024)), "128.0 MiB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1s 500ms");
        assert_eq!(format_duration(Duration::from_micros(2500)), "2ms");
    }
}
