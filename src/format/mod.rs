//! Human-readable value formatting for panel values.

const BYTE_UNITS: &[&str] = &["KB", "MB", "GB", "TB"];
const BIT_RATE_UNITS: &[&str] = &["Kbps", "Mbps", "Gbps", "Tbps"];

/// Smallest magnitude shown after scaling.
const MIN_DISPLAY: f64 = 0.1;

/// Divide by `base` at least once and until below `base` or out of units.
fn scale(value: f64, base: f64, units: &[&'static str]) -> (f64, &'static str) {
    let mut scaled = value / base;
    let mut index = 0;
    while scaled >= base && index + 1 < units.len() {
        scaled /= base;
        index += 1;
    }
    (scaled.max(MIN_DISPLAY), units[index])
}

/// Format a byte count with 1024-based units, e.g. `"1.50 KB"`.
///
/// Zero and non-finite values render as `"-"`. Values below 1 KB
/// still render in KB, floored at `0.10 KB`.
///
/// ```
/// use promdash::format::format_bytes;
///
/// assert_eq!(format_bytes(1536.0), "1.50 KB");
/// assert_eq!(format_bytes(3.0 * 1024.0 * 1024.0 * 1024.0), "3.00 GB");
/// assert_eq!(format_bytes(0.0), "-");
/// ```
#[must_use]
pub fn format_bytes(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "-".to_string();
    }
    let (scaled, unit) = scale(value, 1024.0, BYTE_UNITS);
    format!("{scaled:.2} {unit}")
}

/// Format a rate with 1000-based units, e.g. `"2.50 Mbps"`.
///
/// Zero renders as `"0"`, non-finite values as `"-"`.
///
/// ```
/// use promdash::format::format_bit_rate;
///
/// assert_eq!(format_bit_rate(2_500_000.0), "2.50 Mbps");
/// assert_eq!(format_bit_rate(0.0), "0");
/// ```
#[must_use]
pub fn format_bit_rate(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return "-".to_string();
    }
    let (scaled, unit) = scale(value, 1000.0, BIT_RATE_UNITS);
    format!("{scaled:.2} {unit}")
}
