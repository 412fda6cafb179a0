//! Number and duration formatting for command-line output.
//!
//! Split summaries and zone listings go through these helpers so every front
//! end prints counts and durations the same way.

/// Format a count with `,` thousands separators.
///
/// # Examples
/// ```
/// use netlog_types::formatting::format_thousands;
/// assert_eq!(format_thousands(0), "0");
/// assert_eq!(format_thousands(1_500), "1,500");
/// assert_eq!(format_thousands(1_500_000), "1,500,000");
/// ```
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format `part / total` as a percentage with one decimal place.
///
/// Returns `"0%"` when `total` is zero.
///
/// # Examples
/// ```
/// use netlog_types::formatting::format_pct_ratio;
/// assert_eq!(format_pct_ratio(3, 10), "30.0%");
/// assert_eq!(format_pct_ratio(0, 0), "0%");
/// ```
pub fn format_pct_ratio(part: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", part as f64 / total as f64 * 100.0)
}

/// Format a duration in seconds as `M:SS`, or `H:MM:SS` past an hour.
///
/// Negative durations (out-of-order timestamps) clamp to zero.
///
/// # Examples
/// ```
/// use netlog_types::formatting::format_duration;
/// assert_eq!(format_duration(125), "2:05");
/// assert_eq!(format_duration(3_725), "1:02:05");
/// ```
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(12_345), "12,345");
        assert_eq!(format_thousands(123_456), "123,456");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_pct_ratio() {
        assert_eq!(format_pct_ratio(1, 3), "33.3%");
        assert_eq!(format_pct_ratio(10, 10), "100.0%");
        assert_eq!(format_pct_ratio(5, 0), "0%");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(60), "1:00");
        assert_eq!(format_duration(3_600), "1:00:00");
        assert_eq!(format_duration(-5), "0:00");
    }
}
