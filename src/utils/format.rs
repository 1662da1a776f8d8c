//! Human-readable time formatting

use std::time::Duration;

/// Seconds in one minute, the coarse adjustment step
pub const MINUTE_IN_SECONDS: u64 = 60;
/// The fine adjustment step
pub const SECOND: u64 = 1;

/// Format a countdown as `MM:SS`
///
/// Both fields are zero-padded to two digits; minutes past 99 print in full.
pub fn format_clock(seconds: u64) -> String {
    let minutes = seconds / MINUTE_IN_SECONDS;
    let seconds = seconds % MINUTE_IN_SECONDS;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Format an elapsed duration such as `1h 2m 3s`, dropping leading zero units
pub fn format_uptime(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(599), "09:59");
        assert_eq!(format_clock(3599), "59:59");
    }

    #[test]
    fn clock_keeps_large_minutes() {
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn uptime_drops_leading_units() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "1h 2m 3s");
    }
}
