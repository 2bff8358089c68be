/*
 * format.rs
 *
 * Remaining time as "<days>日 HH:MM:SS". Whole seconds only, truncated.
 * The day count is not padded and grows without bound.
 */

use std::time::Duration;

const SECS_PER_DAY: u64 = 86_400;

/// Render remaining time for display.
///
/// Sub-second precision is dropped by truncation, so 59.9s left shows as
/// `00:00:59`.
///
/// ```
/// use countdown_timer::format::format_remaining;
/// use std::time::Duration;
///
/// assert_eq!(format_remaining(Duration::ZERO), "0日 00:00:00");
/// assert_eq!(format_remaining(Duration::from_secs(3661)), "0日 01:01:01");
/// assert_eq!(format_remaining(Duration::from_secs(90_000)), "1日 01:00:00");
/// ```
#[must_use]
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    let days = secs / SECS_PER_DAY;
    let of_day = secs % SECS_PER_DAY;

    format!(
        "{days}日 {:02}:{:02}:{:02}",
        of_day / 3600,
        (of_day % 3600) / 60,
        of_day % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_remaining(Duration::ZERO), "0日 00:00:00");
    }

    #[test]
    fn test_hours_minutes_seconds() {
        assert_eq!(format_remaining(Duration::from_secs(3661)), "0日 01:01:01");
        assert_eq!(format_remaining(Duration::from_secs(86_399)), "0日 23:59:59");
    }

    #[test]
    fn test_days_roll_over() {
        assert_eq!(format_remaining(Duration::from_secs(86_400)), "1日 00:00:00");
        assert_eq!(format_remaining(Duration::from_secs(90_000)), "1日 01:00:00");
        assert_eq!(
            format_remaining(Duration::from_secs(400 * 86_400 + 5)),
            "400日 00:00:05"
        );
    }

    #[test]
    fn test_fraction_truncates() {
        assert_eq!(format_remaining(Duration::from_millis(59_900)), "0日 00:00:59");
        assert_eq!(format_remaining(Duration::from_millis(999)), "0日 00:00:00");
        assert_eq!(
            format_remaining(Duration::from_millis(3_661_950)),
            "0日 01:01:01"
        );
    }
}
