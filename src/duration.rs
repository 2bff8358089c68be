/*
 * duration.rs
 *
 * Parse "90", "1:30", "1:02:03", "25m", "1h2m3s". Whole-string match, ASCII
 * digits only, lower-case units, units in h/m/s order and each at most once.
 * No partial parses: "5x" is an error even though "5" is a number.
 *
 * Two steps. split_fields() decides if the text is one of the accepted
 * shapes and picks out the digit runs; to_seconds() does the arithmetic.
 * Checked math all the way, the result must fit in u64 nanoseconds.
 */

use std::time::Duration;

use crate::error::{Result, TimerError};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3600;

/* remaining time is kept in u64 nanoseconds - ~584 years is the ceiling */
pub const MAX_SECONDS: u64 = u64::MAX / 1_000_000_000;

/* digit runs for each unit, None when the unit is absent */
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Fields<'a> {
    hours: Option<&'a str>,
    minutes: Option<&'a str>,
    seconds: Option<&'a str>,
}

/// True if `input` is one of the accepted duration shapes.
///
/// Says nothing about magnitude: `"99999999999999999999"` is well formed
/// but [`parse_seconds`] rejects it as too large.
///
/// ```
/// use countdown_timer::duration::is_valid_duration;
///
/// assert!(is_valid_duration("25m"));
/// assert!(is_valid_duration("1:02:03"));
/// assert!(!is_valid_duration("5x"));
/// assert!(!is_valid_duration("1s2m"));
/// ```
#[must_use]
pub fn is_valid_duration(input: &str) -> bool {
    split_fields(input).is_some()
}

/// Parse a duration string into whole seconds.
///
/// # Examples
///
/// ```
/// use countdown_timer::duration::parse_seconds;
///
/// assert_eq!(parse_seconds("90").unwrap(), 90);
/// assert_eq!(parse_seconds("1:30").unwrap(), 90);
/// assert_eq!(parse_seconds("1:02:03").unwrap(), 3723);
/// assert_eq!(parse_seconds("25m").unwrap(), 1500);
/// assert_eq!(parse_seconds("1h2m3s").unwrap(), 3723);
/// assert!(parse_seconds("5x").is_err());
/// assert!(parse_seconds("").is_err());
/// ```
///
/// # Errors
///
/// `InvalidDuration` when the text matches none of the accepted shapes,
/// `DurationOverflow` when the total does not fit.
pub fn parse_seconds(input: &str) -> Result<u64> {
    let fields = split_fields(input).ok_or_else(|| {
        TimerError::InvalidDuration(format!(
            "'{input}' (expected N, M:S, H:M:S or a mix of Nh, Nm, Ns like 1h2m3s)"
        ))
    })?;

    to_seconds(fields)
}

/// [`parse_seconds`] as a `Duration`.
///
/// # Errors
///
/// Same as [`parse_seconds`].
pub fn parse_duration(input: &str) -> Result<Duration> {
    parse_seconds(input).map(Duration::from_secs)
}

fn split_fields(input: &str) -> Option<Fields<'_>> {
    if is_digits(input) {
        return Some(Fields {
            seconds: Some(input),
            ..Fields::default()
        });
    }

    if input.contains(':') {
        split_clock(input)
    } else {
        split_units(input)
    }
}

/* "M:S" or "H:M:S" */
fn split_clock(input: &str) -> Option<Fields<'_>> {
    let mut parts = input.split(':');
    let first = parts.next()?;
    let second = parts.next()?;
    let third = parts.next();

    if parts.next().is_some() {
        return None;
    }

    match third {
        None if is_digits(first) && is_digits(second) => Some(Fields {
            hours: None,
            minutes: Some(first),
            seconds: Some(second),
        }),
        Some(third) if is_digits(first) && is_digits(second) && is_digits(third) => {
            Some(Fields {
                hours: Some(first),
                minutes: Some(second),
                seconds: Some(third),
            })
        }
        _ => None,
    }
}

/* "Nh", "Nm", "Ns" and their ordered combinations */
fn split_units(input: &str) -> Option<Fields<'_>> {
    let mut fields = Fields::default();
    let mut rest = input;
    /* h=1, m=2, s=3; each unit must outrank the previous one */
    let mut last_rank = 0u8;

    while !rest.is_empty() {
        /* digits without a unit at the end ("1h30") never match */
        let unit_at = rest.bytes().position(|b| !b.is_ascii_digit())?;
        if unit_at == 0 {
            return None;
        }

        let (digits, tail) = rest.split_at(unit_at);
        let (rank, slot) = match tail.as_bytes()[0] {
            b'h' => (1, &mut fields.hours),
            b'm' => (2, &mut fields.minutes),
            b's' => (3, &mut fields.seconds),
            _ => return None,
        };

        if rank <= last_rank {
            return None;
        }

        *slot = Some(digits);
        last_rank = rank;
        /* unit is a single ASCII byte, so index 1 is a char boundary */
        rest = &tail[1..];
    }

    (last_rank > 0).then_some(fields)
}

fn to_seconds(fields: Fields<'_>) -> Result<u64> {
    let hours = weighted(fields.hours, SECS_PER_HOUR)?;
    let minutes = weighted(fields.minutes, SECS_PER_MINUTE)?;
    let seconds = weighted(fields.seconds, 1)?;

    let total = hours
        .checked_add(minutes)
        .and_then(|t| t.checked_add(seconds))
        .ok_or(TimerError::DurationOverflow)?;

    if total > MAX_SECONDS {
        return Err(TimerError::DurationOverflow);
    }

    Ok(total)
}

/* digits are already validated, so a parse failure can only be overflow */
fn weighted(digits: Option<&str>, weight: u64) -> Result<u64> {
    let Some(digits) = digits else {
        return Ok(0);
    };

    digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(weight))
        .ok_or(TimerError::DurationOverflow)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
