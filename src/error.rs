/*
 * error.rs
 *
 * Exit codes are part of the interface. People chain this with
 * `countdown 25m && play alarm.wav`, so 0 must mean "time is up" and
 * nothing else. A manual stop is 1 so the alarm does not fire.
 */

use std::io;

use thiserror::Error;

/// exit codes. shell scripts branch on these, don't change them.
pub mod exit_codes {
    /// Countdown reached zero
    pub const EXPIRED: u8 = 0;
    /// Stopped from the keyboard (`s` or `q`)
    pub const STOPPED: u8 = 1;
    /// Bad command line, same code clap uses for its own errors
    pub const USAGE: u8 = 2;
    /// The timer itself failed (tty setup, thread spawn, faulted loop)
    pub const INTERNAL_ERROR: u8 = 3;
    /// SIGINT, 128 + 2 like every shell reports it
    pub const INTERRUPTED: u8 = 130;
}

/* everything that can go wrong */
#[derive(Debug, Error)]
pub enum TimerError {
    #[error("missing duration")]
    MissingDuration,
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
    #[error("invalid duration: value too large")]
    DurationOverflow,
    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),
    #[error("failed to spawn {0} thread: {1}")]
    Spawn(&'static str, #[source] io::Error),
    #[error("failed to install interrupt handler: {0}")]
    Interrupt(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl TimerError {
    /* configuration errors are usage errors, the rest is on us */
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::MissingDuration | Self::InvalidDuration(_) | Self::DurationOverflow => {
                exit_codes::USAGE
            }
            Self::Terminal(_) | Self::Spawn(..) | Self::Interrupt(_) | Self::Internal(_) => {
                exit_codes::INTERNAL_ERROR
            }
        }
    }

    /// True for errors caused by the command line rather than the runtime.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        self.exit_code() == exit_codes::USAGE
    }
}

pub type Result<T> = core::result::Result<T, TimerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_exit_2() {
        assert_eq!(TimerError::MissingDuration.exit_code(), exit_codes::USAGE);
        assert_eq!(
            TimerError::InvalidDuration("5x".to_string()).exit_code(),
            exit_codes::USAGE
        );
        assert_eq!(TimerError::DurationOverflow.exit_code(), exit_codes::USAGE);
        assert!(TimerError::MissingDuration.is_usage());
    }

    #[test]
    fn test_runtime_errors_are_internal() {
        let err = TimerError::Terminal(io::Error::other("tcgetattr"));
        assert_eq!(err.exit_code(), exit_codes::INTERNAL_ERROR);
        assert!(!err.is_usage());

        let err = TimerError::Internal("ticker thread panicked".to_string());
        assert_eq!(err.exit_code(), exit_codes::INTERNAL_ERROR);
    }

    #[test]
    fn test_display_mentions_input() {
        let msg = TimerError::InvalidDuration("'5x'".to_string()).to_string();
        assert!(msg.contains("invalid duration"));
        assert!(msg.contains("5x"));
    }

    #[test]
    fn test_stop_and_expiry_codes_differ() {
        /* `countdown 5 && alarm` must not ring after a manual stop */
        assert_eq!(exit_codes::EXPIRED, 0);
        assert_ne!(exit_codes::STOPPED, exit_codes::EXPIRED);
    }
}
