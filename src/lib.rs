/*
 * lib.rs
 *
 * Exists mostly for testing. Integration tests and the fuzz target need
 * the types; the binary is the real product.
 */

//! # countdown-timer
//!
//! A terminal countdown timer driven by single keystrokes.
//!
//! ## Quick Start
//!
//! ```rust
//! use countdown_timer::{format_remaining, parse_duration};
//! use std::time::Duration;
//!
//! let dur = parse_duration("1h2m3s").unwrap();
//! assert_eq!(dur, Duration::from_secs(3723));
//! assert_eq!(format_remaining(dur), "0日 01:02:03");
//! ```

pub mod args;
pub mod countdown;
pub mod duration;
pub mod error;
pub mod format;
pub mod input;
pub mod logging;
pub mod runner;
pub mod terminal;

pub use args::Args;
pub use countdown::{Countdown, CountdownState};
pub use duration::{is_valid_duration, parse_duration, parse_seconds};
pub use error::{Result, TimerError, exit_codes};
pub use format::format_remaining;
pub use input::{Command, KeySource, TtyKeys};
pub use runner::{Coordinator, Interrupter, Outcome, RunConfig};
