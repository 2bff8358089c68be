/*
 * countdown.rs
 *
 * The remaining time and the pause flag, plus the loop that burns it down.
 *
 * Remaining time is u64 nanoseconds in an atomic, pause is an AtomicBool.
 * No lock: the ticker is the only writer of remaining_ns, the key side only
 * flips the flag and reads. Each field is atomic on its own; nothing needs
 * both to change together.
 *
 * Each tick subtracts the measured time since the last tick, not the nominal
 * period. thread::sleep always overshoots a little and over a 25 minute
 * timer that adds up to seconds. Measuring keeps total drift under one tick.
 */

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Tick period used by the CLI.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Running,
    Paused,
    /// Terminal. Remaining time is zero and never grows back.
    Expired,
}

/// Shared countdown state.
///
/// Owned by the coordinator and handed to the ticker behind an `Arc`.
#[derive(Debug)]
pub struct Countdown {
    remaining_ns: AtomicU64,
    paused: AtomicBool,
}

impl Countdown {
    /// Start in `Running` with `duration` left.
    ///
    /// Durations past u64 nanoseconds saturate; the parser already refuses
    /// anything that large.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            remaining_ns: AtomicU64::new(duration_to_ns(duration)),
            paused: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn remaining(&self) -> Duration {
        Duration::from_nanos(self.remaining_ns.load(Ordering::Acquire))
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /* expiry wins over pause: a zero timer that is paused is still done */
    pub fn state(&self) -> CountdownState {
        if self.remaining_ns.load(Ordering::Acquire) == 0 {
            CountdownState::Expired
        } else if self.is_paused() {
            CountdownState::Paused
        } else {
            CountdownState::Running
        }
    }

    /// Advance by `elapsed` unless paused, and report the new state.
    ///
    /// Clamps at zero. Calling this after expiry is a no-op.
    pub fn tick(&self, elapsed: Duration) -> CountdownState {
        if !self.is_paused() {
            let elapsed_ns = duration_to_ns(elapsed);
            /* closure always returns Some, so this cannot fail */
            let _ = self
                .remaining_ns
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |ns| {
                    Some(ns.saturating_sub(elapsed_ns))
                });
        }

        self.state()
    }
}

/// Run the tick loop on the current thread until the countdown expires or
/// `on_tick` breaks.
///
/// Sleeps `min(period, remaining)` per iteration so expiry is seen on time
/// instead of up to a whole period late. `on_tick` sees every state,
/// including the final `Expired`.
pub fn run_ticker<F>(countdown: &Countdown, period: Duration, mut on_tick: F)
where
    F: FnMut(CountdownState) -> ControlFlow<()>,
{
    let mut last = Instant::now();

    loop {
        let nap = if countdown.is_paused() {
            period
        } else {
            period.min(countdown.remaining())
        };
        thread::sleep(nap);

        let now = Instant::now();
        let state = countdown.tick(now.duration_since(last));
        last = now;

        if on_tick(state).is_break() || state == CountdownState::Expired {
            return;
        }
    }
}

/* Duration to nanoseconds, saturating at u64::MAX */
#[inline]
fn duration_to_ns(d: Duration) -> u64 {
    d.as_secs()
        .saturating_mul(1_000_000_000)
        .saturating_add(u64::from(d.subsec_nanos()))
}
