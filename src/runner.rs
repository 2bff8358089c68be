/*
 * runner.rs
 *
 * The coordinator. Owns the countdown, starts two worker threads, and is
 * the only place that touches the display.
 *
 *   ticker thread  -> Tick / Expired
 *   key thread     -> Key(cmd) / InputClosed
 *   ctrl-c handler -> Interrupted
 *   any panic      -> Fault
 *
 * Everything lands on one channel and run() handles events in order. Pause
 * and resume just flip the flag on the shared Countdown; the ticker reads it
 * on its next wakeup.
 *
 * Nobody joins the workers. run() returns, main restores the tty and exits,
 * and the process takes the threads with it. The key thread is usually
 * parked in read(2) and cannot be woken anyway.
 */

use std::io::Write;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::args::Args;
use crate::countdown::{Countdown, CountdownState, DEFAULT_TICK, run_ticker};
use crate::duration::parse_duration;
use crate::error::{Result, TimerError, exit_codes};
use crate::format::format_remaining;
use crate::input::{Command, KeySource, read_commands};
use crate::terminal::CLEAR_LINE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub duration: Duration,
    /// Redraw the remaining time every tick (`-d`).
    pub show_remaining: bool,
    pub tick: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration: Duration::ZERO,
            show_remaining: false,
            tick: DEFAULT_TICK,
        }
    }
}

impl RunConfig {
    /// Validate the command line. Nothing has started yet when this fails.
    ///
    /// # Errors
    ///
    /// `MissingDuration`, `InvalidDuration` or `DurationOverflow`.
    pub fn from_args(args: &Args) -> Result<Self> {
        let raw = args.duration.as_deref().ok_or(TimerError::MissingDuration)?;

        Ok(Self {
            duration: parse_duration(raw)?,
            show_remaining: args.show_remaining,
            ..Self::default()
        })
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Expired,
    Stopped,
    Interrupted,
}

impl Outcome {
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Expired => exit_codes::EXPIRED,
            Self::Stopped => exit_codes::STOPPED,
            Self::Interrupted => exit_codes::INTERRUPTED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(Command),
    /// Time moved and the display wants a redraw.
    Tick,
    Expired,
    /// stdin hit EOF or failed. Keys are gone, the countdown is not.
    InputClosed,
    Interrupted,
    /// A worker thread panicked. Names the worker.
    Fault(&'static str),
}

/// Posts `Interrupted` to a running coordinator. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Interrupter(Sender<Event>);

impl Interrupter {
    pub fn interrupt(&self) {
        /* coordinator already gone means we are exiting anyway */
        let _ = self.0.send(Event::Interrupted);
    }
}

#[derive(Debug)]
pub struct Coordinator {
    config: RunConfig,
    countdown: Arc<Countdown>,
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Coordinator {
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            countdown: Arc::new(Countdown::new(config.duration)),
            config,
            tx,
            rx,
        }
    }

    /// Handle for a signal handler; grab it before calling [`run`](Self::run).
    #[must_use]
    pub fn interrupter(&self) -> Interrupter {
        Interrupter(self.tx.clone())
    }

    /// Start the ticker and the key reader and handle events until the
    /// countdown expires or something stops it.
    ///
    /// Writes to `out` are best effort: a closed stdout does not stop the
    /// timer, it just stops the display.
    ///
    /// # Errors
    ///
    /// `Spawn` if a worker thread cannot start, `Internal` if one panics or
    /// every event source disappears.
    pub fn run<K, W>(self, keys: K, out: &mut W) -> Result<Outcome>
    where
        K: KeySource + Send + 'static,
        W: Write + ?Sized,
    {
        let Self {
            config,
            countdown,
            tx,
            rx,
        } = self;

        info!(
            duration = ?config.duration,
            show_remaining = config.show_remaining,
            "countdown started"
        );

        spawn_ticker(Arc::clone(&countdown), &config, tx.clone())?;
        spawn_key_reader(keys, tx)?;

        if config.show_remaining {
            redraw(out, &countdown);
        }

        loop {
            let event = rx
                .recv()
                .map_err(|_| TimerError::Internal("all event sources closed".to_string()))?;

            match event {
                Event::Tick => redraw(out, &countdown),
                Event::Expired => {
                    info!("time is up");
                    emit(out, &format!("\n{CLEAR_LINE}"));
                    return Ok(Outcome::Expired);
                }
                Event::Key(Command::Pause) => {
                    countdown.pause();
                    debug!(remaining = ?countdown.remaining(), "paused");
                }
                Event::Key(Command::Resume) => {
                    countdown.resume();
                    debug!(remaining = ?countdown.remaining(), "resumed");
                }
                Event::Key(Command::ShowRemaining) => {
                    let line = format_remaining(countdown.remaining());
                    /* don't glue the line onto the live display */
                    let prefix = if config.show_remaining { CLEAR_LINE } else { "" };
                    emit(out, &format!("{prefix}{line}\n"));
                }
                Event::Key(Command::Stop) => {
                    info!(remaining = ?countdown.remaining(), "stopped");
                    emit(out, "\n");
                    return Ok(Outcome::Stopped);
                }
                Event::InputClosed => debug!("key input closed, countdown continues"),
                Event::Interrupted => {
                    info!("interrupted");
                    emit(out, "\n");
                    return Ok(Outcome::Interrupted);
                }
                Event::Fault(worker) => {
                    emit(out, "\n");
                    return Err(TimerError::Internal(format!("{worker} thread panicked")));
                }
            }
        }
    }
}

fn spawn_ticker(countdown: Arc<Countdown>, config: &RunConfig, tx: Sender<Event>) -> Result<()> {
    let period = config.tick;
    let show = config.show_remaining;

    thread::Builder::new()
        .name("countdown-ticker".to_string())
        .spawn(move || {
            let ran = panic::catch_unwind(AssertUnwindSafe(|| {
                run_ticker(&countdown, period, |state| {
                    let event = match state {
                        CountdownState::Expired => Event::Expired,
                        _ if show => Event::Tick,
                        _ => return ControlFlow::Continue(()),
                    };
                    /* send fails once run() has returned */
                    if tx.send(event).is_err() {
                        ControlFlow::Break(())
                    } else {
                        ControlFlow::Continue(())
                    }
                });
            }));

            if ran.is_err() {
                warn!("ticker thread panicked");
                let _ = tx.send(Event::Fault("ticker"));
            }
        })
        .map_err(|e| TimerError::Spawn("ticker", e))?;

    Ok(())
}

fn spawn_key_reader<K>(mut keys: K, tx: Sender<Event>) -> Result<()>
where
    K: KeySource + Send + 'static,
{
    thread::Builder::new()
        .name("countdown-keys".to_string())
        .spawn(move || {
            let ran = panic::catch_unwind(AssertUnwindSafe(|| {
                read_commands(&mut keys, |command| {
                    if tx.send(Event::Key(command)).is_err() {
                        ControlFlow::Break(())
                    } else {
                        ControlFlow::Continue(())
                    }
                })
            }));

            let event = match ran {
                Ok(Ok(())) => Event::InputClosed,
                Ok(Err(err)) => {
                    warn!(%err, "reading keys failed, key commands disabled");
                    Event::InputClosed
                }
                Err(_) => {
                    warn!("key reader thread panicked");
                    Event::Fault("key reader")
                }
            };
            let _ = tx.send(event);
        })
        .map_err(|e| TimerError::Spawn("key reader", e))?;

    Ok(())
}

/* live line: clear, carriage return, text, no newline */
fn redraw<W: Write + ?Sized>(out: &mut W, countdown: &Countdown) {
    emit(
        out,
        &format!("{CLEAR_LINE}{}", format_remaining(countdown.remaining())),
    );
}

/* one write per frame, failures only logged */
fn emit<W: Write + ?Sized>(out: &mut W, text: &str) {
    if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        debug!(%err, "display write failed");
    }
}
