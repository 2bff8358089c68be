/*
 * main.rs
 *
 * Parse args, set up the tty, hand off to the coordinator, exit with its
 * code. Boring on purpose. The interesting stuff is in runner.rs.
 *
 * Order matters: the signal handler goes in before raw mode so there is no
 * window where SIGINT, SIGTERM or SIGHUP kills us with echo off. Raw mode is
 * dropped before process::exit, which skips destructors.
 */

use countdown_timer::args::Args;
use countdown_timer::logging;
use countdown_timer::runner::{Coordinator, RunConfig};
use countdown_timer::terminal::{RawMode, STDIN, TtyWriter};
use countdown_timer::{Result, TimerError, TtyKeys};
use tracing::info;

fn main() {
    std::process::exit(i32::from(run_main()));
}

fn run_main() -> u8 {
    /* unknown flags exit 2 inside clap */
    let args = Args::parse_args();
    logging::init();

    let config = match RunConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => return report(&e),
    };

    match run(config) {
        Ok(code) => code,
        Err(e) => report(&e),
    }
}

/* usage mistakes get the help text, runtime failures just the message */
fn report(e: &TimerError) -> u8 {
    if e.is_usage() {
        eprintln!("countdown: {e}\n");
        eprint!("{}", Args::help_text());
    } else {
        eprintln!("countdown: {e}");
    }
    e.exit_code()
}

fn run(config: RunConfig) -> Result<u8> {
    let coordinator = Coordinator::new(config);

    /* SIGINT, SIGTERM and SIGHUP all end up as Interrupted */
    let interrupter = coordinator.interrupter();
    ctrlc::set_handler(move || interrupter.interrupt())
        .map_err(|e| TimerError::Interrupt(e.to_string()))?;

    let raw_mode = RawMode::enable(STDIN)?;
    if raw_mode.is_none() {
        info!("stdin is not a terminal, reading keys from it as-is");
    }

    let outcome = coordinator.run(TtyKeys::stdin(), &mut TtyWriter::stdout());

    /* restore the tty before anything else gets printed */
    drop(raw_mode);

    Ok(outcome?.exit_code())
}
