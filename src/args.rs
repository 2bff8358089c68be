/*
 * args.rs
 *
 * Clap derive, two arguments. DURATION is optional at the clap level so a
 * missing value goes through our own error path, which prints the full
 * help including the key table. Clap's own "missing argument" error would
 * only show the usage line.
 *
 * Negative numbers look like flags to clap and fail as unknown arguments.
 * That's fine, there are no negative timers.
 */

use clap::CommandFactory;
use clap::Parser;

const KEYS_HELP: &str = "\
Keys while the timer runs:
  p      pause
  r      resume
  s, q   stop (exit status 1)
  d      print the remaining time";

#[derive(Parser, Debug)]
#[command(
    name = "countdown",
    about = "Count down in the terminal, exit 0 when time is up",
    before_help = KEYS_HELP,
    long_about = "Count down DURATION and exit with status 0 when it runs out.\n\n\
                  Meant to be chained with whatever makes noise:\n\
                    countdown 25m && play alarm.wav\n\n\
                  Stopping early exits with status 1, so the alarm stays quiet.",
    after_help = "Exit status:\n\
                  0    time is up\n\
                  1    stopped with s or q\n\
                  2    bad command line\n\
                  3    the timer itself failed\n\
                  130  interrupted (ctrl-c)"
)]
pub struct Args {
    /// Keep the remaining time on screen, redrawn every tick.
    #[arg(short = 'd')]
    pub show_remaining: bool,

    /// How long to count down.
    ///
    /// Plain seconds (90), minutes and seconds (1:30), hours minutes and
    /// seconds (1:02:03), or unit suffixes in h, m, s order (25m, 1h30m,
    /// 1h2m3s).
    #[arg(value_name = "DURATION")]
    pub duration: Option<String>,
}

impl Args {
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Full `--help` text, key table first.
    #[must_use]
    pub fn help_text() -> String {
        Self::command().render_help().to_string()
    }
}
