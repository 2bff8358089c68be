/*
 * logging.rs
 *
 * tracing to stderr, filtered by COUNTDOWN_LOG (same syntax as RUST_LOG).
 * stdout belongs to the display, never log there. Default is warn, which
 * in practice means silent.
 */

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "COUNTDOWN_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/* falls back to the default on a missing or unparsable variable */
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init() {
    /* only fails if a subscriber is already set, which is fine */
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
