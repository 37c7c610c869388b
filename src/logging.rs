//! Tracing initialization.
//!
//! Logs go to stderr so they never mix with command output. The level comes
//! from `-v` (debug) / `-vv` (trace), otherwise from `STREAM_LOG`, otherwise
//! `error`.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "STREAM_LOG";

/// Picks the filter directive for the given `-v` count.
pub fn filter_directive(verbosity: u8) -> String {
    match verbosity {
        0 => std::env::var(ENV_LOG).unwrap_or_else(|_| "error".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Escape codes only go to an interactive stderr with colors enabled.
pub fn use_ansi(no_color: bool, stderr_is_terminal: bool) -> bool {
    !no_color && stderr_is_terminal
}

pub fn init_tracing(verbosity: u8, no_color: bool) {
    let directive = filter_directive(verbosity);
    let env_filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        // Tracing is not yet initialized; eprintln! is the only channel available.
        eprintln!("Warning: Invalid {ENV_LOG} value '{directive}'. Using 'error'.");
        EnvFilter::new("error")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(use_ansi(no_color, std::io::stderr().is_terminal()))
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
