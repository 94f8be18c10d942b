//! Logging setup
//!
//! `RUST_LOG` takes precedence over the configured level, e.g.
//! `RUST_LOG=bomx::core::explosion=trace` to follow a single explosion.
//! Logs go to stderr so command output on stdout stays pipeable.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// `default_filter` applies when `RUST_LOG` is unset or invalid.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (e.g. embedding callers) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Filter for a `-v` count on top of the configured level
pub fn filter_for_verbosity(configured: &str, verbose: u8) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
