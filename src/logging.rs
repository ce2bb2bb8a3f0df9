//! Diagnostic logging to stderr.
//!
//! Stdout carries tables and summaries only, so anything from `tracing` goes to
//! stderr. The filter comes from `ASPCAP_LOG` when set, otherwise from the
//! number of `-v` flags.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "ASPCAP_LOG";

/// Base level for a given `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbosity: u8) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level_for_verbosity(verbosity)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // A subscriber already being set (tests, embedding) is not an error here.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
