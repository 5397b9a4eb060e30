//! Diagnostic logging setup using tracing
//!
//! Diagnostics go to stderr so they never mix with command output. The
//! filter comes from `BIZFLY_LOG` or `RUST_LOG` when set, otherwise from the
//! verbosity flags.

use tracing_subscriber::EnvFilter;

/// Environment variable taking precedence over `RUST_LOG`
pub const LOG_ENV: &str = "BIZFLY_LOG";

/// Filter directive for the given verbosity flags
pub fn default_directive(verbose: u8, quiet: bool) -> String {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    format!("warn,bizfly={}", level)
}

/// Initialize the tracing subscriber
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
