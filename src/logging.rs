// src/logging.rs
// =============================================================================
// Diagnostics setup.
//
// Everything goes to stderr so that `--json` output on stdout stays clean.
// The filter comes from DOCSTOOL_LOG (e.g. DOCSTOOL_LOG=docstool=trace),
// falling back to "info", or "debug" with --verbose.
// =============================================================================

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "DOCSTOOL_LOG";

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init so a second call (tests, embedding) is a no-op instead of a panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
