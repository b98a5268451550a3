//! Logging initialization for hosts embedding the session service.
//!
//! The library itself only emits `tracing` events; a host that does not run
//! its own subscriber can install this one.

use tracing_subscriber::EnvFilter;

/// Install a compact fmt subscriber.
///
/// `RUST_LOG` wins over `level` when set. `level` goes through
/// [`parse_level`], so config values like `warning` or `verbose` still
/// yield a usable filter. Calling this more than once (as tests do) leaves
/// the first subscriber in place.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init();
}

fn default_directive(level: &str) -> String {
    parse_level(level).to_string().to_lowercase()
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
