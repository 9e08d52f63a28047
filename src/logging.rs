//! Diagnostic logging for the command-line tool.
//!
//! The library only emits `tracing` events. The binary installs a fmt layer on
//! stderr so that stdout carries nothing but the report.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{AppResult, config_error};

/// Level used when neither `RUST_LOG` nor the configuration set one
pub const DEFAULT_LEVEL: &str = "warn";

/// Pick the filter directive: `RUST_LOG`, then the configured level, then
/// [`DEFAULT_LEVEL`]
pub fn filter_directive(rust_log: Option<String>, configured: Option<&str>) -> String {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns a configuration error when the directive cannot be parsed. A
/// subscriber installed earlier is left in place.
pub fn init(configured: Option<&str>) -> AppResult<()> {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), configured);
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| config_error(format!("Invalid log level '{}': {}", directive, e)))?;
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
        )
        .try_init();
    Ok(())
}
