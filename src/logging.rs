//! Tracing subscriber set-up for the command-line binary.
//!
//! The library only emits events; installing a subscriber is left to the
//! binary. Events go to stderr so that stdout carries command output only.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Build the event filter from a directive such as `info` or
/// `resource_sequencer=debug,warn`.
pub fn env_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive)
        .with_context(|| format!("Invalid log filter directive '{}'", directive))
}

/// Install the global subscriber.
///
/// Fails if the directive does not parse or a subscriber is already set.
pub fn init(directive: &str, format: LogFormat) -> Result<()> {
    let filter = env_filter(directive)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}
