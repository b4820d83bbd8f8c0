//! Tracing subscriber setup
//!
//! Shared subscriber configuration for hosts and tests. The filter directive
//! comes from `LoggingConfig`, never from the process environment.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use super::warning_log::{WarningLogHandle, WarningLogLayer};
use crate::config::LoggingConfig;

/// Build the filter for a directive such as `"info"` or `"portfolio=debug"`.
///
/// An unparsable directive falls back to `info` rather than failing the page.
pub fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("invalid log filter {:?}: {}; using \"info\"", directive, e);
        EnvFilter::new("info")
    })
}

/// Build a subscriber with the given writer and optional warning layer.
///
/// This is the core subscriber configuration shared between hosts and tests.
pub fn build_subscriber<W>(
    directive: &str,
    writer: W,
    warning_layer: Option<WarningLogLayer>,
) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let fmt_layer = fmt::layer().with_writer(writer).with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_filter(directive))
        .with(warning_layer)
}

/// Install the global subscriber writing to stderr, with warning capture.
///
/// Returns `None` if a global subscriber was already installed.
pub fn init_global(config: &LoggingConfig) -> Option<WarningLogHandle> {
    let (warning_layer, warning_handle) = super::warning_log::create();
    let subscriber = build_subscriber(&config.filter, std::io::stderr, Some(warning_layer));

    match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => Some(warning_handle),
        Err(_) => None,
    }
}
