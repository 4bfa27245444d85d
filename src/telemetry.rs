use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Registry};

/// Installs the global subscriber: bunyan-formatted JSON lines on stdout,
/// filtered by `RUST_LOG` (falling back to `default_filter`).
///
/// `log` records, such as the actix-web access log, are forwarded into the
/// same pipeline.
pub fn init_subscriber(app_name: &str, default_filter: &str) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let formatting_layer = BunyanFormattingLayer::new(app_name.to_string(), std::io::stdout);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .try_init()
}
