//! Tracing setup for the CLI.
//!
//! Log lines go to stderr so command output on stdout stays scriptable.
//! `RUST_LOG` wins over the configured level when set.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter from `RUST_LOG`, falling back to `default_level`.
pub fn env_filter(default_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("invalid log filter '{default_level}'")),
    }
}

/// Install the global subscriber.
pub fn init(default_level: &str) -> Result<()> {
    let fmt_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter(default_level)?);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .context("failed to initialize tracing")
}
