//! CLI configuration using Figment
//!
//! Configuration is loaded from:
//! 1. a TOML file (`fgen.toml` unless `--config` is given)
//! 2. Environment variables prefixed with `FGEN_`, nested keys split on `__`
//!
//! ```toml
//! log_level = "info"
//!
//! [device]
//! port = "/dev/ttyUSB0"
//!
//! [both]
//! waveform = "sine"
//! amplitude_v = 1.0
//!
//! [channel1]
//! frequency_hz = 1000.0
//! output = "on"
//! ```
//!
//! `FGEN_DEVICE__PORT=/dev/ttyUSB1` overrides the port, `FGEN_LOG_LEVEL=debug`
//! the log level.

use anyhow::{bail, Context, Result};
use fgen_core::Channel;
use fgen_driver_jds6600::{ChannelSettings, Jds6600Config};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "fgen.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FGEN_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Instrument connection
    pub device: Jds6600Config,
    /// Preset applied to both channels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub both: Option<ChannelSettings>,
    /// Preset applied to channel 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel1: Option<ChannelSettings>,
    /// Preset applied to channel 2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel2: Option<ChannelSettings>,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values given on the command line, merged over file and environment.
#[derive(Debug, Default, Serialize)]
pub struct Overrides {
    /// `--port`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// `--log-level`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Figment for `path`, the environment and `overrides`, in rising priority.
    pub fn figment(path: &Path, overrides: &Overrides) -> Figment {
        let mut figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        if let Some(port) = &overrides.port {
            figment = figment.merge(Serialized::default("device.port", port));
        }
        if let Some(level) = &overrides.log_level {
            figment = figment.merge(Serialized::default("log_level", level));
        }
        figment
    }

    /// Load and validate.
    ///
    /// A missing file is not an error on its own; the port may come from
    /// the environment or the command line.
    pub fn load(path: &Path, overrides: &Overrides) -> Result<Self> {
        let config: Self = Self::figment(path, overrides)
            .extract()
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            bail!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            );
        }
        self.device.validate().context("invalid [device] table")?;
        Ok(())
    }

    /// Presets in application order: both channels first, then each channel.
    pub fn presets(&self) -> Vec<(Channel, &ChannelSettings)> {
        [
            (Channel::Both, self.both.as_ref()),
            (Channel::Ch1, self.channel1.as_ref()),
            (Channel::Ch2, self.channel2.as_ref()),
        ]
        .into_iter()
        .filter_map(|(which, settings)| settings.map(|s| (which, s)))
        .filter(|(_, settings)| !settings.is_empty())
        .collect()
    }
}
