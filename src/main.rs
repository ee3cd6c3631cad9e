//! CLI Entry Point for fgen
//!
//! # Usage
//!
//! ```bash
//! fgen --port /dev/ttyUSB0 info
//! fgen get frequency --channel 1
//! fgen set waveform square --channel both
//! fgen apply                      # presets from fgen.toml
//! fgen raw get 23
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fgen::commands::{self, Setting};
use fgen::config::{AppConfig, Overrides, DEFAULT_CONFIG_FILE};
use fgen::logging;
use fgen_core::Channel;
use fgen_driver_jds6600::Jds6600;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fgen", version)]
#[command(about = "Control JDS6600 function generators over serial", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Serial port, overriding the configuration
    #[arg(long, short)]
    port: Option<String>,

    /// Log level, overriding the configuration (RUST_LOG still wins)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show model, serial number and output states
    Info,

    /// Read a setting
    Get {
        /// output, waveform, frequency, amplitude, offset, duty_cycle, phase,
        /// ui_mode, model, serial, or a system setting
        setting: Setting,

        /// 1, 2, both or none (default both); per-channel settings only
        #[arg(long, short = 'C')]
        channel: Option<Channel>,
    },

    /// Write a setting
    Set {
        /// Setting name, as for `get`
        setting: Setting,

        /// Value in Hz, V, %, degrees, or a table name or code
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// 1, 2, both or none (default both); per-channel settings only
        #[arg(long, short = 'C')]
        channel: Option<Channel>,
    },

    /// Apply the [both], [channel1] and [channel2] presets
    Apply,

    /// Print the effective configuration
    Config,

    /// Register-level access
    Raw {
        #[command(subcommand)]
        action: RawAction,
    },
}

#[derive(Subcommand)]
enum RawAction {
    /// Read a register
    Get {
        /// Register number (0-99)
        register: u8,

        /// Comma-separated read arguments
        #[arg(default_value = "0")]
        args: String,
    },

    /// Write a register
    Set {
        /// Register number (0-99)
        register: u8,

        /// Comma-separated values
        #[arg(allow_hyphen_values = true)]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = Overrides {
        port: cli.port.clone(),
        log_level: cli.log_level.clone(),
    };
    let config = AppConfig::load(&cli.config, &overrides)?;
    logging::init(&config.log_level)?;
    tracing::debug!(path = %cli.config.display(), "configuration loaded");

    if let Commands::Config = cli.command {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut fgen = Jds6600::connect(&config.device)
        .await
        .with_context(|| format!("failed to connect to {}", config.device.port))?;

    match cli.command {
        Commands::Info => {
            for setting in [Setting::Model, Setting::SerialNumber, Setting::Output] {
                let value = commands::read_setting(&mut fgen, setting, Channel::Both).await?;
                println!("{setting}: {value}");
            }
        }
        Commands::Get { setting, channel } => {
            let which = commands::resolve_channel(setting, channel)?;
            println!("{}", commands::read_setting(&mut fgen, setting, which).await?);
        }
        Commands::Set {
            setting,
            value,
            channel,
        } => {
            let which = commands::resolve_channel(setting, channel)?;
            commands::write_setting(&mut fgen, setting, &value, which)
                .await
                .with_context(|| format!("failed to set {setting} to {value}"))?;
        }
        Commands::Apply => {
            let presets = config.presets();
            if presets.is_empty() {
                tracing::warn!("no channel presets configured");
            }
            for (which, settings) in presets {
                tracing::info!(?which, "applying preset");
                fgen.configure_channel(settings, which)
                    .await
                    .with_context(|| format!("failed to apply preset for {which:?}"))?;
            }
        }
        Commands::Raw { action } => match action {
            RawAction::Get { register, args } => {
                let args = commands::parse_args(&args)?;
                let reply = fgen.dispatcher().get_raw(register, &args).await?;
                println!("{}", commands::render_reply(&reply));
            }
            RawAction::Set { register, args } => {
                let args = commands::parse_args(&args)?;
                fgen.dispatcher().set_raw(register, &args).await?;
            }
        },
        Commands::Config => {}
    }

    Ok(())
}
