//! Settings addressed by name from the command line.

use anyhow::{anyhow, bail, Context, Result};
use fgen_core::{Channel, FgenError, FgenResult, LineTransport, PerChannel};
use fgen_driver_jds6600::{Jds6600, Reply, SystemSetting};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::str::FromStr;

/// A readable (and mostly writable) instrument setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Setting {
    Model,
    SerialNumber,
    Output,
    Waveform,
    Frequency,
    Amplitude,
    Offset,
    DutyCycle,
    Phase,
    UiMode,
    System(SystemSetting),
}

impl Setting {
    /// Whether the setting takes a channel selector.
    pub fn is_per_channel(self) -> bool {
        matches!(
            self,
            Self::Output
                | Self::Waveform
                | Self::Frequency
                | Self::Amplitude
                | Self::Offset
                | Self::DutyCycle
        )
    }
}

/// Channel to address `setting` on.
///
/// Per-channel settings default to both channels. Any other setting refuses
/// an explicit channel rather than silently ignoring it.
pub fn resolve_channel(setting: Setting, requested: Option<Channel>) -> Result<Channel> {
    match requested {
        Some(which) if setting.is_per_channel() => Ok(which),
        Some(_) => bail!("{setting} is not a per-channel setting"),
        None => Ok(Channel::Both),
    }
}

impl FromStr for Setting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "model" => Ok(Self::Model),
            "serial" | "serial_number" => Ok(Self::SerialNumber),
            "output" => Ok(Self::Output),
            "waveform" => Ok(Self::Waveform),
            "frequency" => Ok(Self::Frequency),
            "amplitude" => Ok(Self::Amplitude),
            "offset" => Ok(Self::Offset),
            "duty" | "duty_cycle" => Ok(Self::DutyCycle),
            "phase" => Ok(Self::Phase),
            "ui_mode" => Ok(Self::UiMode),
            other => other
                .parse::<SystemSetting>()
                .map(Self::System)
                .map_err(|_| format!("unknown setting '{other}'")),
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System(setting) => write!(f, "{setting:?}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Name of a table value as it appears in config files.
fn name_of<V: Serialize + fmt::Debug>(value: V) -> String {
    match toml::Value::try_from(&value) {
        Ok(toml::Value::String(name)) => name,
        _ => format!("{value:?}"),
    }
}

/// Parse a table value from its config name or its wire code.
fn parse_named<V>(value: &str) -> Result<V>
where
    V: DeserializeOwned + TryFrom<i64, Error = FgenError>,
{
    if let Ok(code) = value.parse::<i64>() {
        return Ok(V::try_from(code)?);
    }
    toml::Value::String(value.to_string())
        .try_into()
        .map_err(|_| anyhow!("unknown value '{value}'"))
}

fn parse_number(value: &str) -> Result<f64> {
    value
        .parse()
        .with_context(|| format!("'{value}' is not a number"))
}

/// Parse comma-separated register arguments.
pub fn parse_args(value: &str) -> Result<Vec<i64>> {
    value
        .split(',')
        .map(|arg| {
            arg.trim()
                .parse()
                .with_context(|| format!("'{arg}' is not an integer"))
        })
        .collect()
}

fn render<V>(values: PerChannel<V>, show: impl Fn(V) -> String) -> String {
    match values {
        PerChannel::Empty => String::new(),
        PerChannel::One(value) => show(value),
        PerChannel::Both(ch1, ch2) => format!("ch1={} ch2={}", show(ch1), show(ch2)),
    }
}

/// Register values joined the way the device frames them.
pub fn render_reply(reply: &Reply) -> String {
    reply
        .values()
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Read `setting` and format it for display.
pub async fn read_setting<T: LineTransport>(
    fgen: &mut Jds6600<T>,
    setting: Setting,
    which: Channel,
) -> FgenResult<String> {
    Ok(match setting {
        Setting::Model => fgen.model().await?.to_string(),
        Setting::SerialNumber => fgen.serial_number().await?.to_string(),
        Setting::Output => render(fgen.channel_output(which).await?, name_of),
        Setting::Waveform => render(fgen.waveform(which).await?, name_of),
        Setting::Frequency => render(fgen.frequency(which).await?, |hz| format!("{hz} Hz")),
        Setting::Amplitude => render(fgen.amplitude(which).await?, |v| format!("{v} V")),
        Setting::Offset => render(fgen.offset(which).await?, |v| format!("{v} V")),
        Setting::DutyCycle => render(fgen.duty_cycle(which).await?, |pct| format!("{pct} %")),
        Setting::Phase => format!("{} deg", fgen.phase().await?),
        Setting::UiMode => name_of(fgen.ui_mode().await?),
        Setting::System(system) => fgen.system_setting(system).await?.to_string(),
    })
}

/// Parse `value` for `setting` and write it.
pub async fn write_setting<T: LineTransport>(
    fgen: &mut Jds6600<T>,
    setting: Setting,
    value: &str,
    which: Channel,
) -> Result<()> {
    match setting {
        Setting::Model | Setting::SerialNumber => bail!("{setting} is read-only"),
        Setting::Output => fgen.set_channel_output(parse_named(value)?, which).await?,
        Setting::Waveform => fgen.set_waveform(parse_named(value)?, which).await?,
        Setting::Frequency => fgen.set_frequency(parse_number(value)?, which).await?,
        Setting::Amplitude => fgen.set_amplitude(parse_number(value)?, which).await?,
        Setting::Offset => fgen.set_offset(parse_number(value)?, which).await?,
        Setting::DutyCycle => fgen.set_duty_cycle(parse_number(value)?, which).await?,
        Setting::Phase => fgen.set_phase(parse_number(value)?).await?,
        Setting::UiMode => fgen.set_ui_mode(parse_named(value)?).await?,
        Setting::System(system) => {
            let raw = value
                .parse()
                .with_context(|| format!("'{value}' is not an integer"))?;
            fgen.set_system_setting(system, raw).await?
        }
    }
    Ok(())
}
