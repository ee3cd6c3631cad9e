//! Driver configuration.

use crate::dispatcher::AddressMap;
use crate::types::{Output, Waveform};
use fgen_core::{FgenError, FgenResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the JDS6600 driver.
///
/// ```toml
/// port = "/dev/ttyUSB0"
/// baud_rate = 115200
/// timeout_ms = 500
/// drain_ms = 0
/// fix_read_bug = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jds6600Config {
    /// Serial port path (e.g., "/dev/ttyUSB0", "COM3")
    pub port: String,
    /// Serial baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Read deadline for one response line
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Extra time to wait for stale input before each request.
    ///
    /// Input already queued is always discarded. A nonzero window also
    /// catches bytes still in flight, but every exchange then waits that long
    /// when the line is quiet.
    #[serde(default = "default_drain_ms")]
    pub drain_ms: u64,
    /// Read system settings from register + 1
    #[serde(default = "default_fix_read_bug")]
    pub fix_read_bug: bool,
}

fn default_baud_rate() -> u32 {
    115200
}

fn default_timeout_ms() -> u64 {
    500
}

fn default_drain_ms() -> u64 {
    0
}

fn default_fix_read_bug() -> bool {
    true
}

impl Jds6600Config {
    /// Defaults for everything but the port.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
            drain_ms: default_drain_ms(),
            fix_read_bug: default_fix_read_bug(),
        }
    }

    /// Reject settings the serial port cannot be opened with.
    pub fn validate(&self) -> FgenResult<()> {
        if self.port.trim().is_empty() {
            return Err(FgenError::Configuration("port must not be empty".into()));
        }
        if self.baud_rate == 0 {
            return Err(FgenError::Configuration("baud_rate must be positive".into()));
        }
        if self.timeout_ms == 0 {
            return Err(FgenError::Configuration("timeout_ms must be positive".into()));
        }
        Ok(())
    }

    /// Read deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Stale-input drain window.
    pub fn drain_window(&self) -> Duration {
        Duration::from_millis(self.drain_ms)
    }

    /// Register address map selected by `fix_read_bug`.
    pub fn address_map(&self) -> AddressMap {
        AddressMap::from_read_bug(self.fix_read_bug)
    }
}

/// Settings applied together by [`Jds6600::configure_channel`](crate::Jds6600::configure_channel).
///
/// Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelSettings {
    /// Waveform
    pub waveform: Option<Waveform>,
    /// Frequency in Hz
    pub frequency_hz: Option<f64>,
    /// Amplitude in V
    pub amplitude_v: Option<f64>,
    /// Offset in V
    pub offset_v: Option<f64>,
    /// Duty cycle in %
    pub duty_cycle_pct: Option<f64>,
    /// Output state, switched off first or on last
    pub output: Option<Output>,
}

impl ChannelSettings {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_table() {
        let config: Jds6600Config = toml::from_str(r#"port = "/dev/ttyUSB0""#).unwrap();
        assert_eq!(config, Jds6600Config::new("/dev/ttyUSB0"));
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert!(config.drain_window().is_zero());
        assert_eq!(config.address_map(), AddressMap::SystemReadPlusOne);
    }

    #[test]
    fn test_validate_config() {
        // Missing port
        assert!(toml::from_str::<Jds6600Config>("baud_rate = 115200").is_err());

        // Zero timeout
        let zero_timeout: Jds6600Config = toml::from_str(
            r#"
            port = "/dev/ttyUSB0"
            timeout_ms = 0
            "#,
        )
        .unwrap();
        assert!(matches!(
            zero_timeout.validate(),
            Err(FgenError::Configuration(_))
        ));

        let mut config = Jds6600Config::new(" ");
        assert!(config.validate().is_err());
        config.port = "COM3".into();
        config.fix_read_bug = false;
        assert!(config.validate().is_ok());
        assert_eq!(config.address_map(), AddressMap::Direct);
    }

    #[test]
    fn test_channel_settings_from_toml() {
        let settings: ChannelSettings = toml::from_str(
            r#"
            waveform = "square"
            frequency_hz = 1000.0
            duty_cycle_pct = 25.0
            output = "on"
            "#,
        )
        .unwrap();
        assert_eq!(settings.waveform, Some(Waveform::Square));
        assert_eq!(settings.output, Some(Output::On));
        assert_eq!(settings.amplitude_v, None);
        assert!(!settings.is_empty());
        assert!(ChannelSettings::default().is_empty());

        assert!(toml::from_str::<ChannelSettings>("phase = 90.0").is_err());
    }
}
