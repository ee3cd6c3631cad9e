//! JDS6600 Dual-Channel Function Generator Driver
//!
//! Protocol Overview:
//! - Format: ASCII `:r` (read) / `:w` (write) frames, one per line
//! - Baud: 115200, 8N1, no flow control
//! - Terminator: CR+LF (\r\n)
//! - Read:  `:r<NN>=<args>.` -> `:r<NN>=<values>.`
//! - Write: `:w<NN>=<args>.` -> `:ok`
//!
//! Units exposed by this driver: Hz, V, %, degrees. Register values are
//! converted by [`crate::frequency`] and [`crate::command::scale`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use fgen_core::Channel;
//! use fgen_driver_jds6600::{Jds6600, Jds6600Config, Output, Waveform};
//!
//! let mut fgen = Jds6600::connect(&Jds6600Config::new("/dev/ttyUSB0")).await?;
//!
//! fgen.set_waveform(Waveform::Square, Channel::Ch1).await?;
//! fgen.set_frequency(1000.0, Channel::Ch1).await?;
//! fgen.set_channel_output(Output::On, Channel::Ch1).await?;
//! ```

use crate::command::{self, scale, Command};
use crate::config::{ChannelSettings, Jds6600Config};
use crate::dispatcher::{AddressMap, Dispatcher};
use crate::frequency::{self, DeviceFrequency};
use crate::types::{Output, SystemSetting, UiMode, Waveform};
use fgen_core::{
    Channel, FgenError, FgenResult, LineTransport, PerChannel, SerialTransport,
};
use tracing::instrument;

fn finite(what: &str, value: f64) -> FgenResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FgenError::invalid_argument(format!(
            "{what} must be finite, got {value}"
        )))
    }
}

/// Driver for the JDS6600 function generator.
///
/// Owns its transport exclusively. All methods take `&mut self`; wrap the
/// driver in a mutex to share it between tasks.
pub struct Jds6600<T = SerialTransport> {
    dispatcher: Dispatcher<T>,
}

impl Jds6600<SerialTransport> {
    /// Open the serial port from `config` and validate the device.
    ///
    /// # Errors
    /// Returns error if:
    /// - The configuration is invalid
    /// - Serial port cannot be opened
    /// - Device doesn't answer the model query
    pub async fn connect(config: &Jds6600Config) -> FgenResult<Self> {
        config.validate()?;
        let transport = SerialTransport::open(
            &config.port,
            config.baud_rate,
            config.timeout(),
            config.drain_window(),
        )
        .await?;

        let mut driver = Self::new(transport, config.address_map());
        let model = driver.model().await?;
        let serial = driver.serial_number().await?;
        tracing::info!(port = %config.port, model, serial, "JDS6600 connected");

        Ok(driver)
    }
}

impl<T: LineTransport> Jds6600<T> {
    /// Drive an already-open transport.
    pub fn new(transport: T, addresses: AddressMap) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport, addresses),
        }
    }

    /// Register-level access for settings without a typed method.
    pub fn dispatcher(&mut self) -> &mut Dispatcher<T> {
        &mut self.dispatcher
    }

    /// Release the transport.
    pub fn into_transport(self) -> T {
        self.dispatcher.into_transport()
    }

    /// Model number; reports the maximum frequency in MHz (e.g. 30 or 60).
    #[instrument(skip(self), err)]
    pub async fn model(&mut self) -> FgenResult<i64> {
        self.dispatcher.get(Command::Model, &[]).await?.scalar()
    }

    /// Device serial number.
    #[instrument(skip(self), err)]
    pub async fn serial_number(&mut self) -> FgenResult<i64> {
        self.dispatcher.get(Command::SerialNumber, &[]).await?.scalar()
    }

    // =========================================================================
    // Output enable
    // =========================================================================

    /// Output state; both channels are always read together.
    #[instrument(skip(self), err)]
    pub async fn channel_output(&mut self, which: Channel) -> FgenResult<PerChannel<Output>> {
        if which == Channel::None {
            return Ok(PerChannel::Empty);
        }
        let (ch1, ch2) = self.read_outputs().await?;
        Ok(match which.select((ch1, ch2)) {
            Some(state) => PerChannel::One(state),
            None => PerChannel::Both(ch1, ch2),
        })
    }

    /// Switch outputs on or off.
    ///
    /// The enable register has no single-channel form, so changing one
    /// channel reads both states first and writes the other one back
    /// unchanged.
    #[instrument(skip(self), err)]
    pub async fn set_channel_output(&mut self, value: Output, which: Channel) -> FgenResult<()> {
        let states = match which {
            Channel::None => return Ok(()),
            Channel::Both => [value, value],
            Channel::Ch1 | Channel::Ch2 => {
                let (ch1, ch2) = self.read_outputs().await?;
                let mut states = [ch1, ch2];
                if let Some(slot) = which.index() {
                    states[slot] = value;
                }
                states
            }
        };
        let args = states.map(|s| i64::from(s.code()));
        self.dispatcher.set(Command::ChannelEnable, &args).await
    }

    async fn read_outputs(&mut self) -> FgenResult<(Output, Output)> {
        let (ch1, ch2) = self
            .dispatcher
            .get(Command::ChannelEnable, &[])
            .await?
            .pair()?;
        Ok((Output::try_from(ch1)?, Output::try_from(ch2)?))
    }

    // =========================================================================
    // Per-channel settings
    // =========================================================================

    /// Current waveform.
    #[instrument(skip(self), err)]
    pub async fn waveform(&mut self, which: Channel) -> FgenResult<PerChannel<Waveform>> {
        self.dispatcher
            .get_per_channel(command::WAVEFORM, which, &[], |reply| {
                Waveform::try_from(reply.scalar()?)
            })
            .await
    }

    /// Select a waveform.
    #[instrument(skip(self), err)]
    pub async fn set_waveform(&mut self, value: Waveform, which: Channel) -> FgenResult<()> {
        self.dispatcher
            .set_per_channel(command::WAVEFORM, which, &[i64::from(value.code())])
            .await
    }

    /// Frequency in Hz.
    #[instrument(skip(self), err)]
    pub async fn frequency(&mut self, which: Channel) -> FgenResult<PerChannel<f64>> {
        self.dispatcher
            .get_per_channel(command::FREQUENCY, which, &[], |reply| {
                let (raw, unit) = reply.pair()?;
                Ok(DeviceFrequency::from_args(raw, unit)?.hz())
            })
            .await
    }

    /// Set the frequency in Hz, encoded in the most precise legal timebase.
    #[instrument(skip(self), err)]
    pub async fn set_frequency(&mut self, hz: f64, which: Channel) -> FgenResult<()> {
        let hz = finite("frequency", hz)?;
        if hz < 0.0 {
            return Err(FgenError::invalid_argument(format!(
                "frequency must not be negative, got {hz}"
            )));
        }
        let encoded = frequency::to_device(hz);
        tracing::debug!(hz, raw = encoded.raw, unit = ?encoded.unit, "encoded frequency");
        self.dispatcher
            .set_per_channel(command::FREQUENCY, which, &encoded.args())
            .await
    }

    /// Amplitude in V.
    #[instrument(skip(self), err)]
    pub async fn amplitude(&mut self, which: Channel) -> FgenResult<PerChannel<f64>> {
        self.dispatcher
            .get_per_channel(command::AMPLITUDE, which, &[], |reply| {
                Ok(scale::amplitude_from_device(reply.scalar()?))
            })
            .await
    }

    /// Set the amplitude in V.
    #[instrument(skip(self), err)]
    pub async fn set_amplitude(&mut self, volts: f64, which: Channel) -> FgenResult<()> {
        let raw = scale::amplitude_to_device(finite("amplitude", volts)?);
        self.dispatcher
            .set_per_channel(command::AMPLITUDE, which, &[raw])
            .await
    }

    /// DC offset in V.
    #[instrument(skip(self), err)]
    pub async fn offset(&mut self, which: Channel) -> FgenResult<PerChannel<f64>> {
        self.dispatcher
            .get_per_channel(command::OFFSET, which, &[], |reply| {
                Ok(scale::offset_from_device(reply.scalar()?))
            })
            .await
    }

    /// Set the DC offset in V.
    #[instrument(skip(self), err)]
    pub async fn set_offset(&mut self, volts: f64, which: Channel) -> FgenResult<()> {
        let raw = scale::offset_to_device(finite("offset", volts)?);
        self.dispatcher
            .set_per_channel(command::OFFSET, which, &[raw])
            .await
    }

    /// Duty cycle in %.
    #[instrument(skip(self), err)]
    pub async fn duty_cycle(&mut self, which: Channel) -> FgenResult<PerChannel<f64>> {
        self.dispatcher
            .get_per_channel(command::DUTY_CYCLE, which, &[], |reply| {
                Ok(scale::duty_cycle_from_device(reply.scalar()?))
            })
            .await
    }

    /// Set the duty cycle in %.
    #[instrument(skip(self), err)]
    pub async fn set_duty_cycle(&mut self, percent: f64, which: Channel) -> FgenResult<()> {
        let raw = scale::duty_cycle_to_device(finite("duty cycle", percent)?);
        self.dispatcher
            .set_per_channel(command::DUTY_CYCLE, which, &[raw])
            .await
    }

    // =========================================================================
    // Shared settings
    // =========================================================================

    /// Phase of channel 2 relative to channel 1, in degrees.
    #[instrument(skip(self), err)]
    pub async fn phase(&mut self) -> FgenResult<f64> {
        let raw = self.dispatcher.get(Command::Phase, &[]).await?.scalar()?;
        Ok(scale::phase_from_device(raw))
    }

    /// Set the phase in degrees.
    #[instrument(skip(self), err)]
    pub async fn set_phase(&mut self, degrees: f64) -> FgenResult<()> {
        let raw = scale::phase_to_device(finite("phase", degrees)?);
        self.dispatcher.set(Command::Phase, &[raw]).await
    }

    /// Front panel cursor position.
    #[instrument(skip(self), err)]
    pub async fn ui_mode(&mut self) -> FgenResult<UiMode> {
        let raw = self.dispatcher.get(Command::UiMode, &[]).await?.scalar()?;
        UiMode::try_from(raw)
    }

    /// Move the front panel cursor.
    #[instrument(skip(self), err)]
    pub async fn set_ui_mode(&mut self, value: UiMode) -> FgenResult<()> {
        self.dispatcher
            .set(Command::UiMode, &[i64::from(value.code())])
            .await
    }

    /// Raw value of a system setting.
    ///
    /// Read through the address map, so models with the shifted read
    /// register are handled when the driver was built with
    /// [`AddressMap::SystemReadPlusOne`].
    #[instrument(skip(self), err)]
    pub async fn system_setting(&mut self, setting: SystemSetting) -> FgenResult<i64> {
        self.dispatcher.get(setting.command(), &[]).await?.scalar()
    }

    /// Write a system setting.
    #[instrument(skip(self), err)]
    pub async fn set_system_setting(&mut self, setting: SystemSetting, value: i64) -> FgenResult<()> {
        self.dispatcher.set(setting.command(), &[value]).await
    }

    // =========================================================================
    // Composite configuration
    // =========================================================================

    /// Apply several settings to one or both channels.
    ///
    /// Switching off happens before any other change and switching on after
    /// all of them, so an enabled output never shows a half-applied
    /// configuration. Other settings are applied as waveform, frequency,
    /// amplitude, offset, duty cycle.
    #[instrument(skip(self), err)]
    pub async fn configure_channel(
        &mut self,
        settings: &ChannelSettings,
        which: Channel,
    ) -> FgenResult<()> {
        if settings.output == Some(Output::Off) {
            self.set_channel_output(Output::Off, which).await?;
        }

        if let Some(waveform) = settings.waveform {
            self.set_waveform(waveform, which).await?;
        }
        if let Some(hz) = settings.frequency_hz {
            self.set_frequency(hz, which).await?;
        }
        if let Some(volts) = settings.amplitude_v {
            self.set_amplitude(volts, which).await?;
        }
        if let Some(volts) = settings.offset_v {
            self.set_offset(volts, which).await?;
        }
        if let Some(percent) = settings.duty_cycle_pct {
            self.set_duty_cycle(percent, which).await?;
        }

        if settings.output == Some(Output::On) {
            self.set_channel_output(Output::On, which).await?;
        }
        Ok(())
    }
}
