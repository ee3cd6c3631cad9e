//! JDS6600 register map and linear unit conversions.
//!
//! Every setting or action is addressed by a two-digit register number. The
//! per-channel settings come in pairs, channel 1 first. The system settings
//! registers (51-55) are the only ones affected by the read-register quirk
//! handled in [`crate::dispatcher::AddressMap`].

wire_enum! {
    /// Register identifiers of the JDS6600 protocol.
    pub enum Command: u8 {
        // System info
        /// Model number; the value is the maximum frequency in MHz
        Model = 0,
        /// Device serial number
        SerialNumber = 1,

        // Waveform mode
        /// Output enable, always both channels together
        ChannelEnable = 20,
        /// Channel 1 waveform
        WaveformCh1 = 21,
        /// Channel 2 waveform
        WaveformCh2 = 22,
        /// Channel 1 frequency (raw value, unit code)
        FrequencyCh1 = 23,
        /// Channel 2 frequency (raw value, unit code)
        FrequencyCh2 = 24,
        /// Channel 1 amplitude in mV
        AmplitudeCh1 = 25,
        /// Channel 2 amplitude in mV
        AmplitudeCh2 = 26,
        /// Channel 1 offset in 10 mV, biased by 1000
        OffsetCh1 = 27,
        /// Channel 2 offset in 10 mV, biased by 1000
        OffsetCh2 = 28,
        /// Channel 1 duty cycle in 0.1 %
        DutyCycleCh1 = 29,
        /// Channel 2 duty cycle in 0.1 %
        DutyCycleCh2 = 30,
        /// Channel 2 phase relative to channel 1, in 0.1 degree
        Phase = 31,

        // System mode and UI control
        /// Mode action tuple; behaviour differs between firmware revisions
        Action = 32,
        /// Operating mode
        Mode = 33,
        /// Front panel cursor position
        UiMode = 34,

        // Measure mode
        /// Measurement input coupling
        MeasureCoupling = 36,
        /// Measurement gate time
        MeasureGateTime = 37,
        /// Measure frequency or period
        MeasureMode = 38,

        /// Reset the counter
        ResetCounter = 39,

        // Sweep mode
        /// Sweep start frequency
        SweepStartFreq = 40,
        /// Sweep end frequency
        SweepEndFreq = 41,
        /// Sweep time
        SweepTime = 42,
        /// Sweep direction
        SweepDirection = 43,
        /// Linear or logarithmic sweep
        SweepMode = 44,

        // Pulse mode
        /// Pulse width
        PulseTime = 45,
        /// Pulse period
        PulsePeriod = 46,
        /// Pulse offset
        PulseOffset = 47,
        /// Pulse amplitude
        PulseAmplitude = 48,

        // System settings
        /// Key sound on/off
        SystemSound = 51,
        /// Display brightness
        SystemBrightness = 52,
        /// Menu language
        SystemLanguage = 53,
        /// Channel sync
        SystemSync = 54,
        /// Number of arbitrary waveform slots
        SystemArbMaxNum = 55,

        // Profiles
        /// Save the current settings to a profile slot
        ProfileSave = 70,
        /// Load a profile slot
        ProfileLoad = 71,
        /// Clear a profile slot
        ProfileClear = 72,

        // Counter mode
        /// Counter value
        Counter = 80,

        // Measure mode readings
        /// Measured frequency, 10 Hz resolution
        MeasureFreq10Hz = 81,
        /// Measured frequency, 1000 Hz resolution
        MeasureFreq1000Hz = 82,
        /// Measured positive pulse width
        MeasurePulsePlus = 83,
        /// Measured negative pulse width
        MeasurePulseMinus = 84,
        /// Measured period
        MeasurePeriod = 85,
        /// Measured duty cycle
        MeasureDutyCycle = 86,
        /// Undocumented measurement register
        MeasureUnknown1 = 87,
        /// Undocumented measurement register
        MeasureUnknown2 = 88,
        /// Undocumented measurement register
        MeasureUnknown3 = 89,
    }
}

impl Command {
    /// Register number as sent on the wire.
    pub fn number(self) -> u8 {
        self.code()
    }

    /// Registers 51-55, whose read address is shifted on some models.
    pub fn is_system_setting(self) -> bool {
        matches!(
            self,
            Self::SystemSound
                | Self::SystemBrightness
                | Self::SystemLanguage
                | Self::SystemSync
                | Self::SystemArbMaxNum
        )
    }
}

/// Register pair for a per-channel setting, channel 1 first.
pub type ChannelCommands = (Command, Command);

/// Waveform registers.
pub const WAVEFORM: ChannelCommands = (Command::WaveformCh1, Command::WaveformCh2);
/// Frequency registers.
pub const FREQUENCY: ChannelCommands = (Command::FrequencyCh1, Command::FrequencyCh2);
/// Amplitude registers.
pub const AMPLITUDE: ChannelCommands = (Command::AmplitudeCh1, Command::AmplitudeCh2);
/// Offset registers.
pub const OFFSET: ChannelCommands = (Command::OffsetCh1, Command::OffsetCh2);
/// Duty cycle registers.
pub const DUTY_CYCLE: ChannelCommands = (Command::DutyCycleCh1, Command::DutyCycleCh2);

/// Linear conversions between physical units and register values.
pub mod scale {
    /// Amplitude register unit: 1 mV.
    pub const AMPLITUDE_PER_VOLT: f64 = 1000.0;
    /// Offset register unit: 10 mV.
    pub const OFFSET_PER_VOLT: f64 = 100.0;
    /// Offset register value for 0 V.
    pub const OFFSET_BIAS: i64 = 1000;
    /// Duty cycle register unit: 0.1 %.
    pub const DUTY_CYCLE_PER_PERCENT: f64 = 10.0;
    /// Phase register unit: 0.1 degree.
    pub const PHASE_PER_DEGREE: f64 = 10.0;

    /// Volts to millivolts.
    pub fn amplitude_to_device(volts: f64) -> i64 {
        (volts * AMPLITUDE_PER_VOLT).round() as i64
    }

    /// Millivolts to volts.
    pub fn amplitude_from_device(raw: i64) -> f64 {
        raw as f64 / AMPLITUDE_PER_VOLT
    }

    /// Volts to biased 10 mV units. -9.99 V is 1, +9.99 V is 1999.
    pub fn offset_to_device(volts: f64) -> i64 {
        (volts * OFFSET_PER_VOLT).round() as i64 + OFFSET_BIAS
    }

    /// Biased 10 mV units to volts.
    pub fn offset_from_device(raw: i64) -> f64 {
        (raw - OFFSET_BIAS) as f64 / OFFSET_PER_VOLT
    }

    /// Percent to tenths of a percent.
    pub fn duty_cycle_to_device(percent: f64) -> i64 {
        (percent * DUTY_CYCLE_PER_PERCENT).round() as i64
    }

    /// Tenths of a percent to percent.
    pub fn duty_cycle_from_device(raw: i64) -> f64 {
        raw as f64 / DUTY_CYCLE_PER_PERCENT
    }

    /// Degrees to tenths of a degree.
    pub fn phase_to_device(degrees: f64) -> i64 {
        (degrees * PHASE_PER_DEGREE).round() as i64
    }

    /// Tenths of a degree to degrees.
    pub fn phase_from_device(raw: i64) -> f64 {
        raw as f64 / PHASE_PER_DEGREE
    }
}
