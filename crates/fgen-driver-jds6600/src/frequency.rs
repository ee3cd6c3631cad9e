//! Frequency encoding.
//!
//! The device only accepts whole-number frequency values, tagged with one of
//! several fixed-point timebases. A frequency in Hz is encoded by trying the
//! timebases from `Hz` to `mHz` to `uHz` and keeping the first one whose value
//! is an exact integer and whose range ceiling is not exceeded. When no
//! lossless encoding is legal the finest legal timebase is used and the value
//! rounded.
//!
//! | Unit  | Code | Scale (raw per Hz) | Ceiling (Hz) |
//! |-------|------|--------------------|--------------|
//! | Hz    | 0    | 100                | 3e9          |
//! | KHz   | 1    | 100                | 3e9          |
//! | MHz   | 2    | 100                | 3e9          |
//! | mHz   | 3    | 100 000            | 8e4          |
//! | uHz   | 4    | 100 000 000        | 80           |
//!
//! `KHz` and `MHz` share the `Hz` scale: the unit code only changes how the
//! front panel displays the value. The encoder never selects them, but the
//! device may report them.

use serde::{Deserialize, Serialize};

wire_enum! {
    /// Frequency timebase, sent as the second argument of the frequency registers.
    #[derive(Serialize, Deserialize)]
    pub enum FrequencyUnit: u8 {
        /// Hertz
        Hz = 0,
        /// Kilohertz (display only)
        KHz = 1,
        /// Megahertz (display only)
        MHz = 2,
        /// Millihertz
        #[serde(rename = "mHz")]
        MilliHz = 3,
        /// Microhertz
        #[serde(rename = "uHz")]
        MicroHz = 4,
    }
}

impl FrequencyUnit {
    /// Multiply a Hz value by this to get the raw integer for this unit.
    pub fn scale(self) -> f64 {
        match self {
            Self::Hz | Self::KHz | Self::MHz => 100.0,
            Self::MilliHz => 100_000.0,
            Self::MicroHz => 100_000_000.0,
        }
    }

    /// Highest frequency in Hz this unit may encode.
    pub fn ceiling(self) -> f64 {
        match self {
            Self::Hz | Self::KHz | Self::MHz => 3_000_000_000.0,
            Self::MilliHz => 80_000.0,
            Self::MicroHz => 80.0,
        }
    }
}

/// A frequency as the device encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFrequency {
    /// Raw register value
    pub raw: i64,
    /// Timebase of `raw`
    pub unit: FrequencyUnit,
}

impl DeviceFrequency {
    /// Register arguments `[raw, unit]`.
    pub fn args(self) -> [i64; 2] {
        [self.raw, i64::from(self.unit.code())]
    }

    /// Decode the `(raw, unit)` pair reported by a frequency register.
    pub fn from_args(raw: i64, unit: i64) -> fgen_core::FgenResult<Self> {
        Ok(Self {
            raw,
            unit: FrequencyUnit::try_from(unit)?,
        })
    }

    /// Frequency in Hz.
    pub fn hz(self) -> f64 {
        from_device(self.raw, self.unit)
    }
}

struct Candidate {
    exact: bool,
    encoded: DeviceFrequency,
}

fn candidate(freq_hz: f64, unit: FrequencyUnit) -> Candidate {
    let value = freq_hz * unit.scale();
    Candidate {
        exact: value.fract() == 0.0,
        encoded: DeviceFrequency {
            raw: value.round() as i64,
            unit,
        },
    }
}

/// Encode `freq_hz` in the most precise legal timebase.
pub fn to_device(freq_hz: f64) -> DeviceFrequency {
    let hz = candidate(freq_hz, FrequencyUnit::Hz);
    tracing::trace!(freq_hz, raw = hz.encoded.raw, exact = hz.exact, "Hz candidate");
    if hz.exact || freq_hz > FrequencyUnit::Hz.ceiling() {
        return hz.encoded;
    }

    // Finer units must fit under their ceiling, or the previous unit stands
    if freq_hz > FrequencyUnit::MilliHz.ceiling() {
        return hz.encoded;
    }
    let mhz = candidate(freq_hz, FrequencyUnit::MilliHz);
    tracing::trace!(freq_hz, raw = mhz.encoded.raw, exact = mhz.exact, "mHz candidate");
    if mhz.exact {
        return mhz.encoded;
    }

    if freq_hz > FrequencyUnit::MicroHz.ceiling() {
        return mhz.encoded;
    }
    candidate(freq_hz, FrequencyUnit::MicroHz).encoded
}

/// Decode a raw register value in `unit` to Hz.
///
/// No range check is applied.
pub fn from_device(raw: i64, unit: FrequencyUnit) -> f64 {
    raw as f64 / unit.scale()
}
