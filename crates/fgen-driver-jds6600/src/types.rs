//! Value tables for JDS6600 registers.

use serde::{Deserialize, Serialize};

wire_enum! {
    /// Output enable state of a channel.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Output: u8 {
        /// Output disabled
        Off = 0,
        /// Output enabled
        On = 1,
    }
}

wire_enum! {
    /// Built-in and arbitrary waveforms.
    ///
    /// Arbitrary slots above 15 depend on the "arbitrary max" system setting
    /// and are not listed.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    #[allow(missing_docs)]
    pub enum Waveform: u8 {
        Sine = 0,
        Square = 1,
        Pulse = 2,
        Triangle = 3,
        PartialSine = 4,
        Cmos = 5,
        Dc = 6,
        HalfWave = 7,
        FullWave = 8,
        PositiveStep = 9,
        NegativeStep = 10,
        Noise = 11,
        ExponentialRise = 12,
        ExponentialDecay = 13,
        MultiTone = 14,
        Sync = 15,
        Lorenz = 16,
        Arbitrary1 = 101,
        Arbitrary2 = 102,
        Arbitrary3 = 103,
        Arbitrary4 = 104,
        Arbitrary5 = 105,
        Arbitrary6 = 106,
        Arbitrary7 = 107,
        Arbitrary8 = 108,
        Arbitrary9 = 109,
        Arbitrary10 = 110,
        Arbitrary11 = 111,
        Arbitrary12 = 112,
        Arbitrary13 = 113,
        Arbitrary14 = 114,
        Arbitrary15 = 115,
    }
}

wire_enum! {
    /// Front panel cursor positions, used with [`Command::UiMode`](crate::Command::UiMode).
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    #[allow(missing_docs)]
    pub enum UiMode: u8 {
        // Waveform screen
        WaveCh1 = 0,
        WaveCh1Waveform = 1,
        WaveCh1Frequency = 2,
        WaveCh1Amplitude = 3,
        WaveCh1Offset = 4,
        WaveCh1DutyCycle = 5,
        WaveCh1Phase = 6,
        WaveCh2 = 8,
        WaveCh2Waveform = 9,
        WaveCh2Frequency = 10,
        WaveCh2Amplitude = 11,
        WaveCh2Offset = 12,
        WaveCh2DutyCycle = 13,
        WaveCh2Phase = 14,

        // System screen
        SystemSaveAndLoad = 32,
        SystemSound = 33,
        SystemBrightness = 34,
        SystemLanguage = 35,
        SystemSync = 36,
        SystemArbMaxNum = 37,
        SystemRestoreDefaults = 38,

        // Measure screen
        Measure = 64,
        MeasureCoupling = 65,
        MeasureGateTime = 66,
        MeasureMode = 67,

        Counter = 72,
        CounterCoupling = 73,
        CounterMode = 74,

        // Modulation screen
        SweepCh1 = 80,
        SweepCh2 = 88,
        Pulse = 96,
        Burst = 104,
    }
}

wire_enum! {
    /// Measurement input coupling.
    #[allow(missing_docs)]
    pub enum MeasureCoupling: u8 {
        Ac = 0,
        Dc = 1,
    }
}

wire_enum! {
    /// Measure frequency or period.
    #[allow(missing_docs)]
    pub enum MeasureMode: u8 {
        Frequency = 0,
        Period = 1,
    }
}

wire_enum! {
    /// Sweep direction.
    #[allow(missing_docs)]
    pub enum SweepDirection: u8 {
        Rise = 0,
        Fall = 1,
        RiseAndFall = 2,
    }
}

wire_enum! {
    /// Sweep law.
    #[allow(missing_docs)]
    pub enum SweepMode: u8 {
        Linear = 0,
        Log = 1,
    }
}

wire_enum! {
    /// Burst trigger source.
    #[allow(missing_docs)]
    pub enum BurstMode: u8 {
        ManualTrigger = 0,
        Ch2Trigger = 1,
        AcTrigger = 2,
        DcTrigger = 3,
    }
}

/// System settings stored in registers 51-55.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemSetting {
    /// Key sound on/off
    Sound,
    /// Display brightness
    Brightness,
    /// Menu language
    Language,
    /// Channel sync
    Sync,
    /// Number of arbitrary waveform slots
    ArbMaxNum,
}

impl SystemSetting {
    /// Register holding this setting.
    pub fn command(self) -> crate::Command {
        use crate::Command;
        match self {
            Self::Sound => Command::SystemSound,
            Self::Brightness => Command::SystemBrightness,
            Self::Language => Command::SystemLanguage,
            Self::Sync => Command::SystemSync,
            Self::ArbMaxNum => Command::SystemArbMaxNum,
        }
    }
}

impl std::str::FromStr for SystemSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sound" => Ok(Self::Sound),
            "brightness" => Ok(Self::Brightness),
            "language" => Ok(Self::Language),
            "sync" => Ok(Self::Sync),
            "arb_max_num" => Ok(Self::ArbMaxNum),
            other => Err(format!("unknown system setting '{other}'")),
        }
    }
}
