//! Output channel selection for dual-channel instruments.

use serde::{Deserialize, Serialize};

/// Which output channel(s) an operation targets.
///
/// Used only to route an operation; the instrument never stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Channel 1 only
    Ch1,
    /// Channel 2 only
    Ch2,
    /// Channel 1, then channel 2
    #[default]
    Both,
    /// No channel; operations are no-ops
    None,
}

impl Channel {
    /// Slot index of a single channel (`Ch1` = 0, `Ch2` = 1).
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Ch1 => Some(0),
            Self::Ch2 => Some(1),
            Self::Both | Self::None => None,
        }
    }

    /// Select one entry of a per-channel pair.
    pub fn select<T: Copy>(self, pair: (T, T)) -> Option<T> {
        match self {
            Self::Ch1 => Some(pair.0),
            Self::Ch2 => Some(pair.1),
            Self::Both | Self::None => None,
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "ch1" => Ok(Self::Ch1),
            "2" | "ch2" => Ok(Self::Ch2),
            "both" => Ok(Self::Both),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown channel '{other}' (expected 1, 2, both or none)"
            )),
        }
    }
}

/// Result of a read fanned out over [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerChannel<T> {
    /// No channel was selected, nothing was read
    Empty,
    /// A single channel was read
    One(T),
    /// Both channels were read, channel 1 first
    Both(T, T),
}
