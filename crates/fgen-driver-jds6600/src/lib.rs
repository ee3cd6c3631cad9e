//! JDS6600 function generator driver for fgen.
//!
//! The JDS6600 family (and its rebadged variants) speaks a line-oriented
//! ASCII protocol of numbered registers over a USB serial bridge.
//!
//! - [`frame`]: request/response line codec
//! - [`dispatcher`]: single get/set exchanges and register address resolution
//! - [`channel`]: fan-out over the channel 1 / channel 2 register pairs
//! - [`frequency`]: Hz to timebase encoding
//! - [`driver`]: the [`Jds6600`] facade in physical units
//!
//! # Usage
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! fgen-driver-jds6600 = { path = "../fgen-driver-jds6600" }
//! ```

#[macro_use]
mod macros;

pub mod channel;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod driver;
pub mod frame;
pub mod frequency;
pub mod types;

pub use command::Command;
pub use config::{ChannelSettings, Jds6600Config};
pub use dispatcher::{AddressMap, Dispatcher};
pub use driver::Jds6600;
pub use frame::Reply;
pub use frequency::{DeviceFrequency, FrequencyUnit};
pub use types::{
    BurstMode, MeasureCoupling, MeasureMode, Output, SweepDirection, SweepMode, SystemSetting,
    UiMode, Waveform,
};
