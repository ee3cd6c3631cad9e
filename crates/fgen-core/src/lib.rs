//! Core types and traits for fgen instrument drivers.
//!
//! - [`error`]: the shared [`FgenError`](error::FgenError) type
//! - [`serial`]: line transport over async serial ports
//! - [`channel`]: output channel selection and per-channel results

pub mod channel;
pub mod error;
pub mod serial;

pub use channel::{Channel, PerChannel};
pub use error::{FgenError, FgenResult};
pub use serial::{LineTransport, SerialTransport};
