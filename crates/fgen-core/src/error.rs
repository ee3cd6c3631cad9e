//! Error types shared by fgen drivers.
//!
//! `FgenError` is the single error type returned by the transport, the frame
//! codec and every driver built on top of them. Protocol errors carry both the
//! request line that was sent and the response line that was received, so a
//! desynchronised exchange can be diagnosed from the error message alone.
//!
//! ## Error Categories
//!
//! - **Transport**: `TransportTimeout`, `ConnectionClosed`, `Io`.
//!   Nothing is retried; the caller may retry the whole operation.
//! - **Protocol**: `ProtocolMismatch`, `MalformedResponse`, `NotAcknowledged`.
//!   Indicate desynchronisation or a firmware disagreement.
//! - **Caller**: `InvalidArgument`, `Configuration`. Raised before any I/O.
//! - **Decoding**: `UnknownCode` for an integer outside a lookup table.

use std::time::Duration;
use thiserror::Error;

/// Convenience alias for results using the fgen error type.
pub type FgenResult<T> = std::result::Result<T, FgenError>;

/// Primary error type for fgen drivers.
#[derive(Error, Debug)]
pub enum FgenError {
    /// No response line arrived within the configured read deadline.
    #[error("No response within {timeout:?}")]
    TransportTimeout {
        /// Deadline that expired.
        timeout: Duration,
    },

    /// The response framing or echoed command number did not match the request.
    #[error("Protocol mismatch: [cmd] {request} [ret] {response}")]
    ProtocolMismatch {
        /// Request line as sent.
        request: String,
        /// Response line as received.
        response: String,
    },

    /// The response could not be parsed.
    #[error("Malformed response: [cmd] {request} [ret] {response}")]
    MalformedResponse {
        /// Request line as sent.
        request: String,
        /// Response line as received.
        response: String,
    },

    /// A decoded integer is not a member of the expected lookup table.
    #[error("{value} is not a valid {what}")]
    UnknownCode {
        /// Name of the lookup table.
        what: &'static str,
        /// Offending value.
        value: i64,
    },

    /// A well-formed response carried a different number of values than the register holds.
    #[error("Expected {expected} value(s), got {values:?}")]
    UnexpectedArity {
        /// Number of values the register holds.
        expected: usize,
        /// Values actually received.
        values: Vec<i64>,
    },

    /// The caller supplied an argument that can never be sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A set command was answered with something other than the acknowledgment token.
    #[error("Not acknowledged: [cmd] {request} [ret] {response}")]
    NotAcknowledged {
        /// Request line as sent.
        request: String,
        /// Response line as received.
        response: String,
    },

    /// The serial stream reached EOF.
    #[error("Serial connection closed")]
    ConnectionClosed,

    /// Configuration validation failed.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// Standard I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FgenError {
    /// Build an [`FgenError::InvalidArgument`] from any message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<tokio_serial::Error> for FgenError {
    fn from(err: tokio_serial::Error) -> Self {
        Self::Io(err.into())
    }
}
