//! Single get/set exchanges over a [`LineTransport`].
//!
//! Every exchange drains stale input, writes one request line and reads one
//! response line. There are no request identifiers in this protocol, so a
//! leftover line from an earlier exchange would otherwise be taken as the
//! answer to the next request.

use crate::command::Command;
use crate::frame::{self, Reply};
use fgen_core::{FgenError, FgenResult, LineTransport};
use serde::{Deserialize, Serialize};

/// How register numbers are resolved for reads and writes.
///
/// Some models expose the read register of the system settings (51-55) at
/// the write register + 1. Writes are never shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressMap {
    /// Read and write the same register
    #[default]
    Direct,
    /// Read system settings from register + 1
    SystemReadPlusOne,
}

impl AddressMap {
    /// Map for the `fix_read_bug` configuration flag.
    pub fn from_read_bug(fix_read_bug: bool) -> Self {
        if fix_read_bug {
            Self::SystemReadPlusOne
        } else {
            Self::Direct
        }
    }

    /// Register number to read `command` from.
    pub fn read_address(self, command: Command) -> u8 {
        match self {
            Self::SystemReadPlusOne if command.is_system_setting() => command.number() + 1,
            Self::Direct | Self::SystemReadPlusOne => command.number(),
        }
    }

    /// Register number to write `command` to.
    pub fn write_address(self, command: Command) -> u8 {
        command.number()
    }
}

/// Issues get and set commands and validates the replies.
pub struct Dispatcher<T> {
    transport: T,
    addresses: AddressMap,
}

impl<T: LineTransport> Dispatcher<T> {
    /// Take ownership of `transport`.
    pub fn new(transport: T, addresses: AddressMap) -> Self {
        Self {
            transport,
            addresses,
        }
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Read `command`. An empty `args` is sent as `0`.
    pub async fn get(&mut self, command: Command, args: &[i64]) -> FgenResult<Reply> {
        self.get_with(command, args, self.addresses).await
    }

    /// Read `command`, resolving its register with `addresses` for this call only.
    pub async fn get_with(
        &mut self,
        command: Command,
        args: &[i64],
        addresses: AddressMap,
    ) -> FgenResult<Reply> {
        self.get_raw(addresses.read_address(command), args).await
    }

    /// Write `command`. At least one argument is required.
    pub async fn set(&mut self, command: Command, args: &[i64]) -> FgenResult<()> {
        self.set_raw(self.addresses.write_address(command), args)
            .await
    }

    /// Read a register by number.
    pub async fn get_raw(&mut self, address: u8, args: &[i64]) -> FgenResult<Reply> {
        let request = frame::encode_get(address, args)?;
        let response = self.exchange(&request).await?;
        frame::decode_get_response(address, &request, &response)
    }

    /// Write a register by number.
    pub async fn set_raw(&mut self, address: u8, args: &[i64]) -> FgenResult<()> {
        let request = frame::encode_set(address, args)?;
        let response = self.exchange(&request).await?;
        frame::decode_set_response(&request, &response)
    }

    async fn exchange(&mut self, request: &str) -> FgenResult<String> {
        let discarded = self.transport.drain_stale_input().await?;
        if discarded > 0 {
            tracing::debug!(discarded, "flushed stale input before request");
        }

        tracing::debug!(%request, "[cmd]");
        self.transport.write_line(request).await?;

        let response = self
            .transport
            .read_line()
            .await
            .map_err(|err| match err {
                FgenError::MalformedResponse { request: _, response } => {
                    FgenError::MalformedResponse {
                        request: request.to_string(),
                        response,
                    }
                }
                other => other,
            })?;
        tracing::debug!(%response, "[ret]");
        Ok(response)
    }
}
