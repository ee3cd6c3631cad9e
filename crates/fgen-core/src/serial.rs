//! Serial Port Abstractions for Driver Crates
//!
//! This module provides the line-oriented transport that fgen drivers talk
//! through, and the serial port plumbing behind it.
//!
//! # Types
//!
//! - [`SerialPortIO`]: Trait alias combining AsyncRead + AsyncWrite for serial ports
//! - [`DynSerial`]: Type-erased boxed serial port
//! - [`LineTransport`]: Write a line, read a line, drain stale input
//! - [`SerialTransport`]: `LineTransport` over any [`SerialPortIO`]
//!
//! # Utilities
//!
//! - [`open_serial_async`]: Open a serial port with spawn_blocking
//! - [`drain_serial_buffer`]: Drain stale data from a serial port
//!
//! # Example
//!
//! ```rust,ignore
//! use fgen_core::serial::{LineTransport, SerialTransport};
//! use std::time::Duration;
//!
//! let mut transport = SerialTransport::open(
//!     "/dev/ttyUSB0",
//!     115200,
//!     Duration::from_millis(500),
//!     Duration::from_millis(20),
//! )
//! .await?;
//!
//! transport.drain_stale_input().await?;
//! transport.write_line(":r00=0.").await?;
//! let reply = transport.read_line().await?;
//! ```

use crate::error::{FgenError, FgenResult};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

// =============================================================================
// Serial Port Trait
// =============================================================================

/// Trait alias for async serial port I/O.
///
/// Any type implementing `AsyncRead + AsyncWrite + Unpin + Send` can be used
/// as a serial port. This includes:
/// - `tokio_serial::SerialStream` (real hardware)
/// - `tokio::io::DuplexStream` (testing)
pub trait SerialPortIO: AsyncRead + AsyncWrite + Unpin + Send {}

// Blanket implementation for all types meeting the requirements
impl<T: AsyncRead + AsyncWrite + Unpin + Send> SerialPortIO for T {}

/// Type-erased boxed serial port.
pub type DynSerial = Box<dyn SerialPortIO>;

/// Line terminator appended to every outgoing line.
pub const LINE_TERMINATOR: &str = "\r\n";

// =============================================================================
// Line Transport
// =============================================================================

/// A line-oriented duplex byte channel.
///
/// The transport is owned exclusively by one driver. Methods take `&mut self`
/// and nothing is locked internally; callers sharing a driver across tasks must
/// serialise access themselves.
#[async_trait]
pub trait LineTransport: Send {
    /// Write `line` followed by CR LF and flush.
    async fn write_line(&mut self, line: &str) -> FgenResult<()>;

    /// Block until one line arrives or the read deadline passes.
    ///
    /// The returned line is stripped of surrounding whitespace, including the
    /// terminator.
    async fn read_line(&mut self) -> FgenResult<String>;

    /// Bytes already received and buffered but not yet consumed.
    fn bytes_available(&self) -> usize;

    /// Read and discard everything already queued for reading.
    ///
    /// Returns the number of bytes discarded.
    async fn drain_stale_input(&mut self) -> FgenResult<usize>;
}

/// [`LineTransport`] over a buffered serial port.
pub struct SerialTransport<P = DynSerial> {
    port: BufReader<P>,
    /// Read deadline for one response line
    timeout: Duration,
    /// How long the drain waits for stragglers on the wire
    drain_window: Duration,
}

impl<P: SerialPortIO> SerialTransport<P> {
    /// Wrap an already-open port.
    pub fn new(port: P, timeout: Duration, drain_window: Duration) -> Self {
        Self {
            port: BufReader::new(port),
            timeout,
            drain_window,
        }
    }

    /// Read deadline applied to each response line.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Consume the transport and return the underlying port.
    pub fn into_inner(self) -> P {
        self.port.into_inner()
    }
}

impl SerialTransport<DynSerial> {
    /// Open `port_path` at `baud_rate` (8N1, no flow control).
    pub async fn open(
        port_path: &str,
        baud_rate: u32,
        timeout: Duration,
        drain_window: Duration,
    ) -> FgenResult<Self> {
        let port = open_serial_async(port_path, baud_rate).await?;
        tracing::info!(port = %port_path, baud_rate, "opened serial port");
        Ok(Self::new(Box::new(port), timeout, drain_window))
    }
}

#[async_trait]
impl<P: SerialPortIO> LineTransport for SerialTransport<P> {
    async fn write_line(&mut self, line: &str) -> FgenResult<()> {
        let port = self.port.get_mut();
        port.write_all(line.as_bytes()).await?;
        port.write_all(LINE_TERMINATOR.as_bytes()).await?;
        port.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> FgenResult<String> {
        let mut raw = Vec::new();
        match tokio::time::timeout(self.timeout, self.port.read_until(b'\n', &mut raw)).await {
            Ok(Ok(0)) => Err(FgenError::ConnectionClosed),
            Ok(Ok(_)) => match String::from_utf8(raw) {
                Ok(line) => Ok(line.trim().to_string()),
                // Line noise; the caller attaches the request it belongs to
                Err(e) => Err(FgenError::MalformedResponse {
                    request: String::new(),
                    response: String::from_utf8_lossy(e.as_bytes()).trim().to_string(),
                }),
            },
            Ok(Err(e)) => Err(FgenError::Io(e)),
            Err(_) => Err(FgenError::TransportTimeout {
                timeout: self.timeout,
            }),
        }
    }

    fn bytes_available(&self) -> usize {
        self.port.buffer().len()
    }

    async fn drain_stale_input(&mut self) -> FgenResult<usize> {
        // BufReader's internal buffer first, then whatever is still on the wire
        let buffered = self.port.buffer().len();
        self.port.consume(buffered);

        let pending = drain_serial_buffer(self.port.get_mut(), self.drain_window).await?;
        Ok(buffered + pending)
    }
}

// =============================================================================
// Serial Port Utilities
// =============================================================================

/// Open a serial port asynchronously using spawn_blocking.
///
/// Standard settings are applied: 8N1, no flow control.
///
/// # Errors
///
/// Returns an error if the port cannot be opened or spawn_blocking fails.
pub async fn open_serial_async(
    port_path: &str,
    baud_rate: u32,
) -> FgenResult<tokio_serial::SerialStream> {
    use tokio::task::spawn_blocking;
    use tokio_serial::SerialPortBuilderExt;

    let port_path_owned = port_path.to_string();

    spawn_blocking(move || {
        tokio_serial::new(&port_path_owned, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(FgenError::from)
    })
    .await
    .map_err(|e| FgenError::Io(std::io::Error::other(e)))?
}

/// Read and discard input until the port has nothing more to give.
///
/// Bytes that are ready are always consumed. With a nonzero `window` the
/// drain also waits up to that long for bytes still in flight, so a quiet
/// line costs the whole window. EOF ends the drain without error.
///
/// # Errors
///
/// Returns any I/O error other than `WouldBlock` reported by the port.
pub async fn drain_serial_buffer<R: AsyncRead + Unpin>(
    port: &mut R,
    window: Duration,
) -> FgenResult<usize> {
    let mut scratch = [0u8; 256];
    let deadline = tokio::time::Instant::now() + window;
    let mut discarded = 0;

    loop {
        // A zero timeout still polls the read once before expiring
        let wait = deadline.saturating_duration_since(tokio::time::Instant::now());
        match tokio::time::timeout(wait, port.read(&mut scratch)).await {
            Err(_) | Ok(Ok(0)) => return Ok(discarded),
            Ok(Ok(n)) => discarded += n,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(discarded),
            Ok(Err(e)) => return Err(FgenError::Io(e)),
        }
    }
}
