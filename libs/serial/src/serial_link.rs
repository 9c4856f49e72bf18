use std::error::Error;
use std::io::{self, Read, Write};
use std::time::Duration;

use log::{debug, trace};
use serial_core::prelude::*;

use charmatrix_core::Link;

use crate::serial_port;

/// Read timeout used when polling for a response byte.
///
/// Kept short so that a poll with nothing waiting returns promptly.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(1);

/// An implementation of [`Link`] that talks to a display module over a serial port.
///
/// Frames are written verbatim. Polling for a byte performs a single one-byte read with a short
/// timeout; a timeout means no byte is available.
///
/// Traffic is logged using the [`log`] crate for debugging purposes. Consuming binaries
/// typically use the [`env_logger`] crate and can be run with the `RUST_LOG=trace` environment variable
/// to watch the bytes go by.
///
/// # Examples
///
/// ```no_run
/// use charmatrix_serial::SerialLink;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let port = serial::open("/dev/ttyUSB0")?;
/// let link = SerialLink::try_new(port)?;
/// // Can now hand the link to a Display.
/// #
/// # Ok(()) }
/// ```
///
/// [`log`]: https://crates.io/crates/log
/// [`env_logger`]: https://crates.io/crates/env_logger
#[derive(Debug, Eq, PartialEq, Hash)]
pub struct SerialLink<P: SerialPort> {
    port: P,
}

impl<P: SerialPort> SerialLink<P> {
    /// Creates a new `SerialLink` that communicates over the specified serial port.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serial_core::Error`] if the serial port cannot be configured.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use charmatrix_serial::SerialLink;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// #
    /// let port = serial::open("COM3")?;
    /// let link = SerialLink::try_new(port)?;
    /// #
    /// # Ok(()) }
    /// ```
    pub fn try_new(mut port: P) -> Result<Self, serial_core::Error> {
        serial_port::configure_port(&mut port, POLL_TIMEOUT)?;
        debug!("Serial port configured for 19200 8N1");
        Ok(SerialLink { port })
    }

    /// Returns a reference to the underlying serial port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Consumes the link, returning the underlying serial port.
    pub fn into_port(self) -> P {
        self.port
    }
}

impl<P: SerialPort> Link for SerialLink<P> {
    fn send(&mut self, frame: &[u8]) -> Result<(), Box<dyn Error + Send + Sync>> {
        trace!("Serial write: {:02X?}", frame);
        self.port.write_all(frame)?;
        self.port.flush()?;
        Ok(())
    }

    fn receive_byte_if_available(&mut self) -> Result<Option<u8>, Box<dyn Error + Send + Sync>> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => {
                trace!("Serial read: {:02X}", buf[0]);
                Ok(Some(buf[0]))
            }
            Err(ref e) if is_timeout(e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Serial ports report "no data within the timeout" as an error; that is not a failure here.
fn is_timeout(error: &io::Error) -> bool {
    matches!(error.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}
