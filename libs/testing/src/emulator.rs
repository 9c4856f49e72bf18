use std::io::{self, Write};
use std::time::Duration;

use log::debug;
use serial_core::prelude::*;
use thiserror::Error;

use charmatrix_core::{Frame, FrameError, Link};

/// Errors related to [`Emulator`]s.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmulatorError {
    /// The serial port could not be configured.
    #[error("Failed to configure serial port")]
    Configuration {
        /// The underlying serial error.
        #[from]
        source: serial_core::Error,
    },

    /// A frame could not be read from the controller or the response could not be written.
    #[error("Failed to exchange data with the controller")]
    Frame {
        /// The underlying frame error.
        #[from]
        source: FrameError,
    },

    /// The emulated display's link failed.
    #[error("Emulated display failed to process frame")]
    Display {
        /// The underlying link error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EmulatorError {
    /// Returns `true` if the controller sent nothing before the serial port's read timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            EmulatorError::Frame {
                source: FrameError::Io { source },
            } => source.kind() == io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

/// Serves an emulated display module over a real serial port.
///
/// Typically the emulated side is a [`VirtualDisplay`](crate::VirtualDisplay), which lets you point a
/// controller (this library or any other) at a serial port and study the traffic or the resulting
/// screen contents without the hardware.
///
/// # Examples
///
/// ```no_run
/// use charmatrix_testing::{Emulator, VirtualDisplay};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let port = serial::open("/dev/ttyUSB0")?;
/// let mut emulator = Emulator::try_new(port, VirtualDisplay::new())?;
/// loop {
///     // Frames from the controller are answered by the virtual display.
///     emulator.process_frame()?;
/// }
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Emulator<P: SerialPort, L: Link> {
    port: P,
    display: L,
}

impl<P: SerialPort, L: Link> Emulator<P, L> {
    /// Creates a new `Emulator` that connects the specified serial port and emulated display.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::Configuration`] if the serial port cannot be configured.
    ///
    /// Note: You would typically use the `env_logger` crate and run with
    /// `RUST_LOG=debug` to watch the frames go by.
    pub fn try_new(mut port: P, display: L) -> Result<Self, EmulatorError> {
        charmatrix_serial::configure_port(&mut port, Duration::from_secs(10))?;
        Ok(Emulator { port, display })
    }

    /// Returns a reference to the serial port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Returns a reference to the emulated display.
    pub fn display(&self) -> &L {
        &self.display
    }

    /// Reads the next frame from the controller, hands it to the emulated display,
    /// and writes back whatever the display answers.
    ///
    /// Frames are passed on unvalidated, so a corrupt frame is answered by the display
    /// (with a NAK, for a [`VirtualDisplay`](crate::VirtualDisplay)) rather than dropped.
    ///
    /// # Errors
    ///
    /// Returns:
    /// * [`EmulatorError::Frame`] if a frame could not be read or the answer could not be written.
    ///   See [`EmulatorError::is_timeout`] for telling an idle controller apart from a failure.
    /// * [`EmulatorError::Display`] if the emulated display failed.
    pub fn process_frame(&mut self) -> Result<(), EmulatorError> {
        let data = Frame::read_raw(&mut self.port).map_err(FrameError::from)?;
        debug!("Controller frame: {:02X?}", data);

        self.display
            .send(&data)
            .map_err(|source| EmulatorError::Display { source })?;

        let mut answer = Vec::new();
        while let Some(byte) = self
            .display
            .receive_byte_if_available()
            .map_err(|source| EmulatorError::Display { source })?
        {
            answer.push(byte);
        }

        if !answer.is_empty() {
            debug!(" Display answer: {:02X?}", answer);
            self.port
                .write_all(&answer)
                .map_err(|e| EmulatorError::Frame { source: e.into() })?;
        }
        Ok(())
    }
}
