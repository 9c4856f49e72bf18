use std::fmt::{self, Display, Formatter};
use std::io::{self, Read, Write};

use thiserror::Error;

use crate::checksum;

/// First byte of every frame.
pub const STX: u8 = 0x02;

/// Last byte of every frame, following the checksum.
pub const CR: u8 = 0x0D;

/// Terminates the text field of frames that carry one. Included in the checksum.
pub const FIELD_TERMINATOR: u8 = 0x0A;

/// Smallest possible frame: STX, length, class, subclass, opcode, checksum, CR.
pub const MIN_FRAME_LEN: usize = 7;

/// Errors related to reading/writing [`Frame`]s of data.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FrameError {
    /// Failed reading/writing a [`Frame`] of data.
    #[error("Failed reading/writing a frame of data")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Data does not have the basic shape of a [`Frame`].
    #[error("Failed to parse invalid data [{}] into a Frame", hex_for_error(data))]
    InvalidFrame {
        /// The invalid frame data.
        data: Vec<u8>,
    },

    /// [`Frame`] length byte didn't match the number of bytes.
    #[error(
        "Frame data [{}] didn't match declared length: Expected {}, got {}",
        hex_for_error(data),
        expected,
        actual
    )]
    LengthMismatch {
        /// The invalid frame data.
        data: Vec<u8>,

        /// The declared frame length.
        expected: usize,

        /// The actual number of bytes.
        actual: usize,
    },

    /// [`Frame`] checksum didn't match declared checksum.
    #[error(
        "Frame checksum for [{}] didn't match declared checksum: Expected 0x{:02X}, got 0x{:02X}",
        hex_for_error(data),
        expected,
        actual
    )]
    BadChecksum {
        /// The invalid frame data.
        data: Vec<u8>,

        /// The checksum declared in the frame.
        expected: u8,

        /// The checksum computed over the frame.
        actual: u8,
    },
}

/// A complete, well-formed command frame.
///
/// This struct guarantees the framing invariants but ascribes no meaning
/// to the contents (that's [`Command`]'s job).
///
/// # Format Details
///
/// ```text
/// ┌─────┬─────┬───────┬──────────┬────────┬ ┄ ┬────────┬ ┄ ┬──────┬────────┬────┐
/// │ STX │ Len │ Class │ Subclass │ Opcode │...│ Payload│...│ (LF) │ Chksum │ CR │
/// └─────┴─────┴───────┴──────────┴────────┴ ┄ ┴────────┴ ┄ ┴──────┴────────┴────┘
///  └╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌ summed into Chksum ╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌┘
/// ```
///
/// `Len` is the length of the whole frame, from STX through CR. Frames carrying text end the text
/// with a line feed, which is part of the checksummed range. The checksum is the 8-bit wrapping sum
/// of every byte before it.
///
/// # Examples
///
/// ```
/// use charmatrix_core::Frame;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let frame = Frame::from_bytes(&[0x02, 0x09, 0x4C, 0x43, 0x46, 0x01, 0x00, 0xE1, 0x0D])?;
/// assert_eq!(0xE1, frame.checksum());
/// println!("Parsed frame is {}", frame);
/// #
/// # Ok(()) }
/// ```
///
/// [`Command`]: enum.Command.html
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Validates raw bytes as a frame.
    ///
    /// # Errors
    ///
    /// Returns:
    /// * [`FrameError::InvalidFrame`] if the data is too short or lacks the leading STX or trailing CR.
    /// * [`FrameError::LengthMismatch`] if the length byte does not match the data length.
    /// * [`FrameError::BadChecksum`] if the computed checksum does not match the declared one.
    ///
    /// # Examples
    ///
    /// ```
    /// # use charmatrix_core::{Frame, FrameError};
    /// let result = Frame::from_bytes(&[0x02, 0x09, 0x4C, 0x43, 0x46, 0x01, 0x00, 0xE0, 0x0D]);
    /// assert!(matches!(result, Err(FrameError::BadChecksum { expected: 0xE0, actual: 0xE1, .. })));
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < MIN_FRAME_LEN || bytes[0] != STX || bytes[bytes.len() - 1] != CR {
            return Err(FrameError::InvalidFrame { data: bytes.into() });
        }

        let declared = usize::from(bytes[1]);
        if declared != bytes.len() {
            return Err(FrameError::LengthMismatch {
                data: bytes.into(),
                expected: declared,
                actual: bytes.len(),
            });
        }

        let offset = bytes.len() - 2;
        let computed = checksum(bytes, offset);
        if computed != bytes[offset] {
            return Err(FrameError::BadChecksum {
                data: bytes.into(),
                expected: bytes[offset],
                actual: computed,
            });
        }

        Ok(Frame { bytes: bytes.into() })
    }

    /// Wraps bytes produced by an encoder that already upholds the framing invariants.
    pub(crate) fn from_encoded(bytes: Vec<u8>) -> Self {
        debug_assert!(Frame::from_bytes(&bytes).is_ok(), "encoder produced a malformed frame");
        Frame { bytes }
    }

    /// Returns the wire representation of the frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the frame and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the total length of the frame in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the frame has no bytes, which a validated frame never does.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the `(class, subclass, opcode)` triple identifying the command.
    pub fn opcode(&self) -> (u8, u8, u8) {
        (self.bytes[2], self.bytes[3], self.bytes[4])
    }

    /// Returns the offset of the checksum byte.
    pub fn checksum_offset(&self) -> usize {
        self.bytes.len() - 2
    }

    /// Returns the frame's checksum byte.
    pub fn checksum(&self) -> u8 {
        self.bytes[self.checksum_offset()]
    }

    /// Writes the frame to a writer.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Io`] if the write fails.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), FrameError> {
        writer.write_all(&self.bytes)?;
        Ok(())
    }

    /// Reads the next frame from the reader.
    ///
    /// Bytes before the next STX are skipped. The length byte determines how much more to read,
    /// so a checksum that happens to equal CR does not end the frame early.
    ///
    /// # Errors
    ///
    /// Returns:
    /// * [`FrameError::Io`] if the read fails.
    /// * Any error from [`from_bytes`](Self::from_bytes) if the data is not a valid frame.
    ///
    /// # Examples
    ///
    /// ```
    /// # use charmatrix_core::Frame;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// #
    /// let mut buffer = &[0xFF, 0x02, 0x09, 0x4C, 0x43, 0x46, 0x01, 0x00, 0xE1, 0x0D][..];
    /// let frame = Frame::read(&mut buffer)?;
    /// assert_eq!(9, frame.len());
    /// #
    /// # Ok(()) }
    /// ```
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, FrameError> {
        let data = Frame::read_raw(reader)?;
        if data.len() < MIN_FRAME_LEN {
            return Err(FrameError::InvalidFrame { data });
        }
        Frame::from_bytes(&data)
    }

    /// Reads the bytes of the next frame from the reader without validating them.
    ///
    /// Framing works as in [`read`](Self::read). If the length byte is too small for any frame,
    /// only the STX and length byte are returned. Useful for passing corrupt frames along to
    /// something that must answer them, as a device would.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the read fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use charmatrix_core::Frame;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// #
    /// // Flip frame with a corrupt checksum.
    /// let mut buffer = &[0x02, 0x09, 0x4C, 0x43, 0x46, 0x01, 0x00, 0xE2, 0x0D][..];
    /// let data = Frame::read_raw(&mut buffer)?;
    /// assert_eq!(9, data.len());
    /// assert!(Frame::from_bytes(&data).is_err());
    /// #
    /// # Ok(()) }
    /// ```
    pub fn read_raw<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
        let mut byte = [0u8; 1];
        loop {
            reader.read_exact(&mut byte)?;
            if byte[0] == STX {
                break;
            }
            log::trace!("Skipping byte {:02X} before start of frame", byte[0]);
        }

        reader.read_exact(&mut byte)?;
        let declared = usize::from(byte[0]);
        if declared < MIN_FRAME_LEN {
            return Ok(vec![STX, byte[0]]);
        }

        let mut data = vec![0u8; declared];
        data[0] = STX;
        data[1] = byte[0];
        reader.read_exact(&mut data[2..])?;
        Ok(data)
    }
}

impl Display for Frame {
    /// Formats the frame as space-separated hex bytes.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Formats a supposed frame for display as part of an error message.
fn hex_for_error(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect::<Vec<_>>().join(" ")
}
