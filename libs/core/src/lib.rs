//! Core types for describing communication with serial character-matrix display modules.
//!
//! For the basic task of updating a display, you likely want to use the high-level API
//! in the [`charmatrix`] crate instead.
//!
//! However, `charmatrix_core` is useful for crates that want to interact with the command protocol
//! at a lower level than the `charmatrix` crate, or who want to provide their own [`Link`]
//! implementations for use by `charmatrix`.
//!
//! The protocol is a synchronous request/response exchange: the controller sends one binary
//! [`Frame`], then waits for the module to answer with a single ACK or NAK byte before sending
//! the next one.
//!
//! # Examples
//!
//! ```
//! use charmatrix_core::{checksum, Command, Field, Frame, Framebuffer, HumidityDigits, Variant};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! // Build the frames that redraw the humidity field.
//! let clear = Frame::from(Command::Clear(Framebuffer::Foreground, Field::Humidity));
//! let digits = HumidityDigits::from_percent(45.0)?;
//! let draw = Frame::from(Command::DrawHumidity(Framebuffer::Foreground, Variant::DrawAndShow, digits));
//!
//! // Every frame carries the additive checksum of the bytes before it.
//! for frame in &[clear, draw] {
//!     assert_eq!(checksum(frame.as_bytes(), frame.checksum_offset()), frame.checksum());
//! }
//! #
//! # Ok(()) }
//! ```
//!
//! [`charmatrix`]: https://docs.rs/charmatrix
#![doc(html_root_url = "https://docs.rs/charmatrix-core/0.1.0")]
#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![warn(
    missing_docs,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]

mod checksum;
mod clock;
mod command;
mod format;
mod frame;
mod link;
mod response;
mod template;
mod waiter;

pub use self::checksum::checksum;
pub use self::clock::{Clock, SystemClock};
pub use self::command::{Command, Field, Framebuffer, ObjectId, Rect, Variant};
pub use self::format::{FormatError, HumidityDigits, TemperatureDigits};
pub use self::frame::{Frame, FrameError, CR, FIELD_TERMINATOR, MIN_FRAME_LEN, STX};
pub use self::link::Link;
pub use self::response::{Response, ACK, NAK, NO_RESPONSE};
pub use self::waiter::{wait_for_response, WaitTiming, MIN_POLL_INTERVAL};
