//! Tools for communicating with character-matrix display modules over serial.
//!
//! For the basic task of updating a display, you likely want to use the high-level API
//! in the [`charmatrix`] crate instead.
//!
//! However, you can use the [`configure_port`] function to configure a serial port appropriately
//! if you're doing custom lower-level communication.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! let mut port = serial::open("COM3")?;
//! charmatrix_serial::configure_port(&mut port, Duration::from_millis(1))?;
//! // Now ready for communication with a display (8N1 19200 baud).
//! #
//! # Ok(()) }
//! ```
//!
//! [`charmatrix`]: https://docs.rs/charmatrix
#![doc(html_root_url = "https://docs.rs/charmatrix-serial/0.1.0")]
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

mod serial_link;
mod serial_port;

pub use self::serial_link::{SerialLink, POLL_TIMEOUT};
pub use self::serial_port::configure_port;
