//! Tools for testing and debugging character-matrix display communications.
//!
//! For the basic task of updating a display, you likely want to use the high-level API
//! in the [`charmatrix`] crate instead.
//!
//! This crate isn't directly related to driving a real display, but provides some helpful diagnostic tools.
//! [`VirtualDisplay`] is a general-purpose mock of a display module that can be used as a
//! [`Link`](charmatrix_core::Link), [`FakeClock`] lets tests run the protocol's delays instantly,
//! and [`Emulator`] serves a virtual display over a real serial port.
//!
//! # Examples
//!
//! ```no_run
//! use charmatrix_testing::{Emulator, VirtualDisplay};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! // Pretend to be a display module on COM3.
//! let port = serial::open("COM3")?;
//! let mut emulator = Emulator::try_new(port, VirtualDisplay::new())?;
//! loop {
//!     emulator.process_frame()?;
//! }
//! #
//! # Ok(()) }
//! ```
//!
//! [`charmatrix`]: https://docs.rs/charmatrix
#![doc(html_root_url = "https://docs.rs/charmatrix-testing/0.1.0")]
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

mod emulator;
mod fake_clock;
mod virtual_display;

pub use self::emulator::{Emulator, EmulatorError};
pub use self::fake_clock::FakeClock;
pub use self::virtual_display::VirtualDisplay;
