//! A library for driving serial character-matrix display modules.
//!
//! Provides a way to connect to a display, redraw its temperature and humidity text fields,
//! and wait for the module to acknowledge each command. Every command is a fixed-layout frame
//! with a trailing additive checksum; the module answers each one with a single ACK or NAK byte.
//!
//! A [`Poller`] ties a [`Sensor`] to a [`Display`], refreshing both fields every couple of seconds.
//!
//! Intended only for hobbyist and educational purposes.
//!
//! # Examples
//!
//! ```no_run
//! use charmatrix::{Display, DisplayConfig, SerialLink, SystemClock};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! #
//! // Open and configure the port (19200 8N1).
//! let port = serial::open("/dev/ttyUSB0")?;
//! let link = SerialLink::try_new(port)?;
//!
//! // Waits for the module to settle and flushes any boot chatter.
//! let mut display = Display::try_new(link, SystemClock, DisplayConfig::default())?;
//!
//! // Each update clears the field, then draws the new value.
//! let status = display.update_temperature(18.5)?;
//! println!("Temperature: {:?}", status);
//! let status = display.update_humidity(45.0)?;
//! println!("Humidity: {:?}", status);
//! #
//! # Ok(()) }
//! ```
//!
//! # Sub-crates
//!
//! In addition to the high-level API of [`Display`], several lower-level components are provided
//! that can be combined for more specialized use-cases.
//!
//! - [`charmatrix-core`] \(re-exported as `core`\) contains the frame codec, commands, checksum,
//!   and response waiting, and is useful if you want to implement a custom [`Link`].
//! - [`charmatrix-serial`] \(re-exported as `serial`\) contains functions for configuring the serial port,
//!   as well as the implementation of [`SerialLink`].
//! - [`charmatrix-testing`] contains tools not directly related to driving displays,
//!   but useful for testing and debugging.
//!
//! [`charmatrix-core`]: https://docs.rs/charmatrix-core
//! [`charmatrix-serial`]: https://docs.rs/charmatrix-serial
//! [`charmatrix-testing`]: https://docs.rs/charmatrix-testing
#![doc(html_root_url = "https://docs.rs/charmatrix/0.1.0")]
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

pub use charmatrix_core as core;
pub use charmatrix_serial as serial;

mod display;
mod poll;

pub use self::display::{Display, DisplayConfig, DisplayError, FieldStatus};
pub use self::poll::{PollConfig, PollOutcome, Poller, Sensor, SensorError, SkipReason, MIN_READ_INTERVAL};

pub use crate::core::{
    Clock, Command, Field, Framebuffer, HumidityDigits, Link, Response, SystemClock, TemperatureDigits, Variant,
    WaitTiming,
};
pub use crate::serial::SerialLink;
