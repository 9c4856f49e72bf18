use std::time::Duration;

use serial_core as serial;
use serial_core::prelude::*;

/// Configures the given serial port appropriately for use with the display module.
///
/// Specifically, the module requires 8N1 format at 19200 baud with no flow control.
/// Also sets the provided timeout value.
///
/// # Errors
///
/// Returns the underlying error if the serial port cannot be configured.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let mut port = serial::open("COM3")?;
/// charmatrix_serial::configure_port(&mut port, Duration::from_millis(1))?;
/// // Now ready for communication with a display (8N1 19200 baud).
/// #
/// # Ok(()) }
/// ```
pub fn configure_port<P: SerialPort>(port: &mut P, timeout: Duration) -> serial::Result<()> {
    port.reconfigure(&|settings| {
        settings.set_baud_rate(serial::Baud19200)?;
        settings.set_char_size(serial::Bits8);
        settings.set_parity(serial::ParityNone);
        settings.set_stop_bits(serial::Stop1);
        settings.set_flow_control(serial::FlowNone);
        Ok(())
    })?;
    port.set_timeout(timeout)?;
    Ok(())
}
