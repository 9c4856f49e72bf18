use std::{env, error::Error};

use charmatrix::{Field, Framebuffer};
use charmatrix_testing::{Emulator, VirtualDisplay};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: emulator <serial_port>");
        println!();
        println!("serial_port should be a port name like /dev/ttyUSB0 or COM3");
        println!("Frames from the controller on the other end are answered by a virtual display.");
        return Ok(());
    }

    let port = serial::open(&args[1])?;
    let mut emulator = Emulator::try_new(port, VirtualDisplay::new())?;
    loop {
        // Controller frames are forwarded to the virtual display and its answers sent back.
        match emulator.process_frame() {
            Ok(()) => {}
            Err(ref e) if e.is_timeout() => continue,
            Err(e) => return Err(e.into()),
        }

        let screen = emulator.display();
        println!(
            "[{}] [{}]",
            screen.text(Framebuffer::Foreground, Field::Temperature).unwrap_or("    "),
            screen.text(Framebuffer::Foreground, Field::Humidity).unwrap_or("  ")
        );
    }
}
