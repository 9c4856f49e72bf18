use std::{env, error::Error};

use charmatrix::{Display, DisplayConfig, PollConfig, Poller, Sensor, SensorError, SerialLink, SystemClock};
use charmatrix_testing::VirtualDisplay;

/// Stand-in for a real sensor driver, drifting slowly through plausible indoor readings.
/// Every tenth reading fails, as cheap sensors occasionally do.
#[derive(Debug, Default)]
struct DriftingSensor {
    reads: u32,
}

impl DriftingSensor {
    fn next(&mut self, base: f32, span: f32) -> Result<f32, SensorError> {
        self.reads += 1;
        if self.reads % 10 == 0 {
            return Err(SensorError::NoReading);
        }
        let phase = (self.reads as f32 / 12.0).sin();
        Ok(base + span * phase)
    }
}

impl Sensor for DriftingSensor {
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        self.next(45.0, 10.0)
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.next(20.0, 3.5)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let double_buffered = args.iter().skip(1).any(|arg| arg == "--double-buffered");
    let (display_config, poll_config) = if double_buffered {
        let poll_config = PollConfig {
            double_buffered: true,
            ..Default::default()
        };
        (DisplayConfig::double_buffered(), poll_config)
    } else {
        (DisplayConfig::default(), PollConfig::default())
    };

    match args.iter().skip(1).find(|arg| !arg.starts_with("--")) {
        Some(port_name) => {
            // Drive a real display until the link fails.
            let port = serial::open(port_name)?;
            let link = SerialLink::try_new(port)?;
            let display = Display::try_new(link, SystemClock, display_config)?;
            let mut poller = Poller::new(display, DriftingSensor::default(), poll_config);
            let never = poller.run()?;
            match never {}
        }
        None => {
            println!("Usage: poll_sensor [serial_port] [--double-buffered]");
            println!();
            println!("serial_port should be a port name like /dev/ttyUSB0 or COM3");
            println!("Without a port, a few cycles are run against a virtual display.");
            println!();

            let display = Display::try_new(VirtualDisplay::new(), SystemClock, display_config)?;
            let mut poller = Poller::new(display, DriftingSensor::default(), poll_config);
            for outcome in poller.run_cycles(5)? {
                println!("{:?}", outcome);
            }

            // For testing purposes, print everything the virtual display received.
            for command in poller.display().link().commands() {
                println!("{}", command);
            }
            Ok(())
        }
    }
}
