use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::Duration;

use serial_core::{PortSettings, SerialDevice};

#[allow(dead_code)] // Tests use different subsets of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialFailure {
    None,
    WriteSettings,
    Read,
    Write,
}

/// Mock serial port implementation that reads data from a queue and records writes.
///
/// Reading with nothing queued times out, like a real port with no incoming data.
/// Each write can optionally queue a canned reply, simulating a device answering a frame.
#[derive(Debug, Clone)]
pub struct MockSerialPort {
    failure: SerialFailure,
    pending: VecDeque<u8>,
    replies: VecDeque<Vec<u8>>,
    written: Vec<u8>,
    settings: PortSettings,
    timeout: Duration,
}

#[allow(dead_code)] // Not used by all tests.
impl MockSerialPort {
    pub fn new(data: Vec<u8>, failure: SerialFailure) -> Self {
        MockSerialPort {
            failure,
            pending: data.into(),
            replies: VecDeque::new(),
            written: Vec::new(),
            // Initialize settings to some weird defaults to verify we set them correctly later.
            settings: PortSettings {
                baud_rate: serial_core::BaudRate::Baud110,
                char_size: serial_core::CharSize::Bits7,
                parity: serial_core::Parity::ParityEven,
                stop_bits: serial_core::StopBits::Stop2,
                flow_control: serial_core::FlowControl::FlowSoftware,
            },
            timeout: Duration::from_secs(0),
        }
    }

    /// Queues one reply per subsequent write.
    pub fn with_replies(mut self, replies: Vec<Vec<u8>>) -> Self {
        self.replies = replies.into();
        self
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn done(&self) {
        assert!(self.pending.is_empty(), "unread data: {:02X?}", self.pending);
        assert!(self.replies.is_empty(), "unused replies: {:02X?}", self.replies);
    }
}

impl Read for MockSerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.failure == SerialFailure::Read {
            return Err(io::Error::new(io::ErrorKind::Other, "Dummy I/O error"));
        }
        if self.pending.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "Operation timed out"));
        }

        let count = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }
}

impl Write for MockSerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failure == SerialFailure::Write {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "Dummy I/O error"));
        }
        self.written.extend_from_slice(buf);
        if let Some(reply) = self.replies.pop_front() {
            self.pending.extend(reply);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SerialDevice for MockSerialPort {
    type Settings = PortSettings;

    fn read_settings(&self) -> serial_core::Result<Self::Settings> {
        Ok(self.settings)
    }

    fn write_settings(&mut self, settings: &Self::Settings) -> serial_core::Result<()> {
        match self.failure {
            SerialFailure::WriteSettings => Err(serial_core::Error::new(
                serial_core::ErrorKind::NoDevice,
                "Dummy serial error",
            )),
            _ => {
                self.settings = *settings;
                Ok(())
            }
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn set_timeout(&mut self, timeout: Duration) -> serial_core::Result<()> {
        self.timeout = timeout;
        Ok(())
    }

    fn set_rts(&mut self, _: bool) -> serial_core::Result<()> {
        unimplemented!();
    }

    fn set_dtr(&mut self, _: bool) -> serial_core::Result<()> {
        unimplemented!();
    }

    fn read_cts(&mut self) -> serial_core::Result<bool> {
        unimplemented!();
    }

    fn read_dsr(&mut self) -> serial_core::Result<bool> {
        unimplemented!();
    }

    fn read_ri(&mut self) -> serial_core::Result<bool> {
        unimplemented!();
    }

    fn read_cd(&mut self) -> serial_core::Result<bool> {
        unimplemented!();
    }
}
