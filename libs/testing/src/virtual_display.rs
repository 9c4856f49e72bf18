use std::collections::{HashMap, VecDeque};
use std::error::Error;

use log::{debug, info, warn};

use charmatrix_core::{Command, Field, Frame, Framebuffer, Link, Variant, ACK, MIN_FRAME_LEN, NAK, STX};

/// Mock implementation of a display module attached to a [`Link`].
///
/// Bytes sent to the `VirtualDisplay` are reassembled into frames and decoded into [`Command`]s,
/// which update a model of the module's three framebuffers. Each complete frame is answered with
/// ACK if it is a recognised command and NAK if it fails validation or matches no known command.
/// The answers can then be read back with [`receive_byte_if_available`](Link::receive_byte_if_available),
/// just as from a real module.
///
/// While most likely not a 100% accurate model of the hardware, it is sufficient for exercising
/// the driver and for standing in for a module behind an [`Emulator`](crate::Emulator).
///
/// # Examples
///
/// ```
/// use charmatrix_core::{Command, Field, Frame, Framebuffer, HumidityDigits, Link, Variant, ACK};
/// use charmatrix_testing::VirtualDisplay;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// #
/// let mut display = VirtualDisplay::new();
/// let digits = HumidityDigits::from_percent(45.0)?;
/// let frame = Frame::from(Command::DrawHumidity(Framebuffer::Foreground, Variant::DrawAndShow, digits));
///
/// display.send(frame.as_bytes())?;
/// assert_eq!(Some(ACK), display.receive_byte_if_available()?);
/// assert_eq!(Some("45"), display.text(Framebuffer::Foreground, Field::Humidity));
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualDisplay {
    text: HashMap<(Framebuffer, Field), String>,
    commands: Vec<Command>,
    incoming: Vec<u8>,
    outgoing: VecDeque<u8>,
    noise: Vec<u8>,
    silent: bool,
}

impl VirtualDisplay {
    /// Creates a new `VirtualDisplay` with all framebuffers blank.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the text currently shown by a field on a framebuffer, or `None` if it is blank.
    ///
    /// Only the value characters are tracked, e.g. `"18.5"` or `" 5"`, not the fixed label and unit.
    pub fn text(&self, framebuffer: Framebuffer, field: Field) -> Option<&str> {
        self.text.get(&(framebuffer, field)).map(String::as_str)
    }

    /// Returns every command received so far, in order. Frames that failed validation are not included.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Queues bytes that will be emitted ahead of the next response, like line noise would be.
    pub fn inject_noise(&mut self, bytes: &[u8]) {
        self.noise.extend_from_slice(bytes);
    }

    /// Puts bytes straight into the receive queue, as if the module had sent them unprompted.
    ///
    /// Useful to simulate the module's boot chatter.
    pub fn emit(&mut self, bytes: &[u8]) {
        self.outgoing.extend(bytes.iter().copied());
    }

    /// When `silent`, frames are still processed but never answered, so the controller times out.
    pub fn set_silent(&mut self, silent: bool) {
        self.silent = silent;
    }

    /// Returns `true` if there are bytes waiting to be received.
    pub fn has_pending(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Extracts and handles every complete frame in the incoming buffer.
    fn process_incoming(&mut self) {
        loop {
            match self.incoming.iter().position(|&b| b == STX) {
                Some(0) => {}
                Some(start) => {
                    warn!("Vdisplay discarding {} bytes before start of frame", start);
                    let _ = self.incoming.drain(..start);
                }
                None => {
                    self.incoming.clear();
                    return;
                }
            }

            if self.incoming.len() < 2 {
                return;
            }

            let declared = usize::from(self.incoming[1]);
            if declared < MIN_FRAME_LEN {
                warn!("Vdisplay got impossible frame length {}", declared);
                let _ = self.incoming.remove(0);
                self.respond(NAK);
                continue;
            }
            if self.incoming.len() < declared {
                // A stray STX in noise can declare a long frame that never arrives.
                // Give up on it as soon as a complete valid frame shows up behind it.
                match self.next_valid_frame_start() {
                    Some(start) => {
                        warn!("Vdisplay resyncing, discarding {} bytes of incomplete frame", start);
                        let _ = self.incoming.drain(..start);
                        continue;
                    }
                    None => return,
                }
            }

            let bytes: Vec<u8> = self.incoming.drain(..declared).collect();
            let response = match Frame::from_bytes(&bytes) {
                Ok(frame) => self.process_command(Command::from(frame)),
                Err(e) => {
                    warn!("Vdisplay rejected frame: {}", e);
                    NAK
                }
            };
            self.respond(response);
        }
    }

    /// Finds a later STX that begins a complete, valid frame in the incoming buffer.
    fn next_valid_frame_start(&self) -> Option<usize> {
        (1..self.incoming.len()).find(|&start| {
            let rest = &self.incoming[start..];
            rest[0] == STX
                && rest.len() > 1
                && rest.len() >= usize::from(rest[1])
                && Frame::from_bytes(&rest[..usize::from(rest[1])]).is_ok()
        })
    }

    /// Applies a decoded command to the framebuffers, returning the byte to answer with.
    fn process_command(&mut self, command: Command) -> u8 {
        debug!("Vdisplay command: {}", command);
        let response = match command {
            Command::Clear(framebuffer, field) => {
                let _ = self.text.remove(&(framebuffer, field));
                ACK
            }
            Command::DrawTemperature(framebuffer, variant, digits) => {
                self.draw(framebuffer, variant, Field::Temperature, digits.to_string());
                ACK
            }
            Command::DrawHumidity(framebuffer, variant, digits) => {
                self.draw(framebuffer, variant, Field::Humidity, digits.to_string());
                ACK
            }
            Command::FlipToForeground => {
                for &field in Field::ALL.iter() {
                    match self.text.get(&(Framebuffer::Virtual, field)).cloned() {
                        Some(text) => {
                            let _ = self.text.insert((Framebuffer::Foreground, field), text);
                        }
                        None => {
                            let _ = self.text.remove(&(Framebuffer::Foreground, field));
                        }
                    }
                }
                ACK
            }
            Command::Unknown(ref frame) => {
                warn!("Vdisplay does not understand frame {}", frame);
                NAK
            }
        };
        self.commands.push(command);
        response
    }

    /// Writes text into a framebuffer. `DrawAndShow` additionally makes it visible on the foreground.
    fn draw(&mut self, framebuffer: Framebuffer, variant: Variant, field: Field, text: String) {
        if variant == Variant::DrawAndShow && framebuffer != Framebuffer::Foreground {
            let _ = self.text.insert((Framebuffer::Foreground, field), text.clone());
        }
        info!("Vdisplay {} {} field: [{}]", framebuffer, field, text);
        let _ = self.text.insert((framebuffer, field), text);
    }

    fn respond(&mut self, response: u8) {
        self.outgoing.extend(self.noise.drain(..));
        if !self.silent {
            self.outgoing.push_back(response);
        }
    }
}

impl Link for VirtualDisplay {
    /// Accepts bytes from the controller, handling any frames they complete.
    fn send(&mut self, frame: &[u8]) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.incoming.extend_from_slice(frame);
        self.process_incoming();
        Ok(())
    }

    fn receive_byte_if_available(&mut self) -> Result<Option<u8>, Box<dyn Error + Send + Sync>> {
        Ok(self.outgoing.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charmatrix_core::{HumidityDigits, TemperatureDigits};

    fn send(display: &mut VirtualDisplay, command: Command) -> Option<u8> {
        display.send(Frame::from(command).as_bytes()).unwrap();
        display.receive_byte_if_available().unwrap()
    }

    fn temperature(value: f32) -> TemperatureDigits {
        TemperatureDigits::from_celsius(value).unwrap()
    }

    #[test]
    fn draw_and_clear() {
        let mut display = VirtualDisplay::new();
        let digits = temperature(18.5);

        let response = send(
            &mut display,
            Command::DrawTemperature(Framebuffer::Foreground, Variant::DrawAndShow, digits),
        );
        assert_eq!(Some(ACK), response);
        assert_eq!(Some("18.5"), display.text(Framebuffer::Foreground, Field::Temperature));

        let response = send(&mut display, Command::Clear(Framebuffer::Foreground, Field::Temperature));
        assert_eq!(Some(ACK), response);
        assert_eq!(None, display.text(Framebuffer::Foreground, Field::Temperature));
        assert_eq!(2, display.commands().len());
    }

    #[test]
    fn backbuffer_then_flip() {
        let mut display = VirtualDisplay::new();
        let digits = HumidityDigits::from_percent(61.0).unwrap();

        let _ = send(
            &mut display,
            Command::DrawHumidity(Framebuffer::Virtual, Variant::BackbufferOnly, digits),
        );
        assert_eq!(Some("61"), display.text(Framebuffer::Virtual, Field::Humidity));
        assert_eq!(None, display.text(Framebuffer::Foreground, Field::Humidity));

        assert_eq!(Some(ACK), send(&mut display, Command::FlipToForeground));
        assert_eq!(Some("61"), display.text(Framebuffer::Foreground, Field::Humidity));
        assert_eq!(None, display.text(Framebuffer::Foreground, Field::Temperature));
    }

    #[test]
    fn draw_and_show_reaches_foreground() {
        let mut display = VirtualDisplay::new();
        let _ = send(
            &mut display,
            Command::DrawTemperature(Framebuffer::Background, Variant::DrawAndShow, temperature(3.0)),
        );
        assert_eq!(Some(" 3.0"), display.text(Framebuffer::Background, Field::Temperature));
        assert_eq!(Some(" 3.0"), display.text(Framebuffer::Foreground, Field::Temperature));
    }

    #[test]
    fn bad_checksum_is_nak() {
        let mut display = VirtualDisplay::new();
        let mut bytes = Frame::from(Command::FlipToForeground).into_bytes();
        bytes[7] ^= 0xFF;
        display.send(&bytes).unwrap();
        assert_eq!(Some(NAK), display.receive_byte_if_available().unwrap());
        assert!(display.commands().is_empty());
    }

    #[test]
    fn unknown_command_is_nak() {
        let mut display = VirtualDisplay::new();
        let mut bytes = vec![STX, 0x08, b'X', b'Y', b'Z', 0x00, 0x00, 0x0D];
        bytes[6] = charmatrix_core::checksum(&bytes, 6);
        display.send(&bytes).unwrap();
        assert_eq!(Some(NAK), display.receive_byte_if_available().unwrap());
        assert!(matches!(display.commands()[0], Command::Unknown(_)));
    }

    #[test]
    fn frames_split_across_sends() {
        let mut display = VirtualDisplay::new();
        let frame = Frame::from(Command::Clear(Framebuffer::Virtual, Field::Humidity));
        let (first, second) = frame.as_bytes().split_at(5);

        display.send(&[0xEE]).unwrap();
        display.send(first).unwrap();
        assert!(!display.has_pending());
        display.send(second).unwrap();
        assert_eq!(Some(ACK), display.receive_byte_if_available().unwrap());
    }

    #[test]
    fn stray_start_byte_does_not_swallow_frames() {
        let mut display = VirtualDisplay::new();
        display.send(&[STX, 0xFF]).unwrap();
        assert_eq!(Some(ACK), send(&mut display, Command::FlipToForeground));
        assert_eq!(&[Command::FlipToForeground], display.commands());
        assert!(display.incoming.is_empty());
    }

    #[test]
    fn noise_precedes_response() {
        let mut display = VirtualDisplay::new();
        display.inject_noise(b"hi");
        assert_eq!(Some(b'h'), send(&mut display, Command::FlipToForeground));
        assert_eq!(Some(b'i'), display.receive_byte_if_available().unwrap());
        assert_eq!(Some(ACK), display.receive_byte_if_available().unwrap());
        assert_eq!(None, display.receive_byte_if_available().unwrap());
    }

    #[test]
    fn silent_never_answers() {
        let mut display = VirtualDisplay::new();
        display.set_silent(true);
        assert_eq!(None, send(&mut display, Command::FlipToForeground));
        assert_eq!(1, display.commands().len());
    }

    #[test]
    fn emitted_bytes_can_be_discarded() {
        let mut display = VirtualDisplay::new();
        display.emit(b"BOOT v1.2\r\n");
        assert!(display.has_pending());
        assert_eq!(11, display.discard_pending().unwrap());
        assert!(!display.has_pending());
    }
}
