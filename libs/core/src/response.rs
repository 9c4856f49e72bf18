use std::fmt::{self, Display, Formatter};

/// Byte sent by the display to acknowledge a command.
pub const ACK: u8 = 0x06;

/// Byte sent by the display to reject a command.
pub const NAK: u8 = 0x15;

/// Sentinel used for [`Response::Timeout`]; the display never sends it as a response.
pub const NO_RESPONSE: u8 = 0x00;

/// Outcome of waiting for the display to answer a command.
///
/// `Ack` and `Nak` correspond to the bytes the display actually sends. `Timeout` means
/// neither arrived within the poll window.
///
/// # Examples
///
/// ```
/// use charmatrix_core::Response;
///
/// assert_eq!(Some(Response::Ack), Response::from_byte(0x06));
/// assert_eq!(None, Response::from_byte(b'x'));
/// assert_eq!(0x00, Response::Timeout.to_byte());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Response {
    /// The display accepted the command.
    Ack,
    /// The display rejected the command.
    Nak,
    /// No acknowledgement arrived in time.
    Timeout,
}

impl Response {
    /// Interprets a byte received from the display.
    ///
    /// Returns `None` for anything other than [`ACK`] or [`NAK`]; such bytes are line noise.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            ACK => Some(Response::Ack),
            NAK => Some(Response::Nak),
            _ => None,
        }
    }

    /// Returns the byte encoding of the response, using [`NO_RESPONSE`] for `Timeout`.
    pub fn to_byte(self) -> u8 {
        match self {
            Response::Ack => ACK,
            Response::Nak => NAK,
            Response::Timeout => NO_RESPONSE,
        }
    }

    /// Returns `true` if the display acknowledged the command.
    pub fn is_ack(self) -> bool {
        self == Response::Ack
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Response::Ack => "ACK",
            Response::Nak => "NAK",
            Response::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_bytes() {
        assert_eq!(Some(Response::Ack), Response::from_byte(0x06));
        assert_eq!(Some(Response::Nak), Response::from_byte(0x15));
    }

    #[test]
    fn noise_and_sentinel_are_not_responses() {
        assert_eq!(None, Response::from_byte(NO_RESPONSE));
        assert_eq!(None, Response::from_byte(0x0D));
        assert_eq!(None, Response::from_byte(0xFF));
    }

    #[test]
    fn timeout_is_distinct() {
        assert_ne!(Response::Timeout.to_byte(), ACK);
        assert_ne!(Response::Timeout.to_byte(), NAK);
        assert!(!Response::Timeout.is_ack());
        assert!(Response::Ack.is_ack());
    }

    #[test]
    fn display() {
        assert_eq!("ACK", Response::Ack.to_string());
        assert_eq!("NAK", Response::Nak.to_string());
        assert_eq!("timeout", Response::Timeout.to_string());
    }
}
