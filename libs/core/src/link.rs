use std::error::Error;
use std::fmt::{self, Debug, Formatter};

/// Abstraction over the byte channel connecting the controller to the display module.
///
/// Typically `SerialLink` from [`charmatrix-serial`] or `VirtualDisplay` from [`charmatrix-testing`]
/// are sufficient, and you do not need to implement this yourself. Implementations transmit bytes
/// verbatim and in order, and neither retry nor buffer beyond what the underlying channel does.
///
/// # Examples
///
/// Implementing a link that acknowledges everything:
///
/// ```
/// use std::error::Error;
/// use std::collections::VecDeque;
/// use charmatrix_core::{Link, ACK};
///
/// struct AgreeableLink {
///     pending: VecDeque<u8>,
/// }
///
/// impl Link for AgreeableLink {
///     fn send(&mut self, _frame: &[u8]) -> Result<(), Box<dyn Error + Send + Sync>> {
///         self.pending.push_back(ACK);
///         Ok(())
///     }
///
///     fn receive_byte_if_available(&mut self) -> Result<Option<u8>, Box<dyn Error + Send + Sync>> {
///         Ok(self.pending.pop_front())
///     }
/// }
/// ```
///
/// [`charmatrix-serial`]: https://docs.rs/charmatrix-serial
/// [`charmatrix-testing`]: https://docs.rs/charmatrix-testing
pub trait Link {
    /// Writes all bytes of `frame` to the channel.
    fn send(&mut self, frame: &[u8]) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Returns the next received byte, or `None` without blocking if nothing has arrived.
    fn receive_byte_if_available(&mut self) -> Result<Option<u8>, Box<dyn Error + Send + Sync>>;

    /// Reads and throws away everything already received, returning how many bytes were dropped.
    ///
    /// Used at startup to get rid of whatever the module printed while booting.
    fn discard_pending(&mut self) -> Result<usize, Box<dyn Error + Send + Sync>> {
        let mut discarded = 0;
        while self.receive_byte_if_available()?.is_some() {
            discarded += 1;
        }
        Ok(discarded)
    }
}

// Provide a Debug representation so types that contain trait objects can derive Debug.
impl Debug for dyn Link {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<Link trait>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct QueueLink(VecDeque<u8>);

    impl Link for QueueLink {
        fn send(&mut self, _: &[u8]) -> Result<(), Box<dyn Error + Send + Sync>> {
            Ok(())
        }

        fn receive_byte_if_available(&mut self) -> Result<Option<u8>, Box<dyn Error + Send + Sync>> {
            Ok(self.0.pop_front())
        }
    }

    #[test]
    fn discard_pending_drains_everything() {
        let mut link = QueueLink(vec![0x00, 0xFF, 0x06].into());
        assert_eq!(3, link.discard_pending().unwrap());
        assert_eq!(0, link.discard_pending().unwrap());
        assert_eq!(None, link.receive_byte_if_available().unwrap());
    }
}
