use std::error::Error;
use std::time::Duration;

use log::{debug, trace};

use crate::{Clock, Link, Response};

/// Shortest delay between polls. A configured `poll_interval` below this is raised to it,
/// so that polling always makes progress toward `max_wait`.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Timing parameters for [`wait_for_response`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use charmatrix_core::WaitTiming;
///
/// let timing = WaitTiming::default();
/// assert_eq!(Duration::from_millis(100), timing.min_wait);
/// assert_eq!(Duration::from_millis(500), timing.max_wait);
///
/// // Never give up on the device.
/// let patient = WaitTiming { max_wait: Duration::from_millis(0), ..timing };
/// assert!(patient.waits_forever());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct WaitTiming {
    /// Unconditional delay after sending, giving the device time to process the command.
    pub min_wait: Duration,

    /// How long to poll for a response once the minimum wait has passed. Zero means forever.
    pub max_wait: Duration,

    /// Delay between polls, at least [`MIN_POLL_INTERVAL`].
    pub poll_interval: Duration,
}

impl WaitTiming {
    /// Returns `true` if `max_wait` is zero, i.e. polling never times out.
    pub fn waits_forever(&self) -> bool {
        self.max_wait == Duration::from_millis(0)
    }
}

impl Default for WaitTiming {
    /// 100 ms pre-delay, 500 ms poll window, polling every millisecond.
    fn default() -> Self {
        WaitTiming {
            min_wait: Duration::from_millis(100),
            max_wait: Duration::from_millis(500),
            poll_interval: Duration::from_millis(1),
        }
    }
}

/// Waits for the display to acknowledge the command that was just sent.
///
/// First sleeps `min_wait` unconditionally, then polls the link once per `poll_interval`
/// until an ACK or NAK arrives or `max_wait` worth of polling has elapsed. Any other byte
/// received is discarded. Blocks for at least `min_wait` and at most `min_wait + max_wait`,
/// or indefinitely if `max_wait` is zero and the device never answers.
///
/// # Errors
///
/// Returns an error only if the link itself fails. A NAK or a timeout is a normal
/// [`Response`], left to the caller to act on.
///
/// # Examples
///
/// ```
/// # use std::collections::VecDeque;
/// # use std::error::Error;
/// use charmatrix_core::{wait_for_response, Link, Response, SystemClock, WaitTiming};
/// # struct QueueLink(VecDeque<u8>);
/// # impl Link for QueueLink {
/// #     fn send(&mut self, _: &[u8]) -> Result<(), Box<dyn Error + Send + Sync>> { Ok(()) }
/// #     fn receive_byte_if_available(&mut self) -> Result<Option<u8>, Box<dyn Error + Send + Sync>> {
/// #         Ok(self.0.pop_front())
/// #     }
/// # }
///
/// # fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
/// #
/// // A link that has a stray byte followed by an ACK waiting.
/// let mut link = QueueLink(vec![b'?', 0x06].into());
/// let timing = WaitTiming { min_wait: Default::default(), ..Default::default() };
/// let response = wait_for_response(&mut link, &mut SystemClock, &timing)?;
/// assert_eq!(Response::Ack, response);
/// #
/// # Ok(()) }
/// ```
pub fn wait_for_response<L, C>(
    link: &mut L,
    clock: &mut C,
    timing: &WaitTiming,
) -> Result<Response, Box<dyn Error + Send + Sync>>
where
    L: Link + ?Sized,
    C: Clock + ?Sized,
{
    clock.sleep(timing.min_wait);

    let tick = timing.poll_interval.max(MIN_POLL_INTERVAL);
    let mut elapsed = Duration::from_millis(0);
    while timing.waits_forever() || elapsed < timing.max_wait {
        if let Some(byte) = link.receive_byte_if_available()? {
            if let Some(response) = Response::from_byte(byte) {
                debug!("Display response: {} after {:?}", response, timing.min_wait + elapsed);
                return Ok(response);
            }
            trace!("Discarding unexpected byte {:02X}", byte);
        }
        clock.sleep(tick);
        elapsed += tick;
    }

    debug!("No response within {:?}", timing.min_wait + timing.max_wait);
    Ok(Response::Timeout)
}
