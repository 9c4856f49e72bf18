use std::fmt::Debug;
use std::thread;
use std::time::Duration;

/// Source of delays for the blocking parts of the protocol.
///
/// The driver never reads the time directly; it only sleeps. Injecting the clock lets tests
/// simulate elapsed time without actually waiting.
pub trait Clock: Debug {
    /// Blocks for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// A [`Clock`] that really sleeps, using [`std::thread::sleep`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration);
    }
}
