use std::time::Duration;

use charmatrix_core::Clock;

/// A [`Clock`] that records sleeps instead of performing them.
///
/// Lets tests check how long the driver would have blocked without actually waiting.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use charmatrix_core::Clock;
/// use charmatrix_testing::FakeClock;
///
/// let mut clock = FakeClock::new();
/// clock.sleep(Duration::from_millis(100));
/// clock.sleep(Duration::from_millis(5));
/// assert_eq!(Duration::from_millis(105), clock.elapsed());
/// assert_eq!(2, clock.sleeps().len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FakeClock {
    sleeps: Vec<Duration>,
}

impl FakeClock {
    /// Creates a new `FakeClock` at time zero.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the total time slept so far.
    pub fn elapsed(&self) -> Duration {
        self.sleeps.iter().sum()
    }

    /// Returns every requested sleep, in order.
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }

    /// Forgets all recorded sleeps.
    pub fn reset(&mut self) {
        self.sleeps.clear();
    }
}

impl Clock for FakeClock {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}
