use std::convert::Infallible;
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

use crate::core::{Clock, FormatError, HumidityDigits, Link, Response, TemperatureDigits};
use crate::display::{Display, DisplayError, FieldStatus};

/// Errors reported by a [`Sensor`].
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SensorError {
    /// The sensor did not produce a reading.
    #[error("Sensor returned no reading")]
    NoReading,
}

/// A source of temperature and humidity readings.
///
/// A NaN reading is treated the same as [`SensorError::NoReading`], since that is how
/// many sensor drivers report a failed read.
pub trait Sensor {
    /// Reads relative humidity in percent.
    fn read_humidity(&mut self) -> Result<f32, SensorError>;

    /// Reads temperature in degrees Celsius.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

impl<S: Sensor + ?Sized> Sensor for &mut S {
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        (**self).read_humidity()
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        (**self).read_temperature()
    }
}

/// Shortest allowed time between sensor reads. Slow sensors return stale or failed
/// readings when polled faster.
pub const MIN_READ_INTERVAL: Duration = Duration::from_millis(2000);

/// Settings for a [`Poller`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PollConfig {
    /// Delay between the end of one cycle and the start of the next.
    /// Raised to [`MIN_READ_INTERVAL`] if shorter.
    pub interval: Duration,

    /// Whether to flip the virtual framebuffer to the foreground after drawing both fields.
    /// Only useful if the [`Display`] draws into the virtual framebuffer.
    pub double_buffered: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: MIN_READ_INTERVAL,
            double_buffered: false,
        }
    }
}

/// Why a poll cycle sent nothing to the display.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SkipReason {
    /// A reading could not be taken.
    Sensor(SensorError),

    /// A reading was outside the displayable range.
    Format(FormatError),
}

/// Result of a single poll cycle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PollOutcome {
    /// Both fields were redrawn.
    Updated {
        /// Responses to the temperature frames.
        temperature: FieldStatus,

        /// Responses to the humidity frames.
        humidity: FieldStatus,

        /// Response to the flip, if double buffered.
        flip: Option<Response>,
    },

    /// The cycle was abandoned before anything was sent.
    Skipped(SkipReason),
}

/// Periodically reads a [`Sensor`] and shows the readings on a [`Display`].
///
/// Both readings are taken and validated before any frame goes out, so a failed or
/// out-of-range read leaves the display showing the previous values. Responses other than
/// ACK are logged and otherwise ignored; the next cycle redraws everything anyway.
///
/// # Examples
///
/// ```
/// use charmatrix::{Display, DisplayConfig, PollConfig, PollOutcome, Poller, Sensor, SensorError};
/// use charmatrix_testing::{FakeClock, VirtualDisplay};
///
/// struct Fixed;
///
/// impl Sensor for Fixed {
///     fn read_humidity(&mut self) -> Result<f32, SensorError> { Ok(45.0) }
///     fn read_temperature(&mut self) -> Result<f32, SensorError> { Ok(18.5) }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// #
/// let display = Display::try_new(VirtualDisplay::new(), FakeClock::new(), DisplayConfig::default())?;
/// let mut poller = Poller::new(display, Fixed, PollConfig::default());
///
/// let outcome = poller.poll_once()?;
/// assert!(matches!(outcome, PollOutcome::Updated { .. }));
/// #
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Poller<S: Sensor, L: Link, C: Clock> {
    display: Display<L, C>,
    sensor: S,
    config: PollConfig,
}

impl<S: Sensor, L: Link, C: Clock> Poller<S, L, C> {
    /// Creates a new `Poller` driving `display` with readings from `sensor`.
    pub fn new(display: Display<L, C>, sensor: S, mut config: PollConfig) -> Self {
        if config.interval < MIN_READ_INTERVAL {
            warn!(
                "Poll interval {:?} is shorter than the sensor allows, using {:?}",
                config.interval, MIN_READ_INTERVAL
            );
            config.interval = MIN_READ_INTERVAL;
        }
        Poller { display, sensor, config }
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Returns a reference to the display.
    pub fn display(&self) -> &Display<L, C> {
        &self.display
    }

    /// Returns a mutable reference to the sensor.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Consumes the poller, returning the display and sensor.
    pub fn into_parts(self) -> (Display<L, C>, S) {
        (self.display, self.sensor)
    }

    /// Runs a single cycle: read both values, then redraw temperature and humidity,
    /// then flip if double buffered.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Link`] if the link fails. Sensor and range problems are
    /// reported as [`PollOutcome::Skipped`] instead.
    pub fn poll_once(&mut self) -> Result<PollOutcome, DisplayError> {
        let (temperature, humidity) = match self.read() {
            Ok(digits) => digits,
            Err(reason) => {
                warn!("Skipping display update: {:?}", reason);
                return Ok(PollOutcome::Skipped(reason));
            }
        };
        info!("Read {} C, {} %RH", temperature, humidity);

        let temperature = self.display.show_temperature(temperature)?;
        let humidity = self.display.show_humidity(humidity)?;
        let flip = if self.config.double_buffered {
            Some(self.display.flip_to_foreground()?)
        } else {
            None
        };

        Ok(PollOutcome::Updated {
            temperature,
            humidity,
            flip,
        })
    }

    /// Runs `cycles` poll cycles, sleeping the configured interval after each.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Link`] if the link fails.
    pub fn run_cycles(&mut self, cycles: usize) -> Result<Vec<PollOutcome>, DisplayError> {
        let mut outcomes = Vec::with_capacity(cycles);
        for _ in 0..cycles {
            outcomes.push(self.poll_once()?);
            self.display.clock_mut().sleep(self.config.interval);
        }
        Ok(outcomes)
    }

    /// Polls forever. Only returns if the link fails.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Link`] if the link fails.
    pub fn run(&mut self) -> Result<Infallible, DisplayError> {
        loop {
            let _ = self.poll_once()?;
            debug!("Sleeping {:?} until next reading", self.config.interval);
            self.display.clock_mut().sleep(self.config.interval);
        }
    }

    /// Takes both readings and formats them.
    fn read(&mut self) -> Result<(TemperatureDigits, HumidityDigits), SkipReason> {
        let humidity = valid(self.sensor.read_humidity()).map_err(SkipReason::Sensor)?;
        let temperature = valid(self.sensor.read_temperature()).map_err(SkipReason::Sensor)?;

        let temperature = TemperatureDigits::from_celsius(temperature).map_err(SkipReason::Format)?;
        let humidity = HumidityDigits::from_percent(humidity).map_err(SkipReason::Format)?;
        Ok((temperature, humidity))
    }
}

fn valid(reading: Result<f32, SensorError>) -> Result<f32, SensorError> {
    match reading {
        Ok(value) if value.is_nan() => Err(SensorError::NoReading),
        other => other,
    }
}
