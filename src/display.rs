use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

use crate::core::{
    wait_for_response, Clock, Command, Field, FormatError, Frame, Framebuffer, HumidityDigits, Link, Response,
    SystemClock, TemperatureDigits, Variant, WaitTiming,
};

/// Errors related to [`Display`]s.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DisplayError {
    /// The link failed to transfer data.
    #[error("Link failed to transfer data")]
    Link {
        /// The underlying link error.
        #[from]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The value cannot be shown in its field. Raised before anything is sent.
    #[error("Value cannot be displayed")]
    Format {
        /// The underlying formatting error.
        #[from]
        source: FormatError,
    },
}

/// Settings for a [`Display`].
///
/// # Examples
///
/// ```
/// use charmatrix::{DisplayConfig, Framebuffer, Variant};
///
/// let config = DisplayConfig::default();
/// assert_eq!(Framebuffer::Foreground, config.framebuffer);
///
/// // Draw off-screen and flip explicitly.
/// let config = DisplayConfig::double_buffered();
/// assert_eq!(Framebuffer::Virtual, config.framebuffer);
/// assert_eq!(Variant::BackbufferOnly, config.variant);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DisplayConfig {
    /// Framebuffer the fields are drawn into.
    pub framebuffer: Framebuffer,

    /// Whether drawing shows the text immediately or only updates the framebuffer.
    pub variant: Variant,

    /// How long to wait for the module to answer each frame.
    pub timing: WaitTiming,

    /// Delay at startup before flushing the link, giving the module and link time to come up.
    pub settle_time: Duration,
}

impl DisplayConfig {
    /// Configuration for drawing into the virtual framebuffer, to be shown by
    /// [`flip_to_foreground`](Display::flip_to_foreground).
    pub fn double_buffered() -> Self {
        DisplayConfig {
            framebuffer: Framebuffer::Virtual,
            variant: Variant::BackbufferOnly,
            ..Default::default()
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            framebuffer: Framebuffer::Foreground,
            variant: Variant::DrawAndShow,
            timing: WaitTiming::default(),
            settle_time: Duration::from_millis(1000),
        }
    }
}

/// The module's answers to the two frames that redraw a field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FieldStatus {
    /// Response to the clear command.
    pub clear: Response,

    /// Response to the draw command.
    pub draw: Response,
}

impl FieldStatus {
    /// Returns `true` if both frames were acknowledged.
    pub fn is_ack(&self) -> bool {
        self.clear.is_ack() && self.draw.is_ack()
    }
}

/// A display module on an associated link.
///
/// Each operation sends one or more frames, waiting after every frame for the module to
/// answer before sending the next. Answers are returned rather than treated as errors:
/// a NAK or timeout leaves it to the caller to decide whether to log, retry, or ignore it.
///
/// Redrawing a field first clears its rectangle, since the new text may be shorter than the
/// old (e.g. when the tens digit becomes blank). Nothing is atomic across frames; if the link
/// drops between the clear and the draw, the field is left blank.
///
/// # Examples
///
/// ```no_run
/// use charmatrix::{Display, DisplayConfig, SerialLink, SystemClock};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// #
/// let port = serial::open("/dev/ttyUSB0")?;
/// let link = SerialLink::try_new(port)?;
/// let mut display = Display::try_new(link, SystemClock, DisplayConfig::default())?;
///
/// let status = display.update_temperature(21.7)?;
/// if !status.is_ack() {
///     println!("Display did not acknowledge: {:?}", status);
/// }
/// display.update_humidity(48.0)?;
/// #
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Display<L: Link, C: Clock = SystemClock> {
    link: L,
    clock: C,
    config: DisplayConfig,
}

impl<L: Link, C: Clock> Display<L, C> {
    /// Takes ownership of the link and prepares it for sending commands.
    ///
    /// Waits `config.settle_time`, then discards anything the module already sent
    /// (e.g. boot messages) so it cannot be mistaken for a response.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Link`] if the link fails while being flushed.
    ///
    /// # Examples
    ///
    /// ```
    /// use charmatrix::{Display, DisplayConfig};
    /// use charmatrix_testing::{FakeClock, VirtualDisplay};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    /// #
    /// let display = Display::try_new(VirtualDisplay::new(), FakeClock::new(), DisplayConfig::default())?;
    /// assert_eq!(1000, display.clock().elapsed().as_millis());
    /// #
    /// # Ok(()) }
    /// ```
    pub fn try_new(mut link: L, mut clock: C, config: DisplayConfig) -> Result<Self, DisplayError> {
        info!("Waiting {:?} for display link to settle", config.settle_time);
        clock.sleep(config.settle_time);

        let discarded = link.discard_pending()?;
        if discarded > 0 {
            debug!("Discarded {} bytes of startup noise", discarded);
        }

        Ok(Display { link, clock, config })
    }

    /// Returns the display's configuration.
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Returns a reference to the underlying link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Returns a mutable reference to the underlying link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Returns a reference to the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns a mutable reference to the clock, e.g. to pace updates with the same time source.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Consumes the display, returning the link and clock.
    pub fn into_parts(self) -> (L, C) {
        (self.link, self.clock)
    }

    /// Redraws the temperature field with a value in degrees.
    ///
    /// # Errors
    ///
    /// Returns:
    /// * [`DisplayError::Format`] if `celsius` is not in the range 0 to 99.9. Nothing is sent.
    /// * [`DisplayError::Link`] if the link fails.
    pub fn update_temperature(&mut self, celsius: f32) -> Result<FieldStatus, DisplayError> {
        let digits = TemperatureDigits::from_celsius(celsius)?;
        self.show_temperature(digits)
    }

    /// Redraws the humidity field with a relative humidity percentage.
    ///
    /// # Errors
    ///
    /// Returns:
    /// * [`DisplayError::Format`] if `percent` is not in the range 0 to 99.9. Nothing is sent.
    /// * [`DisplayError::Link`] if the link fails.
    pub fn update_humidity(&mut self, percent: f32) -> Result<FieldStatus, DisplayError> {
        let digits = HumidityDigits::from_percent(percent)?;
        self.show_humidity(digits)
    }

    /// Redraws the temperature field with already formatted digits.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Link`] if the link fails.
    pub fn show_temperature(&mut self, digits: TemperatureDigits) -> Result<FieldStatus, DisplayError> {
        let DisplayConfig {
            framebuffer, variant, ..
        } = self.config;
        self.redraw(Field::Temperature, Command::DrawTemperature(framebuffer, variant, digits))
    }

    /// Redraws the humidity field with already formatted digits.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Link`] if the link fails.
    pub fn show_humidity(&mut self, digits: HumidityDigits) -> Result<FieldStatus, DisplayError> {
        let DisplayConfig {
            framebuffer, variant, ..
        } = self.config;
        self.redraw(Field::Humidity, Command::DrawHumidity(framebuffer, variant, digits))
    }

    /// Copies the virtual framebuffer onto the foreground.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Link`] if the link fails.
    pub fn flip_to_foreground(&mut self) -> Result<Response, DisplayError> {
        self.send_command(Command::FlipToForeground)
    }

    /// Sends a single command and waits for the module's answer.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::Link`] if the link fails.
    pub fn send_command(&mut self, command: Command) -> Result<Response, DisplayError> {
        debug!("Display command: {}", command);
        let frame = Frame::from(command);
        self.link.send(frame.as_bytes())?;

        let response = wait_for_response(&mut self.link, &mut self.clock, &self.config.timing)?;
        if !response.is_ack() {
            warn!("Display answered {} to frame {}", response, frame);
        }
        Ok(response)
    }

    /// Clears a field's rectangle, then draws it.
    fn redraw(&mut self, field: Field, draw: Command) -> Result<FieldStatus, DisplayError> {
        let clear = self.send_command(Command::Clear(self.config.framebuffer, field))?;
        let draw = self.send_command(draw)?;
        Ok(FieldStatus { clear, draw })
    }
}
