use std::collections::VecDeque;
use std::error::Error;
use std::time::Duration;

use charmatrix::core::FormatError;
use charmatrix::{
    Display, DisplayConfig, DisplayError, Field, FieldStatus, Framebuffer, Link, PollConfig, PollOutcome, Poller,
    Response, Sensor, SensorError, SkipReason, MIN_READ_INTERVAL,
};
use charmatrix_testing::{FakeClock, VirtualDisplay};

/// Sensor that plays back scripted readings, repeating the last one when the script runs out.
#[derive(Debug)]
struct ScriptedSensor {
    humidity: VecDeque<Result<f32, SensorError>>,
    temperature: VecDeque<Result<f32, SensorError>>,
    reads: usize,
}

impl ScriptedSensor {
    fn new(humidity: &[Result<f32, SensorError>], temperature: &[Result<f32, SensorError>]) -> Self {
        ScriptedSensor {
            humidity: humidity.iter().copied().collect(),
            temperature: temperature.iter().copied().collect(),
            reads: 0,
        }
    }

    fn steady(humidity: f32, temperature: f32) -> Self {
        Self::new(&[Ok(humidity)], &[Ok(temperature)])
    }
}

fn next(script: &mut VecDeque<Result<f32, SensorError>>) -> Result<f32, SensorError> {
    if script.len() > 1 {
        script.pop_front().unwrap_or(Err(SensorError::NoReading))
    } else {
        script.front().copied().unwrap_or(Err(SensorError::NoReading))
    }
}

impl Sensor for ScriptedSensor {
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        next(&mut self.humidity)
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        next(&mut self.temperature)
    }
}

#[derive(Debug)]
struct BrokenLink;

impl Link for BrokenLink {
    fn send(&mut self, _: &[u8]) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err("cable cut".into())
    }

    fn receive_byte_if_available(&mut self) -> Result<Option<u8>, Box<dyn Error + Send + Sync>> {
        Ok(None)
    }
}

fn poller(
    sensor: ScriptedSensor,
    display_config: DisplayConfig,
    poll_config: PollConfig,
) -> Poller<ScriptedSensor, VirtualDisplay, FakeClock> {
    let display = Display::try_new(VirtualDisplay::new(), FakeClock::new(), display_config).unwrap();
    Poller::new(display, sensor, poll_config)
}

const ACKED: FieldStatus = FieldStatus {
    clear: Response::Ack,
    draw: Response::Ack,
};

#[test]
fn poll_updates_both_fields() {
    let mut poller = poller(
        ScriptedSensor::steady(45.0, 18.5),
        DisplayConfig::default(),
        PollConfig::default(),
    );

    let outcome = poller.poll_once().unwrap();
    assert_eq!(
        PollOutcome::Updated {
            temperature: ACKED,
            humidity: ACKED,
            flip: None
        },
        outcome
    );

    let screen = poller.display().link();
    assert_eq!(Some("18.5"), screen.text(Framebuffer::Foreground, Field::Temperature));
    assert_eq!(Some("45"), screen.text(Framebuffer::Foreground, Field::Humidity));

    // Temperature is redrawn first, each field cleared before it is drawn.
    let fields: Vec<_> = screen.commands().iter().map(|c| c.field()).collect();
    assert_eq!(
        vec![
            Some(Field::Temperature),
            Some(Field::Temperature),
            Some(Field::Humidity),
            Some(Field::Humidity)
        ],
        fields
    );
}

#[test]
fn nan_reading_skips_cycle() {
    let sensor = ScriptedSensor::new(&[Ok(f32::NAN)], &[Ok(20.0)]);
    let mut poller = poller(sensor, DisplayConfig::default(), PollConfig::default());

    let outcome = poller.poll_once().unwrap();
    assert_eq!(PollOutcome::Skipped(SkipReason::Sensor(SensorError::NoReading)), outcome);
    assert!(poller.display().link().commands().is_empty());
}

#[test]
fn sensor_error_skips_cycle() {
    let sensor = ScriptedSensor::new(&[Ok(50.0)], &[Err(SensorError::NoReading)]);
    let mut poller = poller(sensor, DisplayConfig::default(), PollConfig::default());

    let outcome = poller.poll_once().unwrap();
    assert_eq!(PollOutcome::Skipped(SkipReason::Sensor(SensorError::NoReading)), outcome);
    assert!(poller.display().link().commands().is_empty());
    assert_eq!(2, poller.sensor_mut().reads);
}

#[test]
fn out_of_range_reading_skips_cycle() {
    let sensor = ScriptedSensor::steady(50.0, 120.0);
    let mut poller = poller(sensor, DisplayConfig::default(), PollConfig::default());

    let outcome = poller.poll_once().unwrap();
    assert_eq!(
        PollOutcome::Skipped(SkipReason::Format(FormatError::OutOfRange { value: 120.0 })),
        outcome
    );
    assert!(poller.display().link().commands().is_empty());
}

#[test]
fn skipped_cycle_keeps_previous_values() {
    let sensor = ScriptedSensor::new(&[Ok(40.0), Ok(f32::NAN), Ok(41.0)], &[Ok(19.0)]);
    let mut poller = poller(sensor, DisplayConfig::default(), PollConfig::default());

    let outcomes = poller.run_cycles(2).unwrap();
    assert!(matches!(outcomes[0], PollOutcome::Updated { .. }));
    assert!(matches!(outcomes[1], PollOutcome::Skipped(_)));
    assert_eq!(Some("40"), poller.display().link().text(Framebuffer::Foreground, Field::Humidity));

    let _ = poller.poll_once().unwrap();
    assert_eq!(Some("41"), poller.display().link().text(Framebuffer::Foreground, Field::Humidity));
}

#[test]
fn double_buffered_cycle_flips() {
    let poll_config = PollConfig {
        double_buffered: true,
        ..Default::default()
    };
    let mut poller = poller(
        ScriptedSensor::steady(55.0, 23.4),
        DisplayConfig::double_buffered(),
        poll_config,
    );

    let outcome = poller.poll_once().unwrap();
    assert_eq!(
        PollOutcome::Updated {
            temperature: ACKED,
            humidity: ACKED,
            flip: Some(Response::Ack)
        },
        outcome
    );

    let screen = poller.display().link();
    assert_eq!(5, screen.commands().len());
    assert_eq!(Some("23.4"), screen.text(Framebuffer::Foreground, Field::Temperature));
    assert_eq!(Some("55"), screen.text(Framebuffer::Foreground, Field::Humidity));
}

#[test]
fn unanswered_frames_do_not_stop_polling() {
    let mut display = Display::try_new(VirtualDisplay::new(), FakeClock::new(), DisplayConfig::default()).unwrap();
    display.link_mut().set_silent(true);
    let mut poller = Poller::new(display, ScriptedSensor::steady(30.0, 10.0), PollConfig::default());

    let outcomes = poller.run_cycles(2).unwrap();
    let timed_out = FieldStatus {
        clear: Response::Timeout,
        draw: Response::Timeout,
    };
    for outcome in outcomes {
        assert_eq!(
            PollOutcome::Updated {
                temperature: timed_out,
                humidity: timed_out,
                flip: None
            },
            outcome
        );
    }
}

#[test]
fn cycles_are_paced_by_interval() {
    let poll_config = PollConfig {
        interval: Duration::from_millis(5000),
        ..Default::default()
    };
    let mut poller = poller(ScriptedSensor::steady(45.0, 18.5), DisplayConfig::default(), poll_config);

    let _ = poller.run_cycles(3).unwrap();

    let (display, _) = poller.into_parts();
    let (_, clock) = display.into_parts();
    let pauses = clock
        .sleeps()
        .iter()
        .filter(|&&d| d == Duration::from_millis(5000))
        .count();
    assert_eq!(3, pauses);
    assert_eq!(Duration::from_millis(1000 + 3 * (4 * 100 + 5000)), clock.elapsed());
}

#[test]
fn short_interval_raised_to_sensor_minimum() {
    let poll_config = PollConfig {
        interval: Duration::from_millis(100),
        ..Default::default()
    };
    let mut poller = poller(ScriptedSensor::steady(45.0, 18.5), DisplayConfig::default(), poll_config);
    assert_eq!(MIN_READ_INTERVAL, poller.config().interval);

    let _ = poller.run_cycles(2).unwrap();

    let (display, _) = poller.into_parts();
    let (_, clock) = display.into_parts();
    assert!(!clock.sleeps().contains(&Duration::from_millis(100)));
    let pauses = clock.sleeps().iter().filter(|&&d| d == MIN_READ_INTERVAL).count();
    assert_eq!(2, pauses);
    assert_eq!(Duration::from_millis(1000 + 2 * (4 * 100 + 2000)), clock.elapsed());
}

#[test]
fn link_failure_stops_polling() {
    let display = Display::try_new(BrokenLink, FakeClock::new(), DisplayConfig::default()).unwrap();
    let mut poller = Poller::new(display, ScriptedSensor::steady(45.0, 18.5), PollConfig::default());

    assert!(matches!(poller.poll_once(), Err(DisplayError::Link { .. })));
    assert!(matches!(poller.run(), Err(DisplayError::Link { .. })));
}
