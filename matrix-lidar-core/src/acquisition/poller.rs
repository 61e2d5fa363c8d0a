//! Setup and polling of one sensor

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;

use crate::config::{AcquisitionConfig, ConfigError, PollMode};
use crate::frame::{Coordinate, DistanceFrame, FrameError};
use crate::render::{render_grid, render_point};
use crate::retry::{Phase, SetupError, SetupEvent, SetupSequencer};
use crate::traits::RangingSensor;

/// Errors from a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollError<E> {
    /// Polled before setup completed
    NotReady(Phase),
    /// The sensor call failed
    Sensor(E),
    /// The sensor returned a frame of the wrong size
    Frame(FrameError),
    /// The output sink refused the text
    Output,
}

impl<E> From<FrameError> for PollError<E> {
    fn from(e: FrameError) -> Self {
        PollError::Frame(e)
    }
}

impl<E> From<fmt::Error> for PollError<E> {
    fn from(_: fmt::Error) -> Self {
        PollError::Output
    }
}

impl<E: fmt::Debug> fmt::Display for PollError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollError::NotReady(phase) => write!(f, "sensor not ready ({:?})", phase),
            PollError::Sensor(e) => write!(f, "sensor error: {:?}", e),
            PollError::Frame(e) => write!(f, "{}", e),
            PollError::Output => f.write_str("output sink failed"),
        }
    }
}

/// What a successful poll produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    /// A full frame was printed
    Frame {
        /// Closest return in the frame
        nearest: Option<(Coordinate, u16)>,
    },
    /// A fixed-point value was printed
    Point(u16),
}

/// Acquisition loop around one sensor handle
///
/// The handle is moved in; [`into_parts`](Self::into_parts) gives it back.
pub struct Acquisition<S, D> {
    sensor: S,
    delay: D,
    config: AcquisitionConfig,
    setup: SetupSequencer,
}

impl<S, D> Acquisition<S, D>
where
    S: RangingSensor,
    D: DelayNs,
{
    /// Validate the configuration and take ownership of the handle
    pub fn new(sensor: S, delay: D, config: AcquisitionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sensor,
            delay,
            setup: SetupSequencer::new(config.resolution, config.retry),
            config,
        })
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.setup.phase()
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn into_parts(self) -> (S, D) {
        (self.sensor, self.delay)
    }

    /// Bring the sensor to [`Phase::Ready`]
    pub fn setup<F>(&mut self, on_event: F) -> Result<(), SetupError<S::Error>>
    where
        F: FnMut(&SetupEvent<'_, S::Error>),
    {
        self.setup.run(&mut self.sensor, &mut self.delay, on_event)
    }

    /// Read once and print the result to `out`
    pub fn poll_once<W: Write>(&mut self, out: &mut W) -> Result<Reading, PollError<S::Error>> {
        if !self.setup.is_ready() {
            return Err(PollError::NotReady(self.setup.phase()));
        }

        match self.config.mode {
            PollMode::FullFrame => {
                let bytes = self.sensor.read_frame().map_err(PollError::Sensor)?;
                let frame = DistanceFrame::from_bytes(self.config.resolution, &bytes)?;
                render_grid(
                    out,
                    frame.samples().iter().copied(),
                    self.config.row_width(),
                )?;
                Ok(Reading::Frame {
                    nearest: frame.nearest(),
                })
            }
            PollMode::FixedPoint => {
                let point = self.config.fixed_point;
                let value = self
                    .sensor
                    .read_point(point.row, point.col)
                    .map_err(PollError::Sensor)?;
                render_point(out, value)?;
                Ok(Reading::Point(value))
            }
        }
    }

    /// Sleep for the configured poll interval
    pub fn wait(&mut self) {
        self.delay.delay_ms(self.config.poll_interval_ms);
    }

    /// Poll once, hand the outcome to `on_poll` and wait out the interval
    pub fn step<W, F>(&mut self, out: &mut W, on_poll: &mut F)
    where
        W: Write,
        F: FnMut(Result<Reading, PollError<S::Error>>),
    {
        let outcome = self.poll_once(out);
        on_poll(outcome);
        self.wait();
    }

    /// Poll forever
    ///
    /// Failed polls are reported to `on_poll` like successful ones and
    /// the loop carries on after the usual interval.
    pub fn run<W, F>(&mut self, out: &mut W, mut on_poll: F) -> !
    where
        W: Write,
        F: FnMut(Result<Reading, PollError<S::Error>>),
    {
        loop {
            self.step(out, &mut on_poll);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridLayout;
    use crate::testing::{Call, RecordingDelay, StubError, StubSensor};
    use crate::traits::Resolution;

    fn frame_bytes(cells: usize) -> std::vec::Vec<u8> {
        (0..cells as u16).flat_map(|i| (i * 100).to_le_bytes()).collect()
    }

    fn ready(
        sensor: StubSensor,
        config: AcquisitionConfig,
    ) -> Acquisition<StubSensor, RecordingDelay> {
        let mut acquisition = Acquisition::new(sensor, RecordingDelay::default(), config).unwrap();
        acquisition.setup(|_| {}).unwrap();
        acquisition
    }

    #[test]
    fn test_poll_before_setup() {
        let mut acquisition = Acquisition::new(
            StubSensor::new(),
            RecordingDelay::default(),
            AcquisitionConfig::default(),
        )
        .unwrap();
        let mut out = String::new();

        assert_eq!(
            acquisition.poll_once(&mut out),
            Err(PollError::NotReady(Phase::Uninitialized))
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AcquisitionConfig {
            layout: GridLayout::with_row_width(0),
            ..AcquisitionConfig::default()
        };
        let result = Acquisition::new(StubSensor::new(), RecordingDelay::default(), config);
        assert!(matches!(result, Err(ConfigError::ZeroRowWidth)));
    }

    #[test]
    fn test_full_frame_4x4() {
        let sensor = StubSensor::new().with_frame(&frame_bytes(16));
        let config = AcquisitionConfig {
            resolution: Resolution::X4,
            ..AcquisitionConfig::default()
        };
        let mut acquisition = ready(sensor, config);
        let mut out = String::new();

        let reading = acquisition.poll_once(&mut out).unwrap();

        assert_eq!(
            out,
            "0 100 200 300 \n\
             400 500 600 700 \n\
             800 900 1000 1100 \n\
             1200 1300 1400 1500 \n\
             -------------------\n"
        );
        assert_eq!(
            reading,
            Reading::Frame {
                nearest: Some((Coordinate::new(0, 0), 0))
            }
        );
        assert_eq!(
            acquisition.sensor_mut().calls,
            [Call::Begin, Call::Configure(Resolution::X4), Call::ReadFrame]
        );
    }

    #[test]
    fn test_full_frame_custom_width() {
        let sensor = StubSensor::new().with_frame(&frame_bytes(16));
        let config = AcquisitionConfig {
            resolution: Resolution::X4,
            layout: GridLayout::with_row_width(8),
            ..AcquisitionConfig::default()
        };
        let mut acquisition = ready(sensor, config);
        let mut out = String::new();

        acquisition.poll_once(&mut out).unwrap();
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn test_frame_length_mismatch() {
        let sensor = StubSensor::new().with_frame(&frame_bytes(16));
        let mut acquisition = ready(sensor, AcquisitionConfig::default());
        let mut out = String::new();

        assert_eq!(
            acquisition.poll_once(&mut out),
            Err(PollError::Frame(FrameError::LengthMismatch {
                expected: 128,
                actual: 32
            }))
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_fixed_point() {
        let sensor = StubSensor::new().with_point(Ok(300));
        let config = AcquisitionConfig {
            mode: PollMode::FixedPoint,
            ..AcquisitionConfig::default()
        };
        let mut acquisition = ready(sensor, config);
        let mut out = String::new();

        assert_eq!(acquisition.poll_once(&mut out), Ok(Reading::Point(300)));
        assert_eq!(out, "data: 300\n");
        assert_eq!(acquisition.sensor_mut().calls.last(), Some(&Call::ReadPoint(1, 0)));
    }

    #[test]
    fn test_sensor_error_passed_through() {
        let sensor = StubSensor::new().with_frame_error(StubError::Transient);
        let mut acquisition = ready(sensor, AcquisitionConfig::default());
        let mut out = String::new();

        assert_eq!(
            acquisition.poll_once(&mut out),
            Err(PollError::Sensor(StubError::Transient))
        );
    }

    #[test]
    fn test_poll_interval() {
        let config = AcquisitionConfig {
            poll_interval_ms: 250,
            ..AcquisitionConfig::default()
        };
        let mut acquisition = ready(StubSensor::new(), config);
        acquisition.wait();
        acquisition.wait();

        let (_, delay) = acquisition.into_parts();
        assert_eq!(delay.delays_ms, [250, 250]);
    }

    #[test]
    fn test_step_reports_every_outcome() {
        let sensor = StubSensor::new().with_frame_error(StubError::Transient);
        let config = AcquisitionConfig {
            poll_interval_ms: 250,
            ..AcquisitionConfig::default()
        };
        let mut acquisition = ready(sensor, config);
        let mut out = String::new();
        let mut outcomes: std::vec::Vec<Result<Reading, PollError<StubError>>> =
            std::vec::Vec::new();

        let mut record = |outcome| outcomes.push(outcome);
        acquisition.step(&mut out, &mut record);
        acquisition.step(&mut out, &mut record);

        assert_eq!(
            outcomes,
            [
                Err(PollError::Sensor(StubError::Transient)),
                Err(PollError::Sensor(StubError::Transient))
            ]
        );
        let (_, delay) = acquisition.into_parts();
        assert_eq!(delay.delays_ms, [250, 250]);
    }

    #[test]
    fn test_step_reports_point() {
        let sensor = StubSensor::new().with_point(Ok(42));
        let config = AcquisitionConfig {
            mode: PollMode::FixedPoint,
            ..AcquisitionConfig::default()
        };
        let mut acquisition = ready(sensor, config);
        let mut out = String::new();
        let mut last = None;

        acquisition.step(&mut out, &mut |outcome| last = Some(outcome));

        assert_eq!(last, Some(Ok(Reading::Point(42))));
        assert_eq!(out, "data: 42\n");
    }
}
