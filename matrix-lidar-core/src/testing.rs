//! Stub sensor and delay shared by the unit tests

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::traits::{Classify, FailureKind, RangingSensor, RawFrame, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubError {
    Transient,
    Permanent,
}

impl Classify for StubError {
    fn classify(&self) -> FailureKind {
        match self {
            StubError::Transient => FailureKind::Transient,
            StubError::Permanent => FailureKind::Permanent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Begin,
    Configure(Resolution),
    ReadFrame,
    ReadPoint(u8, u8),
}

/// Sensor that fails a scripted number of times and records every call
#[derive(Debug, Default)]
pub struct StubSensor {
    pub calls: Vec<Call>,
    begun: bool,
    begin_failures: u32,
    configure_failures: u32,
    configure_error: Option<StubError>,
    frames: VecDeque<Result<RawFrame, StubError>>,
    points: VecDeque<Result<u16, StubError>>,
}

impl StubSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_begin(mut self, times: u32) -> Self {
        self.begin_failures = times;
        self
    }

    pub fn fail_configure(self, times: u32) -> Self {
        self.fail_configure_with(StubError::Transient, times)
    }

    pub fn fail_configure_with(mut self, error: StubError, times: u32) -> Self {
        self.configure_failures = times;
        self.configure_error = Some(error);
        self
    }

    pub fn with_frame(mut self, bytes: &[u8]) -> Self {
        let mut frame = RawFrame::new();
        frame.extend_from_slice(bytes).unwrap();
        self.frames.push_back(Ok(frame));
        self
    }

    pub fn with_frame_error(mut self, error: StubError) -> Self {
        self.frames.push_back(Err(error));
        self
    }

    pub fn with_point(mut self, value: Result<u16, StubError>) -> Self {
        self.points.push_back(value);
        self
    }

    pub fn begin_calls(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Begin).count()
    }

    pub fn configure_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Configure(_)))
            .count()
    }
}

impl RangingSensor for StubSensor {
    type Error = StubError;

    fn begin(&mut self) -> Result<(), StubError> {
        self.calls.push(Call::Begin);
        if self.begin_failures > 0 {
            self.begin_failures -= 1;
            return Err(StubError::Transient);
        }
        self.begun = true;
        Ok(())
    }

    fn configure(&mut self, resolution: Resolution) -> Result<(), StubError> {
        assert!(self.begun, "configure called before begin succeeded");
        self.calls.push(Call::Configure(resolution));
        if self.configure_failures > 0 {
            self.configure_failures -= 1;
            return Err(self.configure_error.unwrap_or(StubError::Transient));
        }
        Ok(())
    }

    fn read_frame(&mut self) -> Result<RawFrame, StubError> {
        self.calls.push(Call::ReadFrame);
        self.frames.pop_front().unwrap_or(Err(StubError::Transient))
    }

    fn read_point(&mut self, row: u8, col: u8) -> Result<u16, StubError> {
        self.calls.push(Call::ReadPoint(row, col));
        self.points.pop_front().unwrap_or(Err(StubError::Transient))
    }
}

/// Delay that only records what it was asked to wait
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub delays_ms: Vec<u32>,
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}
