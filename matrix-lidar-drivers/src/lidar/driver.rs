//! Matrix lidar driver
//!
//! Every operation is one request/response exchange:
//!
//! 1. Encode the request and send it over the transport
//! 2. Poll single bytes until a status byte shows up, waiting
//!    `poll_step_ms` between polls (plus `noise_backoff_ms` after noise)
//! 3. Read the rest of the response in the sizes the parser asks for
//!
//! Time is accounted by the delays issued, so no clock is needed.

use embedded_hal::delay::DelayNs;
use matrix_lidar_core::config::DriverConfig;
use matrix_lidar_core::traits::{RangingSensor, RawFrame, Resolution, MAX_FRAME_BYTES};
use matrix_lidar_protocol::{
    all_data_payload, expect_success, fixed_point_value, Command, Request, Response,
    ResponseParser, IDLE_BYTE,
};

use super::error::DriverError;
use crate::transport::Transport;

/// Largest read issued at once while collecting a response body
const RECEIVE_CHUNK: usize = 32;

/// Matrix ToF sensor on some transport
pub struct MatrixLidar<T, D> {
    transport: T,
    delay: D,
    config: DriverConfig,
}

impl<T, D> MatrixLidar<T, D>
where
    T: Transport,
    D: DelayNs,
{
    pub fn new(transport: T, delay: D, config: DriverConfig) -> Self {
        Self {
            transport,
            delay,
            config,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport and delay
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    /// Send a request and wait for the matching response
    pub fn transact(&mut self, request: Request) -> Result<Response, DriverError<T::Error>> {
        let packet = request.to_packet()?.encode_to_vec()?;
        self.transport.send(&packet, &mut self.delay)?;
        self.receive(request.command())
    }

    fn receive(&mut self, command: Command) -> Result<Response, DriverError<T::Error>> {
        let mut parser = ResponseParser::new(command);
        let mut waited_ms: u32 = 0;

        while waited_ms < self.config.response_timeout_ms {
            if let Some(byte) = self.transport.poll_byte()? {
                if byte != IDLE_BYTE {
                    parser.feed(byte)?;
                    if !parser.awaiting_status() {
                        return self.receive_body(&mut parser);
                    }
                    // Noise: give the sensor a moment before polling again
                    self.delay.delay_ms(self.config.noise_backoff_ms);
                    waited_ms = waited_ms.saturating_add(self.config.noise_backoff_ms);
                }
            }
            self.delay.delay_ms(self.config.poll_step_ms);
            waited_ms = waited_ms.saturating_add(self.config.poll_step_ms);
        }

        Err(DriverError::Timeout)
    }

    fn receive_body(
        &mut self,
        parser: &mut ResponseParser,
    ) -> Result<Response, DriverError<T::Error>> {
        let mut buf = [0u8; RECEIVE_CHUNK];
        loop {
            let n = parser.bytes_needed().min(RECEIVE_CHUNK);
            if n == 0 {
                // The parser only rests between responses
                return Err(DriverError::Timeout);
            }
            self.transport.receive(&mut buf[..n], &mut self.delay)?;
            if let Some(response) = parser.feed_bytes(&buf[..n])? {
                return Ok(response);
            }
        }
    }
}

impl<T, D> RangingSensor for MatrixLidar<T, D>
where
    T: Transport,
    D: DelayNs,
{
    type Error = DriverError<T::Error>;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.transport.open()
    }

    fn configure(&mut self, resolution: Resolution) -> Result<(), Self::Error> {
        let response = self.transact(Request::SetMode {
            matrix: resolution.side(),
        })?;
        expect_success(&response)?;

        // The sensor restarts ranging after a mode change
        self.delay.delay_ms(self.config.mode_settle_ms);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<RawFrame, Self::Error> {
        let response = self.transact(Request::AllData)?;
        let payload = all_data_payload(&response)?;

        let mut frame = RawFrame::new();
        // Cannot overflow: the payload is capped at MAX_FRAME_BYTES
        let _ = frame.extend_from_slice(&payload[..payload.len().min(MAX_FRAME_BYTES)]);
        Ok(frame)
    }

    fn read_point(&mut self, row: u8, col: u8) -> Result<u16, Self::Error> {
        let response = self.transact(Request::FixedPoint { row, col })?;
        Ok(fixed_point_value(&response)?)
    }
}
