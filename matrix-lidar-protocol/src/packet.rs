//! Packet encoding and decoding for the matrix lidar command protocol.
//!
//! Command packet (host -> sensor):
//! - HEAD (1 byte): 0x55 synchronization byte
//! - ARGS_H (1 byte): high byte of `args.len() + 1`
//! - ARGS_L (1 byte): low byte of `args.len() + 1`
//! - CMD (1 byte): command identifier
//! - ARGS (0-4 bytes): command-specific arguments
//!
//! Response packet (sensor -> host):
//! - STATUS (1 byte): 0x53 success, 0x63 failed, anything else is line noise
//! - CMD (1 byte): echo of the command being answered
//! - LEN_L, LEN_H (2 bytes): payload length, little-endian
//! - PAYLOAD (LEN bytes)

use heapless::Vec;

use crate::codes::DeviceErrorCode;
use crate::messages::Command;

/// Command packet synchronization byte
pub const PACKET_HEAD: u8 = 0x55;

/// Status byte of a successful response
pub const STATUS_SUCCESS: u8 = 0x53;

/// Status byte of a failed response
pub const STATUS_FAILED: u8 = 0x63;

/// Byte the sensor clocks out while it has no response ready
pub const IDLE_BYTE: u8 = 0xFF;

/// Maximum argument bytes in a command packet
pub const MAX_ARGS: usize = 4;

/// Maximum complete command packet size (HEAD + ARGS_H + ARGS_L + CMD + ARGS)
pub const MAX_COMMAND_SIZE: usize = 4 + MAX_ARGS;

/// Response payloads must be strictly shorter than this
pub const RESPONSE_LENGTH_LIMIT: u16 = 1000;

/// Maximum response payload held by the parser
pub const MAX_RESPONSE_PAYLOAD: usize = RESPONSE_LENGTH_LIMIT as usize - 1;

/// Errors that can occur while building a command packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// More arguments than a command packet carries
    ArgsTooLong,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Errors that can occur while parsing a response packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseError {
    /// The response answers a different command
    CommandMismatch { expected: u8, received: u8 },
    /// Announced payload length is at or above the protocol limit
    LengthTooLarge(u16),
}

/// A command packet ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPacket {
    /// Command identifier
    pub command: Command,
    /// Argument bytes
    pub args: Vec<u8, MAX_ARGS>,
}

impl CommandPacket {
    /// Create a new packet with the given command and arguments
    pub fn new(command: Command, args: &[u8]) -> Result<Self, PacketError> {
        let mut args_vec = Vec::new();
        args_vec
            .extend_from_slice(args)
            .map_err(|_| PacketError::ArgsTooLong)?;

        Ok(Self {
            command,
            args: args_vec,
        })
    }

    /// Create a packet with no arguments
    pub fn empty(command: Command) -> Self {
        Self {
            command,
            args: Vec::new(),
        }
    }

    /// Encoded length of this packet in bytes
    pub fn encoded_len(&self) -> usize {
        4 + self.args.len()
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, PacketError> {
        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(PacketError::BufferTooSmall);
        }

        // The count covers the command byte as well as the arguments
        let count = (self.args.len() + 1) as u16;

        buffer[0] = PACKET_HEAD;
        buffer[1] = (count >> 8) as u8;
        buffer[2] = count as u8;
        buffer[3] = self.command.to_byte();
        buffer[4..len].copy_from_slice(&self.args);

        Ok(len)
    }

    /// Encode this packet into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_COMMAND_SIZE>, PacketError> {
        let mut buffer = [0u8; MAX_COMMAND_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| PacketError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Outcome flag carried in the first byte of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    /// Parse a status byte; `None` for idle or noise bytes
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            STATUS_SUCCESS => Some(Status::Success),
            STATUS_FAILED => Some(Status::Failed),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Status::Success => STATUS_SUCCESS,
            Status::Failed => STATUS_FAILED,
        }
    }
}

/// A complete response packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Success or failure
    pub status: Status,
    /// Echoed command byte
    pub command: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_RESPONSE_PAYLOAD>,
}

impl Response {
    /// Check whether the sensor accepted the command
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Device error code of a failed response
    ///
    /// A failed response without payload reports `DeviceErrorCode::None`.
    pub fn error_code(&self) -> Option<DeviceErrorCode> {
        match self.status {
            Status::Success => None,
            Status::Failed => Some(
                self.payload
                    .first()
                    .map(|&b| DeviceErrorCode::from_byte(b))
                    .unwrap_or(DeviceErrorCode::None),
            ),
        }
    }

    /// Encode this response the way the sensor sends it
    #[cfg(test)]
    pub fn encode_to_vec<const N: usize>(&self) -> Result<Vec<u8, N>, PacketError> {
        let len = self.payload.len() as u16;
        let mut vec = Vec::new();
        vec.extend_from_slice(&[self.status.to_byte(), self.command, len as u8, (len >> 8) as u8])
            .map_err(|_| PacketError::BufferTooSmall)?;
        vec.extend_from_slice(&self.payload)
            .map_err(|_| PacketError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// State machine for parsing incoming responses
#[derive(Debug, Clone)]
pub struct ResponseParser {
    expected: Command,
    state: ParseState,
    status: Status,
    length: u16,
    buffer: Vec<u8, MAX_RESPONSE_PAYLOAD>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Skipping idle/noise bytes until a status byte shows up
    WaitingForStatus,
    /// Got STATUS, waiting for the echoed command
    WaitingForCommand,
    /// Waiting for the low length byte
    WaitingForLengthLow,
    /// Waiting for the high length byte
    WaitingForLengthHigh,
    /// Reading payload bytes
    ReadingPayload,
}

impl ResponseParser {
    /// Create a parser for the response to `expected`
    pub fn new(expected: Command) -> Self {
        Self {
            expected,
            state: ParseState::WaitingForStatus,
            status: Status::Failed,
            length: 0,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStatus;
        self.status = Status::Failed;
        self.length = 0;
        self.buffer.clear();
    }

    /// True while no status byte has been seen
    pub fn awaiting_status(&self) -> bool {
        self.state == ParseState::WaitingForStatus
    }

    /// Number of bytes that can be fed before the parser needs to decide
    /// anything. Zero while waiting for a status byte.
    pub fn bytes_needed(&self) -> usize {
        match self.state {
            ParseState::WaitingForStatus => 0,
            ParseState::WaitingForCommand => 1,
            ParseState::WaitingForLengthLow => 2,
            ParseState::WaitingForLengthHigh => 1,
            ParseState::ReadingPayload => self.length as usize - self.buffer.len(),
        }
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(response))` when a complete response is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Response>, ResponseError> {
        match self.state {
            ParseState::WaitingForStatus => {
                if let Some(status) = Status::from_byte(byte) {
                    self.status = status;
                    self.state = ParseState::WaitingForCommand;
                }
                // Idle and noise bytes are skipped while waiting
                Ok(None)
            }
            ParseState::WaitingForCommand => {
                let expected = self.expected.to_byte();
                if byte != expected {
                    self.reset();
                    return Err(ResponseError::CommandMismatch {
                        expected,
                        received: byte,
                    });
                }
                self.state = ParseState::WaitingForLengthLow;
                Ok(None)
            }
            ParseState::WaitingForLengthLow => {
                self.length = byte as u16;
                self.state = ParseState::WaitingForLengthHigh;
                Ok(None)
            }
            ParseState::WaitingForLengthHigh => {
                self.length |= (byte as u16) << 8;
                if self.length >= RESPONSE_LENGTH_LIMIT {
                    let length = self.length;
                    self.reset();
                    return Err(ResponseError::LengthTooLarge(length));
                }
                self.buffer.clear();
                if self.length == 0 {
                    return Ok(Some(self.finish()));
                }
                self.state = ParseState::ReadingPayload;
                Ok(None)
            }
            ParseState::ReadingPayload => {
                // Cannot overflow: length was checked against the capacity
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.length as usize {
                    return Ok(Some(self.finish()));
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete response found, if any.
    /// Remaining bytes after a complete response are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Response>, ResponseError> {
        for &byte in bytes {
            if let Some(response) = self.feed(byte)? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }

    fn finish(&mut self) -> Response {
        let response = Response {
            status: self.status,
            command: self.expected.to_byte(),
            payload: self.buffer.clone(),
        };
        self.reset();
        response
    }
}
