//! Commands and typed requests/replies of the matrix lidar protocol
//!
//! Only the ranging commands (`SetMode`, `AllData`, `FixedPoint`) have
//! defined payloads. The remaining identifiers are recognized so that
//! responses to them are not mistaken for garbage.

use crate::codes::DeviceErrorCode;
use crate::packet::{CommandPacket, PacketError, Response};

// Command IDs
pub const CMD_SET_MODE: u8 = 1;
pub const CMD_ALL_DATA: u8 = 2;
pub const CMD_FIXED_POINT: u8 = 3;
pub const CMD_LINE: u8 = 4;
pub const CMD_LIST: u8 = 5;
pub const CMD_AVOID_OBSTACLE: u8 = 6;
pub const CMD_CONFIG_AVOID: u8 = 7;
pub const CMD_OBSTACLE_DISTANCE: u8 = 8;

/// Highest valid command ID
pub const CMD_END: u8 = CMD_OBSTACLE_DISTANCE;

/// Smallest all-data payload the sensor sends (4x4 cells, 2 bytes each)
pub const MIN_ALL_DATA_LEN: usize = 32;

/// Largest all-data payload kept (8x8 cells, 2 bytes each)
pub const MAX_ALL_DATA_LEN: usize = 128;

/// Command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Select 4x4 or 8x8 ranging
    SetMode,
    /// Read the whole distance matrix
    AllData,
    /// Read one cell of the matrix
    FixedPoint,
    Line,
    List,
    AvoidObstacle,
    ConfigAvoid,
    ObstacleDistance,
}

impl Command {
    /// Parse a command from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_SET_MODE => Some(Command::SetMode),
            CMD_ALL_DATA => Some(Command::AllData),
            CMD_FIXED_POINT => Some(Command::FixedPoint),
            CMD_LINE => Some(Command::Line),
            CMD_LIST => Some(Command::List),
            CMD_AVOID_OBSTACLE => Some(Command::AvoidObstacle),
            CMD_CONFIG_AVOID => Some(Command::ConfigAvoid),
            CMD_OBSTACLE_DISTANCE => Some(Command::ObstacleDistance),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::SetMode => CMD_SET_MODE,
            Command::AllData => CMD_ALL_DATA,
            Command::FixedPoint => CMD_FIXED_POINT,
            Command::Line => CMD_LINE,
            Command::List => CMD_LIST,
            Command::AvoidObstacle => CMD_AVOID_OBSTACLE,
            Command::ConfigAvoid => CMD_CONFIG_AVOID,
            Command::ObstacleDistance => CMD_OBSTACLE_DISTANCE,
        }
    }
}

/// Requests the host sends to the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// Switch the sensing matrix (4 or 8 cells per side)
    SetMode { matrix: u8 },
    /// Fetch every cell of the current frame
    AllData,
    /// Fetch a single cell
    FixedPoint { row: u8, col: u8 },
}

impl Request {
    /// Command this request is sent as
    pub fn command(&self) -> Command {
        match self {
            Request::SetMode { .. } => Command::SetMode,
            Request::AllData => Command::AllData,
            Request::FixedPoint { .. } => Command::FixedPoint,
        }
    }

    /// Encode this request into a packet
    pub fn to_packet(&self) -> Result<CommandPacket, PacketError> {
        match self {
            // Payload: [0][0][0][matrix]
            Request::SetMode { matrix } => CommandPacket::new(Command::SetMode, &[0, 0, 0, *matrix]),
            Request::AllData => Ok(CommandPacket::empty(Command::AllData)),
            // Payload: [x][y]
            Request::FixedPoint { row, col } => {
                CommandPacket::new(Command::FixedPoint, &[*row, *col])
            }
        }
    }
}

/// Errors interpreting the content of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyError {
    /// The sensor answered with a failed status
    Rejected(DeviceErrorCode),
    /// The payload is shorter than the reply requires
    TooShort { expected: usize, actual: usize },
}

/// Check that a response reports success
pub fn expect_success(response: &Response) -> Result<(), ReplyError> {
    match response.error_code() {
        None => Ok(()),
        Some(code) => Err(ReplyError::Rejected(code)),
    }
}

/// Extract the distance bytes from an all-data response
///
/// Payloads shorter than [`MIN_ALL_DATA_LEN`] are rejected; anything past
/// [`MAX_ALL_DATA_LEN`] is ignored.
pub fn all_data_payload(response: &Response) -> Result<&[u8], ReplyError> {
    expect_success(response)?;

    let len = response.payload.len();
    if len < MIN_ALL_DATA_LEN {
        return Err(ReplyError::TooShort {
            expected: MIN_ALL_DATA_LEN,
            actual: len,
        });
    }

    Ok(&response.payload[..len.min(MAX_ALL_DATA_LEN)])
}

/// Extract the distance value from a fixed-point response
pub fn fixed_point_value(response: &Response) -> Result<u16, ReplyError> {
    expect_success(response)?;

    match response.payload.as_slice() {
        [low, high, ..] => Ok(u16::from_le_bytes([*low, *high])),
        other => Err(ReplyError::TooShort {
            expected: 2,
            actual: other.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Status;
    use heapless::Vec;

    fn response(status: Status, command: Command, payload: &[u8]) -> Response {
        let mut vec = Vec::new();
        vec.extend_from_slice(payload).unwrap();
        Response {
            status,
            command: command.to_byte(),
            payload: vec,
        }
    }

    #[test]
    fn test_command_roundtrip() {
        for byte in 1..=CMD_END {
            let command = Command::from_byte(byte).unwrap();
            assert_eq!(command.to_byte(), byte);
        }
    }

    #[test]
    fn test_unknown_command() {
        assert!(Command::from_byte(0).is_none());
        assert!(Command::from_byte(CMD_END + 1).is_none());
    }

    #[test]
    fn test_set_mode_request() {
        let packet = Request::SetMode { matrix: 4 }.to_packet().unwrap();
        assert_eq!(packet.command, Command::SetMode);
        assert_eq!(packet.args.as_slice(), &[0, 0, 0, 4]);
    }

    #[test]
    fn test_fixed_point_request() {
        let request = Request::FixedPoint { row: 1, col: 0 };
        let packet = request.to_packet().unwrap();
        assert_eq!(request.command(), Command::FixedPoint);
        assert_eq!(packet.args.as_slice(), &[1, 0]);
    }

    #[test]
    fn test_all_data_payload_4x4() {
        let payload = [7u8; 32];
        let resp = response(Status::Success, Command::AllData, &payload);
        assert_eq!(all_data_payload(&resp).unwrap().len(), 32);
    }

    #[test]
    fn test_all_data_payload_truncated_to_8x8() {
        let payload = [1u8; 140];
        let resp = response(Status::Success, Command::AllData, &payload);
        assert_eq!(all_data_payload(&resp).unwrap().len(), MAX_ALL_DATA_LEN);
    }

    #[test]
    fn test_all_data_payload_too_short() {
        let resp = response(Status::Success, Command::AllData, &[0u8; 31]);
        assert_eq!(
            all_data_payload(&resp),
            Err(ReplyError::TooShort {
                expected: 32,
                actual: 31
            })
        );
    }

    #[test]
    fn test_fixed_point_value() {
        let resp = response(Status::Success, Command::FixedPoint, &[0x2C, 0x01]);
        assert_eq!(fixed_point_value(&resp), Ok(300));
    }

    #[test]
    fn test_fixed_point_rejected() {
        let resp = response(Status::Failed, Command::FixedPoint, &[0x07]);
        assert_eq!(
            fixed_point_value(&resp),
            Err(ReplyError::Rejected(DeviceErrorCode::Args))
        );
    }

    #[test]
    fn test_fixed_point_short_payload() {
        let resp = response(Status::Success, Command::FixedPoint, &[0x2C]);
        assert_eq!(
            fixed_point_value(&resp),
            Err(ReplyError::TooShort {
                expected: 2,
                actual: 1
            })
        );
    }
}
