//! Driver errors

use core::fmt;

use matrix_lidar_core::traits::{Classify, FailureKind};
use matrix_lidar_protocol::{PacketError, ReplyError, ResponseError};

/// Errors that can occur talking to the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError<E> {
    /// The underlying bus failed (I2C NACK, UART fault)
    Bus(E),
    /// No complete response arrived in time
    Timeout,
    /// The response framing was wrong
    Response(ResponseError),
    /// The response content was unusable or reported a device error
    Reply(ReplyError),
    /// The request could not be encoded
    Packet(PacketError),
}

impl<E> From<ResponseError> for DriverError<E> {
    fn from(e: ResponseError) -> Self {
        DriverError::Response(e)
    }
}

impl<E> From<ReplyError> for DriverError<E> {
    fn from(e: ReplyError) -> Self {
        DriverError::Reply(e)
    }
}

impl<E> From<PacketError> for DriverError<E> {
    fn from(e: PacketError) -> Self {
        DriverError::Packet(e)
    }
}

impl<E> Classify for DriverError<E> {
    fn classify(&self) -> FailureKind {
        match self {
            DriverError::Reply(ReplyError::Rejected(code)) if code.is_permanent() => {
                FailureKind::Permanent
            }
            DriverError::Packet(_) => FailureKind::Permanent,
            _ => FailureKind::Transient,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for DriverError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Bus(e) => write!(f, "bus error: {:?}", e),
            DriverError::Timeout => f.write_str("response timed out"),
            DriverError::Response(ResponseError::CommandMismatch { expected, received }) => write!(
                f,
                "response to command {} while waiting for {}",
                received, expected
            ),
            DriverError::Response(ResponseError::LengthTooLarge(len)) => {
                write!(f, "response length {} out of range", len)
            }
            DriverError::Reply(ReplyError::Rejected(code)) => {
                write!(f, "sensor rejected the command: {:?}", code)
            }
            DriverError::Reply(ReplyError::TooShort { expected, actual }) => write!(
                f,
                "response payload has {} bytes, expected at least {}",
                actual, expected
            ),
            DriverError::Packet(e) => write!(f, "cannot encode request: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_lidar_protocol::DeviceErrorCode;

    type Error = DriverError<()>;

    #[test]
    fn test_classify_transient() {
        assert!(!Error::Bus(()).is_permanent());
        assert!(!Error::Timeout.is_permanent());
        assert!(!Error::Response(ResponseError::LengthTooLarge(1200)).is_permanent());
        assert!(!Error::Reply(ReplyError::TooShort {
            expected: 32,
            actual: 0
        })
        .is_permanent());
        assert!(!Error::Reply(ReplyError::Rejected(DeviceErrorCode::SlaveBreak)).is_permanent());
    }

    #[test]
    fn test_classify_permanent() {
        assert!(Error::Reply(ReplyError::Rejected(DeviceErrorCode::Args)).is_permanent());
        assert!(Error::Reply(ReplyError::Rejected(DeviceErrorCode::Sku)).is_permanent());
        assert!(Error::Packet(PacketError::ArgsTooLong).is_permanent());
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::Timeout.to_string(), "response timed out");
        assert_eq!(
            Error::Reply(ReplyError::Rejected(DeviceErrorCode::Args)).to_string(),
            "sensor rejected the command: Args"
        );
    }
}
