//! Error codes reported by the sensor in failed responses

/// Device error code carried in the first payload byte of a failed response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceErrorCode {
    /// Normal communication
    None,
    /// Invalid command
    CmdInvalid,
    /// Response packet error
    ResponsePacket,
    /// Insufficient memory on the controller side
    MasterNoSpace,
    /// Response packet reception timeout
    ResponseTimeout,
    /// Invalid command packet or unmatched command
    CmdPacket,
    /// Peripheral fault
    SlaveBreak,
    /// Wrong parameter
    Args,
    /// Unsupported SKU
    Sku,
    /// Insufficient memory on the sensor side
    SlaveNoSpace,
    /// Invalid I2C address
    I2cAddress,
    /// Code outside the documented set
    Unknown(u8),
}

// Wire format values
const ERR_CODE_NONE: u8 = 0x00;
const ERR_CODE_CMD_INVALID: u8 = 0x01;
const ERR_CODE_RES_PKT: u8 = 0x02;
const ERR_CODE_M_NO_SPACE: u8 = 0x03;
const ERR_CODE_RES_TIMEOUT: u8 = 0x04;
const ERR_CODE_CMD_PKT: u8 = 0x05;
const ERR_CODE_SLAVE_BREAK: u8 = 0x06;
const ERR_CODE_ARGS: u8 = 0x07;
const ERR_CODE_SKU: u8 = 0x08;
const ERR_CODE_S_NO_SPACE: u8 = 0x09;
const ERR_CODE_I2C_ADDRESS: u8 = 0x0A;

impl DeviceErrorCode {
    /// Parse an error code from its wire format byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            ERR_CODE_NONE => DeviceErrorCode::None,
            ERR_CODE_CMD_INVALID => DeviceErrorCode::CmdInvalid,
            ERR_CODE_RES_PKT => DeviceErrorCode::ResponsePacket,
            ERR_CODE_M_NO_SPACE => DeviceErrorCode::MasterNoSpace,
            ERR_CODE_RES_TIMEOUT => DeviceErrorCode::ResponseTimeout,
            ERR_CODE_CMD_PKT => DeviceErrorCode::CmdPacket,
            ERR_CODE_SLAVE_BREAK => DeviceErrorCode::SlaveBreak,
            ERR_CODE_ARGS => DeviceErrorCode::Args,
            ERR_CODE_SKU => DeviceErrorCode::Sku,
            ERR_CODE_S_NO_SPACE => DeviceErrorCode::SlaveNoSpace,
            ERR_CODE_I2C_ADDRESS => DeviceErrorCode::I2cAddress,
            other => DeviceErrorCode::Unknown(other),
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            DeviceErrorCode::None => ERR_CODE_NONE,
            DeviceErrorCode::CmdInvalid => ERR_CODE_CMD_INVALID,
            DeviceErrorCode::ResponsePacket => ERR_CODE_RES_PKT,
            DeviceErrorCode::MasterNoSpace => ERR_CODE_M_NO_SPACE,
            DeviceErrorCode::ResponseTimeout => ERR_CODE_RES_TIMEOUT,
            DeviceErrorCode::CmdPacket => ERR_CODE_CMD_PKT,
            DeviceErrorCode::SlaveBreak => ERR_CODE_SLAVE_BREAK,
            DeviceErrorCode::Args => ERR_CODE_ARGS,
            DeviceErrorCode::Sku => ERR_CODE_SKU,
            DeviceErrorCode::SlaveNoSpace => ERR_CODE_S_NO_SPACE,
            DeviceErrorCode::I2cAddress => ERR_CODE_I2C_ADDRESS,
            DeviceErrorCode::Unknown(byte) => byte,
        }
    }

    /// Returns true if repeating the same request cannot succeed
    ///
    /// Bad commands, bad arguments and unsupported hardware stay bad;
    /// memory, timeout and packet errors may clear on the next attempt.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            DeviceErrorCode::CmdInvalid
                | DeviceErrorCode::Args
                | DeviceErrorCode::Sku
                | DeviceErrorCode::I2cAddress
        )
    }
}
