//! Matrix Lidar Command Protocol
//!
//! This crate defines the request/response protocol spoken by DFRobot-style
//! matrix ToF sensors over I2C or UART. The protocol is transport-agnostic:
//! the same packets travel over both buses.
//!
//! # Protocol Overview
//!
//! Commands from the host:
//! ```text
//! ┌──────┬────────┬────────┬─────┬───────────┐
//! │ HEAD │ ARGS_H │ ARGS_L │ CMD │ ARGS      │
//! │ 0x55 │ 1B     │ 1B     │ 1B  │ 0–4B      │
//! └──────┴────────┴────────┴─────┴───────────┘
//! ```
//!
//! Responses from the sensor:
//! ```text
//! ┌────────┬─────┬───────┬───────┬─────────────┐
//! │ STATUS │ CMD │ LEN_L │ LEN_H │ PAYLOAD     │
//! │ 1B     │ 1B  │ 1B    │ 1B    │ 0–999B      │
//! └────────┴─────┴───────┴───────┴─────────────┘
//! ```
//!
//! The sensor clocks out idle bytes until a response is ready, so the
//! parser discards everything that is not a status byte.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod codes;
pub mod messages;
pub mod packet;

pub use codes::DeviceErrorCode;
pub use messages::{
    all_data_payload, expect_success, fixed_point_value, Command, ReplyError, Request,
    MAX_ALL_DATA_LEN, MIN_ALL_DATA_LEN,
};
pub use packet::{
    CommandPacket, PacketError, Response, ResponseError, ResponseParser, Status, IDLE_BYTE,
    MAX_COMMAND_SIZE, PACKET_HEAD,
};
