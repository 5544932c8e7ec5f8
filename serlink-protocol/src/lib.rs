//! Serlink Message Framing Protocol
//!
//! This crate defines the byte-level framing used between a microcontroller
//! and its host over a plain asynchronous serial line. There is no start byte
//! and no checksum: the type byte alone tells the receiver how many bytes
//! follow.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌──────┬─────────────────────┬─────────────┐
//! │ TYPE │ LENGTH              │ PAYLOAD     │
//! │ 1B   │ 1B, DATA_NB only    │ 0–255B      │
//! └──────┴─────────────────────┴─────────────┘
//! ```
//!
//! The two low bits of TYPE select the size class:
//!
//! | bits | class     | payload                          |
//! |------|-----------|----------------------------------|
//! | `00` | `NoData`  | none                             |
//! | `01` | `Data1B`  | 1 byte                           |
//! | `10` | `Data2B`  | 2 bytes                          |
//! | `11` | `DataNB`  | LENGTH byte, then LENGTH bytes   |
//!
//! The [`Decoder`] and [`Encoder`] are streaming state machines that consume
//! or produce exactly one byte per call, so they can be driven from a
//! budgeted cooperative loop without ever blocking.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod decoder;
pub mod encoder;
pub mod message;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use message::{
    ErrorCode, Message, MessageError, SizeClass, ERROR_MASK, MAX_PAYLOAD_SIZE, SIZE_CLASS_MASK,
};
