//! Board-agnostic core of the serlink serial message link
//!
//! This crate contains everything between the serial hardware and the
//! application's message queues:
//!
//! - Fixed-capacity SPSC byte ring buffers shared with interrupt context
//! - Shared link state and the receive / transmit-ready interrupt handlers
//! - The budgeted resolver that decodes inbound and encodes outbound traffic
//! - The message queue boundary and a fixed-capacity implementation
//! - Link configuration
//!
//! # Data flow
//!
//! ```text
//! UART ─► on_receive ─► inbound ring ─► Resolver (decode) ─► inbound queue
//! UART ◄─ on_transmit_ready ◄─ outbound ring ◄─ Resolver (encode) ◄─ outbound queue
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod link;
pub mod queue;
pub mod resolver;
pub mod ring;

#[cfg(test)]
mod mock;

pub use config::{ConfigError, LinkConfig};
pub use error::LinkError;
pub use link::{Link, StickyError};
pub use queue::{Direction, MessageQueue, MessageQueues, QueueEmpty, QueueFull};
pub use resolver::{DecodeStep, EncodeStep, ResolveReport, Resolver};
pub use ring::{BufferError, RingBuffer};
