//! Serlink Hardware Abstraction Layer
//!
//! This crate defines the boundary between the link core and a concrete
//! serial peripheral. Chip-specific code implements [`SerialPort`] so the
//! same interrupt handlers and resolver run on any target, including the
//! host test doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  serlink-core (ring buffers, resolver)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  serlink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ RP2040 UART0  │       │   MockPort    │
//! │  (firmware)   │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialPort`] - Register-level byte access and TX interrupt gating

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

pub use uart::{DataBits, Parity, SerialPort, StopBits, UartConfig};
