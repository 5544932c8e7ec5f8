//! Shared link state and the two interrupt handlers
//!
//! [`Link`] bundles everything the interrupt context touches: both ring
//! buffers, the transmitter-busy flag and the sticky error flag. It is
//! const-constructible and `Sync`, so firmware places it in a `static` and the
//! handlers reach it without allocation or locking.
//!
//! # Flag races
//!
//! Both flags are written from interrupt and main context with plain atomic
//! stores. A second error raised before the resolver consumes the first
//! overwrites it (last write wins), and an error raised between the
//! resolver's read and its clear is lost. Exact delivery of every error is not
//! part of the link's contract.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};
use serlink_hal::SerialPort;
use serlink_protocol::ErrorCode;

use crate::error::LinkError;
use crate::ring::RingBuffer;

/// Flag value meaning "no error pending"
const NO_ERROR: u8 = 0;

/// Last-write-wins error latch
pub struct StickyError {
    code: AtomicU8,
}

impl Default for StickyError {
    fn default() -> Self {
        Self::new()
    }
}

impl StickyError {
    pub const fn new() -> Self {
        Self {
            code: AtomicU8::new(NO_ERROR),
        }
    }

    /// Latch an error code, replacing any pending one
    pub fn raise(&self, code: ErrorCode) {
        self.code.store(code.to_type(), Ordering::Release);
    }

    /// Pending error code, if any, without clearing it
    pub fn peek(&self) -> Option<ErrorCode> {
        ErrorCode::from_type(self.code.load(Ordering::Acquire))
    }

    /// Read and clear the pending error code
    pub fn take(&self) -> Option<ErrorCode> {
        let code = self.peek()?;
        self.code.store(NO_ERROR, Ordering::Release);
        Some(code)
    }
}

/// State shared between the interrupt handlers and the resolver
///
/// `RX` and `TX` are the slot counts of the inbound and outbound ring
/// buffers.
pub struct Link<const RX: usize, const TX: usize> {
    inbound: RingBuffer<RX>,
    outbound: RingBuffer<TX>,
    tx_busy: AtomicBool,
    error: StickyError,
}

impl<const RX: usize, const TX: usize> Default for Link<RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const RX: usize, const TX: usize> Link<RX, TX> {
    /// Create an idle link with empty buffers
    pub const fn new() -> Self {
        Self {
            inbound: RingBuffer::new(),
            outbound: RingBuffer::new(),
            tx_busy: AtomicBool::new(false),
            error: StickyError::new(),
        }
    }

    /// Bytes received from the hardware, waiting to be decoded
    pub fn inbound(&self) -> &RingBuffer<RX> {
        &self.inbound
    }

    /// Encoded bytes waiting for the transmitter
    pub fn outbound(&self) -> &RingBuffer<TX> {
        &self.outbound
    }

    /// The sticky error flag
    pub fn error(&self) -> &StickyError {
        &self.error
    }

    /// Whether the transmit-ready interrupt is currently feeding the hardware
    pub fn is_transmitter_busy(&self) -> bool {
        self.tx_busy.load(Ordering::Acquire)
    }

    /// Latch a reportable error; unreportable kinds are ignored
    pub fn raise(&self, error: LinkError) {
        if let Some(code) = error.code() {
            self.error.raise(code);
        }
    }

    /// Receive interrupt handler
    ///
    /// Moves the received byte into the inbound buffer. On overrun the byte is
    /// dropped and `BufferFull` is latched.
    pub fn on_receive<P: SerialPort>(&self, port: &P) {
        let byte = port.read_data();
        if let Err(e) = self.inbound.push(byte) {
            self.raise(e.into());
        }
    }

    /// Transmit-ready interrupt handler
    ///
    /// Writes the next outbound byte, or stops the transmit-ready interrupt
    /// once the outbound buffer runs dry.
    pub fn on_transmit_ready<P: SerialPort>(&self, port: &P) {
        match self.outbound.pop() {
            Ok(byte) => port.write_data(byte),
            Err(_) => {
                self.tx_busy.store(false, Ordering::Release);
                port.set_transmit_interrupt(false);
            }
        }
    }

    /// Restart the transmitter if it went idle
    ///
    /// Called by the encoder after each byte it buffers.
    pub fn kick_transmitter<P: SerialPort>(&self, port: &P) {
        if !self.tx_busy.load(Ordering::Acquire) {
            self.tx_busy.store(true, Ordering::Release);
            port.set_transmit_interrupt(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPort;

    #[test]
    fn test_receive_pushes_byte() {
        let link = Link::<8, 8>::new();
        let port = MockPort::new();
        port.receive(0x42);
        link.on_receive(&port);

        assert_eq!(link.inbound().pop(), Ok(0x42));
        assert_eq!(link.error().peek(), None);
    }

    #[test]
    fn test_receive_overrun_latches_error() {
        let link = Link::<4, 4>::new();
        let port = MockPort::new();
        for byte in 0..5 {
            port.receive(byte);
            link.on_receive(&port);
        }

        // Three slots usable; bytes 3 and 4 were dropped
        assert_eq!(link.inbound().len(), 3);
        assert_eq!(link.error().take(), Some(ErrorCode::BufferFull));
        assert_eq!(link.error().take(), None);
    }

    #[test]
    fn test_transmit_ready_writes_byte() {
        let link = Link::<4, 4>::new();
        let port = MockPort::new();
        link.outbound().push(0x11).unwrap();
        link.kick_transmitter(&port);
        link.on_transmit_ready(&port);

        assert_eq!(port.written(), [0x11]);
        assert!(link.is_transmitter_busy());
        assert!(port.transmit_interrupt_enabled());
    }

    #[test]
    fn test_transmit_ready_on_empty_stops_interrupt() {
        let link = Link::<4, 4>::new();
        let port = MockPort::new();
        link.kick_transmitter(&port);
        link.on_transmit_ready(&port);

        assert!(port.written().is_empty());
        assert!(!link.is_transmitter_busy());
        assert!(!port.transmit_interrupt_enabled());
    }

    #[test]
    fn test_kick_only_enables_once() {
        let link = Link::<4, 4>::new();
        let port = MockPort::new();
        link.kick_transmitter(&port);
        link.kick_transmitter(&port);
        assert_eq!(port.enable_count(), 1);
    }

    #[test]
    fn test_sticky_error_last_write_wins() {
        let error = StickyError::new();
        error.raise(ErrorCode::BufferFull);
        error.raise(ErrorCode::MessageRejected);
        assert_eq!(error.take(), Some(ErrorCode::MessageRejected));
        assert_eq!(error.peek(), None);
    }

    #[test]
    fn test_buffer_empty_is_not_latched() {
        let link = Link::<4, 4>::new();
        link.raise(LinkError::BufferEmpty);
        assert_eq!(link.error().peek(), None);
    }
}
