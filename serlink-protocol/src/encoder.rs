//! Streaming message encoder
//!
//! Produces one byte per call from the message currently loaded. The byte is
//! inspected with [`Encoder::peek`] and only consumed with
//! [`Encoder::advance`], so a caller whose output buffer is full can retry the
//! same byte later without losing or duplicating it.
//!
//! For `NoData`, `Data1B` and `Data2B` messages the number of payload bytes
//! sent is taken from the high bits of the type byte (`type >> 6`) rather than
//! from the size class. Host firmware built against this framing relies on
//! that rule, so it stays the default; [`Encoder::new`] can switch it off.

use crate::message::{Message, SizeClass};

/// State machine for encoding outbound messages
#[derive(Debug, Clone)]
pub struct Encoder {
    message: Option<Message>,
    /// Bytes produced for the current message
    out_count: u16,
    /// Payload bytes to send for the current message
    size: u8,
    derive_size_from_subtype: bool,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Encoder {
    /// Create a new encoder
    ///
    /// With `derive_size_from_subtype` set, non-`DataNB` messages send
    /// `type >> 6` payload bytes; otherwise they send their payload length.
    pub const fn new(derive_size_from_subtype: bool) -> Self {
        Self {
            message: None,
            out_count: 0,
            size: 0,
            derive_size_from_subtype,
        }
    }

    /// Whether no message is in flight
    pub fn is_idle(&self) -> bool {
        self.message.is_none()
    }

    /// Bytes produced for the current message
    pub fn out_count(&self) -> u16 {
        self.out_count
    }

    /// Payload bytes that will be sent for the current message
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Load the next message to stream out
    ///
    /// Hands the message back if one is already in flight.
    pub fn load(&mut self, message: Message) -> Result<(), Message> {
        if self.message.is_some() {
            return Err(message);
        }

        self.size = match message.size_class() {
            SizeClass::DataNB => message.size(),
            _ if self.derive_size_from_subtype => message.msg_type >> 6,
            _ => message.size(),
        };
        self.out_count = 0;
        self.message = Some(message);
        Ok(())
    }

    /// Abandon the in-flight message, releasing its payload
    pub fn reset(&mut self) {
        self.message = None;
        self.out_count = 0;
        self.size = 0;
    }

    /// The next byte to send, without consuming it
    pub fn peek(&self) -> Option<u8> {
        let message = self.message.as_ref()?;
        let class = message.size_class();

        let byte = match self.out_count {
            0 => message.msg_type,
            1 if class == SizeClass::DataNB => self.size,
            count => {
                let offset = usize::from(count - class.header_len());
                // Positions past the stored payload pad with zero
                message.payload.get(offset).copied().unwrap_or(0)
            }
        };
        Some(byte)
    }

    /// Consume the byte returned by [`peek`](Self::peek)
    ///
    /// Returns `true` when that byte completed the message; the payload is
    /// released and the encoder becomes idle.
    pub fn advance(&mut self) -> bool {
        let Some(message) = self.message.as_ref() else {
            return false;
        };
        let class = message.size_class();

        self.out_count += 1;
        let header = class.header_len();
        let complete = class == SizeClass::NoData
            || (self.out_count >= header && self.out_count - header == u16::from(self.size));

        if complete {
            self.reset();
        }
        complete
    }

    /// Produce and consume the next byte
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.advance();
        Some(byte)
    }
}
