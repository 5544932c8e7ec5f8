//! Streaming message decoder
//!
//! Consumes one byte per call. Wire layout:
//! - TYPE (1 byte): subtype and size class
//! - LENGTH (1 byte, `DataNB` only): payload length
//! - PAYLOAD (0-255 bytes)

use heapless::Vec;

use crate::message::{Message, SizeClass, MAX_PAYLOAD_SIZE};

/// Placeholder size of a `DataNB` message before its length byte arrives
const NB_PLACEHOLDER_SIZE: u8 = 2;

/// State machine for decoding inbound messages
#[derive(Debug, Clone)]
pub struct Decoder {
    /// Bytes consumed for the current message
    in_count: u16,
    msg_type: u8,
    size: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Create a new decoder
    pub const fn new() -> Self {
        Self {
            in_count: 0,
            msg_type: 0,
            size: 0,
            payload: Vec::new(),
        }
    }

    /// Abandon the in-flight message
    pub fn reset(&mut self) {
        self.in_count = 0;
        self.msg_type = 0;
        self.size = 0;
        self.payload.clear();
    }

    /// Whether a message is partially decoded
    pub fn in_progress(&self) -> bool {
        self.in_count != 0
    }

    /// Bytes consumed for the current message
    pub fn in_count(&self) -> u16 {
        self.in_count
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Some(message)` when the byte completes a message, handing
    /// ownership of the payload to the caller, or `None` when more bytes are
    /// needed.
    pub fn feed(&mut self, byte: u8) -> Option<Message> {
        let class = if self.in_count == 0 {
            self.msg_type = byte;
            self.payload.clear();
            let class = SizeClass::from_type(byte);
            self.size = class.fixed_size().unwrap_or(NB_PLACEHOLDER_SIZE);
            class
        } else {
            let class = SizeClass::from_type(self.msg_type);
            if self.in_count == 1 && class == SizeClass::DataNB {
                self.size = byte;
                self.payload.clear();
            } else {
                // Bounded: completion triggers at `size` bytes, and size <= MAX_PAYLOAD_SIZE
                let _ = self.payload.push(byte);
            }
            class
        };

        let complete = match class {
            SizeClass::NoData => true,
            SizeClass::DataNB if self.in_count == 0 => false,
            _ => self.payload.len() == usize::from(self.size),
        };

        if complete {
            let message = Message {
                msg_type: self.msg_type,
                payload: core::mem::take(&mut self.payload),
            };
            self.reset();
            Some(message)
        } else {
            self.in_count += 1;
            None
        }
    }

    /// Feed multiple bytes to the decoder
    ///
    /// Returns the first complete message found, if any.
    /// Remaining bytes after a complete message are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<Message> {
        bytes.iter().find_map(|&byte| self.feed(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_no_data_completes_on_type() {
        let mut decoder = Decoder::new();
        let msg = decoder.feed(0x04).unwrap();
        assert_eq!(msg.msg_type, 0x04);
        assert!(msg.payload.is_empty());
        assert!(!decoder.in_progress());
    }

    #[test]
    fn test_decode_one_byte_message() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed(0b000010_01).is_none());
        assert!(decoder.in_progress());

        let msg = decoder.feed(0x7A).unwrap();
        assert_eq!(msg.msg_type, 0b000010_01);
        assert_eq!(msg.subtype(), 2);
        assert_eq!(msg.size(), 1);
        assert_eq!(&msg.payload[..], &[0x7A]);
        assert_eq!(decoder.in_count(), 0);
    }

    #[test]
    fn test_decode_two_byte_message() {
        let mut decoder = Decoder::new();
        let msg = decoder.feed_bytes(&[0x82, 0x12, 0x34]).unwrap();
        assert_eq!(msg.size(), 2);
        assert_eq!(&msg.payload[..], &[0x12, 0x34]);
    }

    #[test]
    fn test_decode_nb_message() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed(0x0F).is_none());
        assert!(decoder.feed(0x05).is_none());
        for byte in 1..5u8 {
            assert!(decoder.feed(byte).is_none());
        }
        let msg = decoder.feed(5).unwrap();

        assert_eq!(msg.msg_type, 0x0F);
        assert_eq!(msg.size(), 5);
        assert_eq!(&msg.payload[..], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_decode_nb_zero_length_completes_on_length_byte() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed(0x03).is_none());
        let msg = decoder.feed(0x00).unwrap();
        assert_eq!(msg.size(), 0);

        // Next byte starts a fresh message
        let next = decoder.feed(0x08).unwrap();
        assert_eq!(next.msg_type, 0x08);
    }

    #[test]
    fn test_decode_nb_placeholder_does_not_complete_early() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed(0x03).is_none());
        assert!(decoder.feed(0x03).is_none());
        assert!(decoder.feed(0xAA).is_none());
        assert!(decoder.feed(0xBB).is_none());
        let msg = decoder.feed(0xCC).unwrap();
        assert_eq!(&msg.payload[..], &[0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_decode_back_to_back_messages() {
        let mut decoder = Decoder::new();
        let stream = [0x04, 0x41, 0x99, 0x03, 0x02, 0xDE, 0xAD];
        let mut decoded = heapless::Vec::<Message, 4>::new();
        for &byte in &stream {
            if let Some(msg) = decoder.feed(byte) {
                decoded.push(msg).unwrap();
            }
        }

        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].msg_type, 0x04);
        assert_eq!(&decoded[1].payload[..], &[0x99]);
        assert_eq!(&decoded[2].payload[..], &[0xDE, 0xAD]);
    }

    #[test]
    fn test_reset_abandons_partial_message() {
        let mut decoder = Decoder::new();
        decoder.feed(0x03);
        decoder.feed(0x10);
        decoder.feed(0x01);
        decoder.reset();

        assert!(!decoder.in_progress());
        let msg = decoder.feed_bytes(&[0x41, 0x55]).unwrap();
        assert_eq!(&msg.payload[..], &[0x55]);
    }

    #[test]
    fn test_decode_max_nb_payload() {
        let mut decoder = Decoder::new();
        decoder.feed(0x03);
        decoder.feed(0xFF);
        let mut result = None;
        for i in 0..=254u8 {
            result = decoder.feed(i);
        }
        let msg = result.unwrap();
        assert_eq!(msg.payload.len(), MAX_PAYLOAD_SIZE);
        assert_eq!(msg.payload[254], 254);
    }
}
