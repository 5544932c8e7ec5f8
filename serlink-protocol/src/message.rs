//! Message model for the serlink protocol
//!
//! A message is a type byte plus an owned payload. The payload length is
//! implied by the size class carried in the low two bits of the type byte,
//! except for `DataNB` messages which carry an explicit length byte.

use heapless::Vec;

/// Maximum payload size in bytes (the explicit length is a single byte)
pub const MAX_PAYLOAD_SIZE: usize = 255;

/// Maximum encoded message size (TYPE + LENGTH + MAX_PAYLOAD)
pub const MAX_MESSAGE_SIZE: usize = 1 + 1 + MAX_PAYLOAD_SIZE;

/// Bits of the type byte that select the size class
pub const SIZE_CLASS_MASK: u8 = 0b0000_0011;

/// Bits of the type byte that mark a message as an error report
pub const ERROR_MASK: u8 = 0b0011_0000;

/// Errors that can occur when constructing a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Payload length disagrees with the fixed size of the size class
    SizeMismatch,
}

/// How the payload length of a message is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SizeClass {
    /// No payload
    NoData,
    /// Exactly one payload byte
    Data1B,
    /// Exactly two payload bytes
    Data2B,
    /// Explicit length byte follows the type byte
    DataNB,
}

impl SizeClass {
    /// Extract the size class from a type byte
    pub const fn from_type(msg_type: u8) -> Self {
        match msg_type & SIZE_CLASS_MASK {
            0b00 => SizeClass::NoData,
            0b01 => SizeClass::Data1B,
            0b10 => SizeClass::Data2B,
            _ => SizeClass::DataNB,
        }
    }

    /// Wire bits for this size class
    pub const fn bits(self) -> u8 {
        match self {
            SizeClass::NoData => 0b00,
            SizeClass::Data1B => 0b01,
            SizeClass::Data2B => 0b10,
            SizeClass::DataNB => 0b11,
        }
    }

    /// Payload size implied by the class, or `None` for `DataNB`
    pub const fn fixed_size(self) -> Option<u8> {
        match self {
            SizeClass::NoData => Some(0),
            SizeClass::Data1B => Some(1),
            SizeClass::Data2B => Some(2),
            SizeClass::DataNB => None,
        }
    }

    /// Number of bytes preceding the payload on the wire
    pub const fn header_len(self) -> u16 {
        match self {
            SizeClass::DataNB => 2,
            _ => 1,
        }
    }
}

/// Error codes reported to the host as zero-payload messages
///
/// Both codes are `NoData` types with the [`ERROR_MASK`] bits set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    /// A ring buffer had no free slot (receive overrun)
    BufferFull = 0xF0,
    /// A decoded message was refused by the inbound queue
    MessageRejected = 0xF4,
}

impl ErrorCode {
    /// Parse an error code from its type byte
    pub fn from_type(msg_type: u8) -> Option<Self> {
        match msg_type {
            0xF0 => Some(ErrorCode::BufferFull),
            0xF4 => Some(ErrorCode::MessageRejected),
            _ => None,
        }
    }

    /// Type byte of the error report
    pub const fn to_type(self) -> u8 {
        self as u8
    }
}

/// A typed message with its owned payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    /// Type byte: subtype in the high six bits, size class in the low two
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Message {
    /// Create a new message, checking the payload against the size class
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, MessageError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(MessageError::PayloadTooLarge);
        }

        if let Some(fixed) = SizeClass::from_type(msg_type).fixed_size() {
            if payload.len() != usize::from(fixed) {
                return Err(MessageError::SizeMismatch);
            }
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| MessageError::PayloadTooLarge)?;

        Ok(Self {
            msg_type,
            payload: payload_vec,
        })
    }

    /// Create a message with no payload
    ///
    /// Intended for `NoData` types; no size-class check is made.
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    /// Create the zero-payload report for an error code
    pub fn error(code: ErrorCode) -> Self {
        Self::empty(code.to_type())
    }

    /// Size class selected by the type byte
    pub fn size_class(&self) -> SizeClass {
        SizeClass::from_type(self.msg_type)
    }

    /// Application-specific subtype (high six bits of the type byte)
    pub fn subtype(&self) -> u8 {
        self.msg_type >> 2
    }

    /// Payload size in bytes
    pub fn size(&self) -> u8 {
        // Bounded by MAX_PAYLOAD_SIZE == u8::MAX
        self.payload.len() as u8
    }

    /// Whether the type byte carries the error marker bits
    pub fn is_error(&self) -> bool {
        self.size_class() == SizeClass::NoData && self.msg_type & ERROR_MASK == ERROR_MASK
    }

    /// Number of bytes this message occupies on the wire
    pub fn encoded_len(&self) -> usize {
        usize::from(self.size_class().header_len()) + self.payload.len()
    }
}
