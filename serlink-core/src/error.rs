//! Link error kinds
//!
//! Every error is recovered where it happens: the byte or message involved is
//! dropped and, for the reportable kinds, the matching [`ErrorCode`] is latched
//! into the sticky error flag for the resolver to forward to the host.

use serlink_protocol::ErrorCode;

use crate::ring::BufferError;

/// Errors raised while moving bytes across the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// A producer could not store a byte (receive overrun or encoder backpressure)
    BufferFull,
    /// A consumer found nothing to read
    BufferEmpty,
    /// A decoded message could not be handed to the inbound queue
    MessageRejected,
}

impl LinkError {
    /// Code reported to the host, if this kind is reported at all
    pub fn code(self) -> Option<ErrorCode> {
        match self {
            LinkError::BufferFull => Some(ErrorCode::BufferFull),
            LinkError::BufferEmpty => None,
            LinkError::MessageRejected => Some(ErrorCode::MessageRejected),
        }
    }
}

impl From<BufferError> for LinkError {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::Full => LinkError::BufferFull,
            BufferError::Empty => LinkError::BufferEmpty,
        }
    }
}
