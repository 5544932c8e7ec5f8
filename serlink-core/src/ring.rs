//! Fixed-capacity byte ring buffer shared between interrupt and main context
//!
//! One producer advances `end`, one consumer advances `start`. A slot is
//! always left free so that `start == end` means empty and
//! `(end + 1) % N == start` means full; a buffer of `N` slots holds at most
//! `N - 1` bytes.
//!
//! Indices and slots are atomics. Only `load`/`store` are used, so the buffer
//! works on cores without compare-and-swap. Each side publishes its index with
//! `Release` and reads the other side's index with `Acquire`, which orders the
//! slot access before the index update on either side.

use portable_atomic::{AtomicU8, AtomicUsize, Ordering};

/// Ring buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferError {
    /// No free slot for another byte
    Full,
    /// Nothing to read
    Empty,
}

/// Single-producer/single-consumer byte ring of `N` slots
pub struct RingBuffer<const N: usize> {
    data: [AtomicU8; N],
    start: AtomicUsize,
    end: AtomicUsize,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    const VALID: () = assert!(N >= 2, "ring buffer needs at least two slots");

    /// Create an empty ring buffer
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        Self {
            data: [const { AtomicU8::new(0) }; N],
            start: AtomicUsize::new(0),
            end: AtomicUsize::new(0),
        }
    }

    /// Maximum number of bytes the buffer can hold
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    const fn advance(idx: usize) -> usize {
        let next = idx + 1;
        if next == N {
            0
        } else {
            next
        }
    }

    /// Append a byte (producer side)
    pub fn push(&self, byte: u8) -> Result<(), BufferError> {
        let end = self.end.load(Ordering::Relaxed);
        let next = Self::advance(end);
        if next == self.start.load(Ordering::Acquire) {
            return Err(BufferError::Full);
        }

        self.data[end].store(byte, Ordering::Relaxed);
        self.end.store(next, Ordering::Release);
        Ok(())
    }

    /// Remove the oldest byte (consumer side)
    pub fn pop(&self) -> Result<u8, BufferError> {
        let start = self.start.load(Ordering::Relaxed);
        if start == self.end.load(Ordering::Acquire) {
            return Err(BufferError::Empty);
        }

        let byte = self.data[start].load(Ordering::Relaxed);
        self.start.store(Self::advance(start), Ordering::Release);
        Ok(byte)
    }

    /// Drop everything buffered (consumer side)
    ///
    /// Codec state built from earlier bytes is not touched.
    pub fn clear(&self) {
        let end = self.end.load(Ordering::Acquire);
        self.start.store(end, Ordering::Release);
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        let start = self.start.load(Ordering::Acquire);
        let end = self.end.load(Ordering::Acquire);
        if end >= start {
            end - start
        } else {
            N - start + end
        }
    }

    /// Whether no byte is buffered
    pub fn is_empty(&self) -> bool {
        self.start.load(Ordering::Acquire) == self.end.load(Ordering::Acquire)
    }

    /// Whether every usable slot holds a byte
    pub fn is_full(&self) -> bool {
        Self::advance(self.end.load(Ordering::Acquire)) == self.start.load(Ordering::Acquire)
    }
}
