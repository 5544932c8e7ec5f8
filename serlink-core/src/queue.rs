//! Message queue boundary
//!
//! The resolver hands decoded messages to, and takes messages to encode from,
//! a pair of FIFOs it does not own. [`MessageQueue`] is that contract;
//! [`MessageQueues`] is a fixed-capacity implementation for firmware and host
//! tests.

use heapless::Deque;
use serlink_protocol::Message;

/// Which side of the link a queue or resolver turn serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Host to device: decoded messages for the application
    Inbound,
    /// Device to host: messages waiting to be encoded
    Outbound,
}

impl Direction {
    /// The opposite direction
    pub const fn other(self) -> Self {
        match self {
            Direction::Inbound => Direction::Outbound,
            Direction::Outbound => Direction::Inbound,
        }
    }
}

/// The queue refused a message; the message is handed back
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull(pub Message);

/// The queue had nothing to hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueEmpty;

/// Upstream/downstream message FIFOs used by the resolver
pub trait MessageQueue {
    /// Append a message to the queue for `direction`
    fn push(&mut self, message: Message, direction: Direction) -> Result<(), QueueFull>;

    /// Take the oldest message from the queue for `direction`
    fn pop(&mut self, direction: Direction) -> Result<Message, QueueEmpty>;

    /// Whether the queue for `direction` holds any message
    fn has_pending(&self, direction: Direction) -> bool;
}

/// A pair of fixed-capacity FIFOs, `N` messages per direction
#[derive(Debug)]
pub struct MessageQueues<const N: usize> {
    inbound: Deque<Message, N>,
    outbound: Deque<Message, N>,
}

impl<const N: usize> Default for MessageQueues<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MessageQueues<N> {
    pub const fn new() -> Self {
        Self {
            inbound: Deque::new(),
            outbound: Deque::new(),
        }
    }

    fn queue(&self, direction: Direction) -> &Deque<Message, N> {
        match direction {
            Direction::Inbound => &self.inbound,
            Direction::Outbound => &self.outbound,
        }
    }

    fn queue_mut(&mut self, direction: Direction) -> &mut Deque<Message, N> {
        match direction {
            Direction::Inbound => &mut self.inbound,
            Direction::Outbound => &mut self.outbound,
        }
    }

    /// Number of messages queued for `direction`
    pub fn len(&self, direction: Direction) -> usize {
        self.queue(direction).len()
    }
}

impl<const N: usize> MessageQueue for MessageQueues<N> {
    fn push(&mut self, message: Message, direction: Direction) -> Result<(), QueueFull> {
        self.queue_mut(direction).push_back(message).map_err(QueueFull)
    }

    fn pop(&mut self, direction: Direction) -> Result<Message, QueueEmpty> {
        self.queue_mut(direction).pop_front().ok_or(QueueEmpty)
    }

    fn has_pending(&self, direction: Direction) -> bool {
        !self.queue(direction).is_empty()
    }
}
