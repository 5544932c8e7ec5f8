//! Budgeted buffer resolver
//!
//! Runs from the main loop and moves bytes between the ring buffers and the
//! message queues: decoding inbound bytes into messages, and encoding queued
//! outbound messages into bytes for the transmit interrupt. Each pass does at
//! most `budget` single-byte steps so the caller's loop keeps its timing.
//!
//! # Turn selection
//!
//! Inbound has work when its ring is non-empty. Outbound has work when
//! transmission is enabled, its ring has a free slot, and a message is in
//! flight or queued. Each iteration:
//!
//! 1. inbound idle → outbound
//! 2. outbound idle → inbound
//! 3. both busy → the direction not served last time
//!
//! The pass ends when neither direction has work or the budget is spent.

use serlink_hal::SerialPort;
use serlink_protocol::{Decoder, Encoder, Message};

use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::link::Link;
use crate::queue::{Direction, MessageQueue, QueueEmpty, QueueFull};

/// What a resolver pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolveReport {
    /// Loop iterations (budget consumed)
    pub iterations: usize,
    /// Bytes taken from the inbound ring
    pub bytes_decoded: usize,
    /// Bytes placed in the outbound ring
    pub bytes_encoded: usize,
    /// Messages decoded and accepted by the inbound queue
    pub messages_received: usize,
    /// Messages fully encoded
    pub messages_sent: usize,
    /// Error messages queued for the host
    pub errors_reported: usize,
}

/// Outcome of a single inbound step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeStep {
    /// The byte was consumed into the in-flight message
    Partial,
    /// The byte completed a message that was queued
    Delivered,
    /// The byte completed a message the inbound queue refused
    Dropped,
}

/// Outcome of a single outbound step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeStep {
    /// No message in flight and none queued; nothing was produced
    Idle,
    /// One byte was buffered
    Buffered,
    /// One byte was buffered and it finished the message
    Completed,
}

/// Cooperative scheduler owning both codec cursors
#[derive(Debug)]
pub struct Resolver {
    decoder: Decoder,
    encoder: Encoder,
    turn: Direction,
    transmit_enabled: bool,
    inbound_timeout_ms: u16,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&LinkConfig::default())
    }
}

impl Resolver {
    /// Create a resolver with idle cursors
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            decoder: Decoder::new(),
            encoder: Encoder::new(config.derive_size_from_subtype),
            turn: Direction::Inbound,
            transmit_enabled: config.transmit_enabled,
            inbound_timeout_ms: config.inbound_timeout_ms,
        }
    }

    /// Open or close the outbound direction
    pub fn set_transmit_enabled(&mut self, enabled: bool) {
        self.transmit_enabled = enabled;
    }

    /// Whether outbound turns may be scheduled
    pub fn is_transmit_enabled(&self) -> bool {
        self.transmit_enabled
    }

    /// Direction served by the most recent iteration
    pub fn turn(&self) -> Direction {
        self.turn
    }

    /// Whether an inbound message is partially decoded
    pub fn inbound_in_progress(&self) -> bool {
        self.decoder.in_progress()
    }

    /// Whether an outbound message is in flight or waiting
    pub fn has_outbound_work<Q: MessageQueue>(&self, queues: &Q) -> bool {
        !self.encoder.is_idle() || queues.has_pending(Direction::Outbound)
    }

    /// Run up to `budget` single-byte steps
    pub fn resolve<P, Q, const RX: usize, const TX: usize>(
        &mut self,
        link: &Link<RX, TX>,
        port: &P,
        queues: &mut Q,
        budget: usize,
    ) -> ResolveReport
    where
        P: SerialPort,
        Q: MessageQueue,
    {
        let mut report = ResolveReport::default();
        let mut remaining = budget;

        while remaining > 0 {
            let inbound_ready = !link.inbound().is_empty();
            let outbound_ready = self.transmit_enabled
                && !link.outbound().is_full()
                && self.has_outbound_work(queues);

            self.turn = match (inbound_ready, outbound_ready) {
                (false, false) => break,
                (false, true) => Direction::Outbound,
                (true, false) => Direction::Inbound,
                (true, true) => self.turn.other(),
            };

            match self.turn {
                Direction::Inbound => {
                    if let Ok(step) = self.step_inbound(link, queues) {
                        report.bytes_decoded += 1;
                        if step == DecodeStep::Delivered {
                            report.messages_received += 1;
                        }
                    }
                }
                Direction::Outbound => match self.step_outbound(link, port, queues) {
                    Ok(EncodeStep::Idle) | Err(_) => {}
                    Ok(EncodeStep::Buffered) => report.bytes_encoded += 1,
                    Ok(EncodeStep::Completed) => {
                        report.bytes_encoded += 1;
                        report.messages_sent += 1;
                    }
                },
            }

            if self.report_error(link, queues) {
                report.errors_reported += 1;
            }

            report.iterations += 1;
            remaining -= 1;
        }

        report
    }

    /// Decode one byte from the inbound ring
    ///
    /// A completed message goes to the inbound queue; if the queue refuses
    /// it, the message is dropped and `MessageRejected` is latched.
    pub fn step_inbound<Q, const RX: usize, const TX: usize>(
        &mut self,
        link: &Link<RX, TX>,
        queues: &mut Q,
    ) -> Result<DecodeStep, LinkError>
    where
        Q: MessageQueue,
    {
        let byte = link.inbound().pop()?;
        let Some(message) = self.decoder.feed(byte) else {
            return Ok(DecodeStep::Partial);
        };

        match queues.push(message, Direction::Inbound) {
            Ok(()) => Ok(DecodeStep::Delivered),
            Err(QueueFull(_dropped)) => {
                link.raise(LinkError::MessageRejected);
                Ok(DecodeStep::Dropped)
            }
        }
    }

    /// Encode one byte into the outbound ring
    ///
    /// Loads the next queued message when idle. Returns `BufferFull` without
    /// consuming anything if the outbound ring has no free slot.
    pub fn step_outbound<P, Q, const RX: usize, const TX: usize>(
        &mut self,
        link: &Link<RX, TX>,
        port: &P,
        queues: &mut Q,
    ) -> Result<EncodeStep, LinkError>
    where
        P: SerialPort,
        Q: MessageQueue,
    {
        if link.outbound().is_full() {
            return Err(LinkError::BufferFull);
        }

        if self.encoder.is_idle() {
            match queues.pop(Direction::Outbound) {
                Ok(message) => {
                    // Idle encoder always accepts
                    let _ = self.encoder.load(message);
                }
                Err(QueueEmpty) => return Ok(EncodeStep::Idle),
            }
        }

        let Some(byte) = self.encoder.peek() else {
            return Ok(EncodeStep::Idle);
        };
        link.outbound().push(byte)?;
        link.kick_transmitter(port);

        if self.encoder.advance() {
            Ok(EncodeStep::Completed)
        } else {
            Ok(EncodeStep::Buffered)
        }
    }

    /// Drop buffered inbound bytes and the partially decoded message
    pub fn wipe_inbound<const RX: usize, const TX: usize>(&mut self, link: &Link<RX, TX>) {
        link.inbound().clear();
        self.decoder.reset();
    }

    /// Drop buffered outbound bytes and the partially encoded message
    pub fn wipe_outbound<const RX: usize, const TX: usize>(&mut self, link: &Link<RX, TX>) {
        link.outbound().clear();
        self.encoder.reset();
    }

    /// Abandon a partial inbound message after `idle_ms` of inbound silence
    ///
    /// Does nothing when the configured timeout is 0, when no message is in
    /// progress, or before the timeout has elapsed. Returns whether the
    /// inbound side was wiped.
    pub fn expire_inbound<const RX: usize, const TX: usize>(
        &mut self,
        link: &Link<RX, TX>,
        idle_ms: u64,
    ) -> bool {
        if self.inbound_timeout_ms == 0
            || !self.decoder.in_progress()
            || idle_ms < u64::from(self.inbound_timeout_ms)
        {
            return false;
        }
        self.wipe_inbound(link);
        true
    }

    /// Forward a latched error to the host as a zero-payload message
    fn report_error<Q, const RX: usize, const TX: usize>(
        &self,
        link: &Link<RX, TX>,
        queues: &mut Q,
    ) -> bool
    where
        Q: MessageQueue,
    {
        let Some(code) = link.error().take() else {
            return false;
        };
        // Best effort: a full outbound queue loses the report
        queues
            .push(Message::error(code), Direction::Outbound)
            .is_ok()
    }
}
