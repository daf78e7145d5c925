#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![allow(clippy::arithmetic_side_effects)]

//! Handshake protocol driver.
//!
//! Drives one [`Session`] through the device's `start` / `put` / `get` /
//! `end_of_text` handshake. Every operation is the same transaction:
//!
//! 1. poll `RDY_<op>` once per clock edge until it is high (bounded by
//!    `max_wait_cycles`, otherwise [`DriverError::Timeout`]);
//! 2. drive the data buses and raise `EN_<op>`;
//! 3. for `get`, let the device settle and sample the output bus;
//! 4. advance one edge and lower `EN_<op>`.
//!
//! Per-session phases:
//!
//! ```text
//! Idle -> Started -> Streaming -> Flushing -> Draining -> Done
//! ```
//!
//! [`HandshakeDriver::run_session`] interleaves operations: whenever output is
//! ready it is drained first, so a core with bounded buffering never stalls
//! waiting for the driver to take results while the driver waits to put.

use crate::device::{ClockedDevice, Port, StartFields};
use blockcheck_primitives::{Block, Session};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// Handshake failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// An operation was attempted out of phase or without its readiness.
    /// Always a driver defect; never retried.
    #[error("Protocol violation on {operation}: {reason}")]
    ProtocolViolation {
        /// Operation that was attempted.
        operation: Port,
        /// What was wrong.
        reason: String,
    },

    /// A readiness signal did not assert within the configured bound.
    #[error("Timeout waiting for RDY_{operation} after {waited_cycles} cycles")]
    Timeout {
        /// Operation being waited on.
        operation: Port,
        /// Cycles spent polling.
        waited_cycles: u64,
    },
}

/// Where a session is in its handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing issued yet.
    Idle,
    /// `start` accepted; only the first block is in the device.
    Started,
    /// At least one `put` accepted.
    Streaming,
    /// `end_of_text` accepted, no output drained since.
    Flushing,
    /// Draining the remaining outputs after `end_of_text`.
    Draining,
    /// Every output retrieved and `end_of_text` issued.
    Done,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Started => "started",
            SessionPhase::Streaming => "streaming",
            SessionPhase::Flushing => "flushing",
            SessionPhase::Draining => "draining",
            SessionPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Single-session driver bound to an exclusively borrowed device.
pub struct HandshakeDriver<'d, D: ClockedDevice> {
    device: &'d mut D,
    max_wait_cycles: u64,
    phase: SessionPhase,
    total: usize,
    submitted: usize,
    retrieved: usize,
    end_of_text_sent: bool,
}

impl<'d, D: ClockedDevice> HandshakeDriver<'d, D> {
    #[must_use]
    pub fn new(device: &'d mut D, max_wait_cycles: u64) -> Self {
        Self {
            device,
            max_wait_cycles,
            phase: SessionPhase::Idle,
            total: 0,
            submitted: 0,
            retrieved: 0,
            end_of_text_sent: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Blocks accepted by the device so far (including the `start` block).
    #[must_use]
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Output blocks retrieved so far.
    #[must_use]
    pub fn retrieved(&self) -> usize {
        self.retrieved
    }

    /// Drive a whole session and return its output blocks in input order.
    ///
    /// # Errors
    ///
    /// `Timeout` if the device stops making progress for `max_wait_cycles`
    /// edges; `ProtocolViolation` if the driver itself misbehaves.
    pub fn run_session(&mut self, session: Session) -> Result<Vec<Block>, DriverError> {
        let fields = StartFields::from_session(&session);
        debug!(
            mode = %session.mode(),
            key = %session.key_class(),
            direction = %session.direction(),
            blocks = session.len(),
            "session begin"
        );
        self.start(&fields, session.len())?;

        let blocks = session.blocks();
        let mut outputs = Vec::with_capacity(blocks.len());
        let mut idle_cycles = 0u64;

        while outputs.len() < self.total || !self.end_of_text_sent {
            if outputs.len() < self.total && self.is_ready(Port::Get) {
                outputs.push(self.pulse_get()?);
            } else if let Some(&next) = blocks.get(self.submitted) {
                if self.is_ready(Port::Put) {
                    self.pulse_put(next)?;
                } else {
                    self.idle_edge(&mut idle_cycles)?;
                    continue;
                }
            } else if !self.end_of_text_sent && self.is_ready(Port::EndOfText) {
                self.pulse_end_of_text()?;
            } else {
                self.idle_edge(&mut idle_cycles)?;
                continue;
            }
            idle_cycles = 0;
        }

        debug!(blocks = outputs.len(), cycle = self.device.cycle(), "session done");
        Ok(outputs)
    }

    /// Issue `start` with the session parameters and first block.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` unless this is the first operation of the session,
    /// `Timeout` if `RDY_start` never rises.
    pub fn start(&mut self, fields: &StartFields, total_blocks: usize) -> Result<(), DriverError> {
        if self.phase != SessionPhase::Idle {
            return Err(self.violation(Port::Start, "start is only legal as the first operation"));
        }
        if total_blocks == 0 {
            return Err(self.violation(Port::Start, "a session needs at least one block"));
        }
        self.wait_ready(Port::Start)?;
        self.fire(Port::Start, |device| device.drive_start(fields))?;
        self.total = total_blocks;
        self.submitted = 1;
        self.advance_phase(Port::Start);
        Ok(())
    }

    /// Issue `put` with the next input block.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if called before `start`, after `end_of_text` or
    /// after every block was submitted; `Timeout` if the device never accepts.
    pub fn put(&mut self, block: Block) -> Result<(), DriverError> {
        self.check_put()?;
        self.wait_ready(Port::Put)?;
        self.pulse_put(block)
    }

    /// Retrieve the next output block.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if every output was already retrieved; `Timeout`
    /// if `RDY_get` never rises.
    pub fn get(&mut self) -> Result<Block, DriverError> {
        self.check_get()?;
        self.wait_ready(Port::Get)?;
        self.pulse_get()
    }

    /// Signal that no further input follows.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if issued twice or before every block was
    /// submitted; `Timeout` if `RDY_end_of_text` never rises.
    pub fn end_of_text(&mut self) -> Result<(), DriverError> {
        self.check_end_of_text()?;
        self.wait_ready(Port::EndOfText)?;
        self.pulse_end_of_text()
    }

    fn pulse_put(&mut self, block: Block) -> Result<(), DriverError> {
        self.check_put()?;
        self.fire(Port::Put, |device| device.drive_put(block))?;
        self.submitted += 1;
        self.advance_phase(Port::Put);
        Ok(())
    }

    fn pulse_get(&mut self) -> Result<Block, DriverError> {
        self.check_get()?;
        let block = self.fire(Port::Get, |_| {})?;
        self.retrieved += 1;
        self.advance_phase(Port::Get);
        trace!(index = self.retrieved - 1, block = %block, "retrieved block");
        Ok(block)
    }

    fn pulse_end_of_text(&mut self) -> Result<(), DriverError> {
        self.check_end_of_text()?;
        self.fire(Port::EndOfText, |_| {})?;
        self.end_of_text_sent = true;
        self.advance_phase(Port::EndOfText);
        Ok(())
    }

    fn check_put(&self) -> Result<(), DriverError> {
        match self.phase {
            SessionPhase::Started | SessionPhase::Streaming if self.submitted < self.total => {
                Ok(())
            }
            SessionPhase::Started | SessionPhase::Streaming => {
                Err(self.violation(Port::Put, "every input block was already submitted"))
            }
            _ => Err(self.violation(Port::Put, "put outside the streaming phase")),
        }
    }

    fn check_get(&self) -> Result<(), DriverError> {
        if self.phase == SessionPhase::Idle {
            return Err(self.violation(Port::Get, "get before start"));
        }
        if self.retrieved >= self.total {
            return Err(self.violation(Port::Get, "every output block was already retrieved"));
        }
        Ok(())
    }

    fn check_end_of_text(&self) -> Result<(), DriverError> {
        if self.phase == SessionPhase::Idle {
            return Err(self.violation(Port::EndOfText, "end_of_text before start"));
        }
        if self.end_of_text_sent {
            return Err(self.violation(Port::EndOfText, "end_of_text already issued"));
        }
        if self.submitted < self.total {
            return Err(self.violation(Port::EndOfText, "input blocks still pending"));
        }
        Ok(())
    }

    /// `RDY_put` alone is not enough: `can_take_input` must also be high.
    fn is_ready(&self, port: Port) -> bool {
        match port {
            Port::Put => self.device.ready(Port::Put) && self.device.can_take_input(),
            other => self.device.ready(other),
        }
    }

    fn wait_ready(&mut self, port: Port) -> Result<(), DriverError> {
        let mut waited = 0u64;
        while !self.is_ready(port) {
            if waited >= self.max_wait_cycles {
                return Err(DriverError::Timeout { operation: port, waited_cycles: waited });
            }
            self.device.rising_edge();
            waited += 1;
            trace!(port = %port, waited, "polling");
        }
        Ok(())
    }

    /// One edge with nothing to issue. Fails once the device has been silent
    /// for `max_wait_cycles` consecutive edges.
    fn idle_edge(&mut self, idle_cycles: &mut u64) -> Result<(), DriverError> {
        if *idle_cycles >= self.max_wait_cycles {
            return Err(DriverError::Timeout {
                operation: self.awaited_port(),
                waited_cycles: *idle_cycles,
            });
        }
        self.device.rising_edge();
        *idle_cycles += 1;
        Ok(())
    }

    /// The outstanding operation a stalled session is blocked on. A put held
    /// back only by a full output side is blamed on `get`.
    fn awaited_port(&self) -> Port {
        if self.submitted < self.total {
            if self.device.ready(Port::Put) && !self.device.can_take_input() {
                Port::Get
            } else {
                Port::Put
            }
        } else if !self.end_of_text_sent {
            Port::EndOfText
        } else {
            Port::Get
        }
    }

    /// Single-cycle enable pulse. Readiness is re-checked immediately before
    /// the enable goes high; the output bus is sampled after `settle` and
    /// before the edge.
    fn fire<F>(&mut self, port: Port, drive: F) -> Result<Block, DriverError>
    where
        F: FnOnce(&mut D),
    {
        if !self.is_ready(port) {
            return Err(self.violation(port, "enable requested while not ready"));
        }
        drive(&mut *self.device);
        self.device.set_enable(port, true);
        self.device.settle();
        let sampled = self.device.output();
        self.device.rising_edge();
        self.device.set_enable(port, false);
        debug!(op = %port, cycle = self.device.cycle(), "handshake");
        Ok(sampled)
    }

    fn advance_phase(&mut self, op: Port) {
        let next = if self.end_of_text_sent && self.retrieved >= self.total {
            SessionPhase::Done
        } else if self.end_of_text_sent {
            match op {
                Port::EndOfText => SessionPhase::Flushing,
                _ => SessionPhase::Draining,
            }
        } else if self.submitted > 1 {
            SessionPhase::Streaming
        } else {
            SessionPhase::Started
        };
        if next != self.phase {
            trace!(from = %self.phase, to = %next, "phase");
            self.phase = next;
        }
    }

    fn violation(&self, operation: Port, reason: &str) -> DriverError {
        DriverError::ProtocolViolation { operation, reason: reason.to_string() }
    }
}
