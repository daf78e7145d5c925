#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![allow(clippy::arithmetic_side_effects)]

//! Behavioral model of a pipelined AES core.
//!
//! Implements [`ClockedDevice`] with the same observable behavior as the
//! hardware block: a bounded input FIFO feeding a single cipher engine with a
//! fixed multi-cycle latency, a bounded output FIFO, and an optional one-block
//! hold-back that only releases the final block once `end_of_text` arrives.
//! The chaining register (IV, feedback or counter) lives inside the core, so
//! blocks must be submitted in order.
//!
//! Faults can be injected to exercise the harness's failure paths.

use super::{ClockedDevice, Port, StartFields};
use blockcheck_primitives::session::KEY_FIELD_LEN;
use blockcheck_primitives::{Block, BlockTransform, CipherKey, Direction, KeyLengthClass, Mode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Timing parameters the model cannot operate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoreModelError {
    #[error("latency_cycles must be at least 1")]
    ZeroLatency,

    #[error("fifo_depth must be at least 1")]
    ZeroFifoDepth,

    /// A held block would occupy the only input slot and `RDY_put` never rises.
    #[error("hold_last_block needs fifo_depth >= 2, got {fifo_depth}")]
    HoldNeedsDepth { fifo_depth: usize },
}

/// Timing and buffering parameters of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreTiming {
    /// Cycles the engine spends on one block (at least 1).
    pub latency_cycles: u32,
    /// Capacity of each of the input and output FIFOs.
    pub fifo_depth: usize,
    /// Keep the most recent block queued until another block or
    /// `end_of_text` arrives.
    pub hold_last_block: bool,
}

impl Default for CoreTiming {
    fn default() -> Self {
        Self { latency_cycles: 11, fifo_depth: 2, hold_last_block: true }
    }
}

impl CoreTiming {
    #[must_use]
    pub fn with_latency(mut self, cycles: u32) -> Self {
        self.latency_cycles = cycles;
        self
    }

    #[must_use]
    pub fn with_fifo_depth(mut self, depth: usize) -> Self {
        self.fifo_depth = depth;
        self
    }

    #[must_use]
    pub fn with_hold_last_block(mut self, hold: bool) -> Self {
        self.hold_last_block = hold;
        self
    }

    /// Reject configurations the core cannot operate in.
    ///
    /// # Errors
    ///
    /// Returns the first [`CoreModelError`] found.
    pub fn validate(&self) -> Result<(), CoreModelError> {
        if self.latency_cycles == 0 {
            return Err(CoreModelError::ZeroLatency);
        }
        if self.fifo_depth == 0 {
            return Err(CoreModelError::ZeroFifoDepth);
        }
        if self.hold_last_block && self.fifo_depth < 2 {
            return Err(CoreModelError::HoldNeedsDepth { fifo_depth: self.fifo_depth });
        }
        Ok(())
    }
}

/// Injected misbehavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fault {
    /// XOR `mask` into the `index`-th output block of every session.
    CorruptOutput { index: usize, mask: Block },
    /// Hold `RDY_<port>` low forever.
    StuckNotReady(Port),
    /// Hold `can_take_input` low for `edges` edges after each accepted
    /// `start`, while `RDY_put` keeps following the input FIFO.
    InputBackpressure { edges: u64 },
}

#[derive(Clone)]
struct CoreSession {
    transform: BlockTransform,
    mode: Mode,
    direction: Direction,
    register: Block,
    end_of_text: bool,
    completed: usize,
}

impl CoreSession {
    /// One engine pass: transform `input` and advance the chaining register.
    fn process(&mut self, input: Block) -> Block {
        let t = &self.transform;
        let decrypt = self.direction.is_decrypt();
        match self.mode {
            Mode::Ecb => {
                if decrypt {
                    t.decrypt(input)
                } else {
                    t.encrypt(input)
                }
            }
            Mode::Cbc => {
                if decrypt {
                    let out = t.decrypt(input) ^ self.register;
                    self.register = input;
                    out
                } else {
                    self.register = t.encrypt(input ^ self.register);
                    self.register
                }
            }
            Mode::Cfb => {
                let out = input ^ t.encrypt(self.register);
                self.register = if decrypt { input } else { out };
                out
            }
            Mode::Ofb => {
                self.register = t.encrypt(self.register);
                input ^ self.register
            }
            Mode::Ctr => {
                let out = input ^ t.encrypt(self.register);
                self.register = increment_low64(self.register);
                out
            }
        }
    }
}

/// Increment the low 64 bits of a counter block, leaving the nonce half alone.
fn increment_low64(block: Block) -> Block {
    let value = block.to_u128();
    let high = value & !u128::from(u64::MAX);
    #[allow(clippy::cast_possible_truncation)]
    let low = (value as u64).wrapping_add(1);
    Block::from_u128(high | u128::from(low))
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    input: Block,
    remaining: u32,
}

/// Cycle-level model of the core.
pub struct PipelinedCore {
    timing: CoreTiming,
    faults: Vec<Fault>,
    in_reset: bool,
    enables: [bool; 4],
    start_bus: Option<StartFields>,
    put_bus: Block,
    session: Option<CoreSession>,
    session_started_at: u64,
    input_fifo: VecDeque<Block>,
    engine: Option<InFlight>,
    output_fifo: VecDeque<Block>,
    get_bus: Block,
    cycle: u64,
    sessions_completed: u64,
    violations: u64,
}

impl PipelinedCore {
    /// # Errors
    ///
    /// Returns the error from [`CoreTiming::validate`].
    pub fn new(timing: CoreTiming) -> Result<Self, CoreModelError> {
        timing.validate()?;
        Ok(Self {
            timing,
            faults: Vec::new(),
            in_reset: false,
            enables: [false; 4],
            start_bus: None,
            put_bus: Block::ZERO,
            session: None,
            session_started_at: 0,
            input_fifo: VecDeque::new(),
            engine: None,
            output_fifo: VecDeque::new(),
            get_bus: Block::ZERO,
            cycle: 0,
            sessions_completed: 0,
            violations: 0,
        })
    }

    #[must_use]
    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    #[must_use]
    pub fn timing(&self) -> CoreTiming {
        self.timing
    }

    /// Edges on which an enable was asserted while its ready was low.
    /// A correct driver keeps this at zero.
    #[must_use]
    pub fn protocol_violations(&self) -> u64 {
        self.violations
    }

    #[must_use]
    pub fn sessions_completed(&self) -> u64 {
        self.sessions_completed
    }

    fn stuck(&self, port: Port) -> bool {
        self.faults.iter().any(|f| matches!(f, Fault::StuckNotReady(p) if *p == port))
    }

    fn backpressured(&self) -> bool {
        self.faults.iter().any(|f| match f {
            Fault::InputBackpressure { edges } => {
                self.cycle < self.session_started_at.saturating_add(*edges)
            }
            _ => false,
        })
    }

    fn corruption_for(&self, index: usize) -> Option<Block> {
        self.faults.iter().find_map(|f| match f {
            Fault::CorruptOutput { index: i, mask } if *i == index => Some(*mask),
            _ => None,
        })
    }

    fn session_open(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.end_of_text)
    }

    fn begin_session(&mut self, fields: &StartFields) -> bool {
        let decoded = Mode::from_code(fields.mode).and_then(|mode| {
            let class = KeyLengthClass::from_code(fields.key_length)?;
            let key = CipherKey::new(&fields.key[KEY_FIELD_LEN - class.key_len()..])?;
            Ok((mode, BlockTransform::new(&key)?))
        });
        match decoded {
            Ok((mode, transform)) => {
                let direction = Direction::from_flag(fields.decrypt);
                debug!(
                    cycle = self.cycle,
                    mode = %mode,
                    direction = %direction,
                    "core session start"
                );
                self.session = Some(CoreSession {
                    transform,
                    mode,
                    direction,
                    register: fields.iv,
                    end_of_text: false,
                    completed: 0,
                });
                self.session_started_at = self.cycle;
                self.input_fifo.push_back(fields.first_block);
                true
            }
            Err(e) => {
                warn!(error = %e, "core rejected start selectors");
                false
            }
        }
    }

    /// Engine step for this edge: retire a finished block, then issue the next.
    fn step_engine(&mut self) {
        if let Some(mut job) = self.engine.take() {
            job.remaining -= 1;
            if job.remaining > 0 {
                self.engine = Some(job);
            } else if let Some(session) = self.session.as_mut() {
                let out = session.process(job.input);
                let index = session.completed;
                session.completed += 1;
                let out = match self.corruption_for(index) {
                    Some(mask) => out ^ mask,
                    None => out,
                };
                self.output_fifo.push_back(out);
            }
        }

        if self.engine.is_none() && self.output_fifo.len() < self.timing.fifo_depth {
            let eot = self.session.as_ref().is_some_and(|s| s.end_of_text);
            let may_issue = !self.timing.hold_last_block || self.input_fifo.len() > 1 || eot;
            if may_issue {
                if let Some(input) = self.input_fifo.pop_front() {
                    self.engine = Some(InFlight { input, remaining: self.timing.latency_cycles });
                }
            }
        }
    }

    fn clear(&mut self) {
        self.session = None;
        self.input_fifo.clear();
        self.engine = None;
        self.output_fifo.clear();
        self.start_bus = None;
        self.get_bus = Block::ZERO;
    }
}

impl ClockedDevice for PipelinedCore {
    fn set_reset(&mut self, asserted: bool) {
        self.in_reset = asserted;
    }

    fn ready(&self, port: Port) -> bool {
        if self.in_reset || self.stuck(port) {
            return false;
        }
        match port {
            Port::Start => self.session.is_none(),
            Port::Put => self.session_open() && self.input_fifo.len() < self.timing.fifo_depth,
            Port::Get => !self.output_fifo.is_empty(),
            Port::EndOfText => self.session_open(),
        }
    }

    fn can_take_input(&self) -> bool {
        !self.in_reset
            && !self.backpressured()
            && self.session_open()
            && self.output_fifo.len() < self.timing.fifo_depth
    }

    fn set_enable(&mut self, port: Port, asserted: bool) {
        self.enables[port.index()] = asserted;
    }

    fn drive_start(&mut self, fields: &StartFields) {
        self.start_bus = Some(fields.clone());
    }

    fn drive_put(&mut self, block: Block) {
        self.put_bus = block;
    }

    fn settle(&mut self) {
        if let Some(front) = self.output_fifo.front() {
            self.get_bus = *front;
        }
    }

    fn output(&self) -> Block {
        self.get_bus
    }

    fn rising_edge(&mut self) {
        self.cycle += 1;
        if self.in_reset {
            self.clear();
            return;
        }

        // every method fires against the state sampled before this edge
        let mut fire = [false; 4];
        for port in Port::ALL {
            if self.enables[port.index()] {
                if self.ready(port) && (port != Port::Put || self.can_take_input()) {
                    fire[port.index()] = true;
                } else {
                    self.violations += 1;
                    warn!(cycle = self.cycle, port = %port, "enable asserted while not ready");
                }
            }
        }

        if fire[Port::Get.index()] {
            self.output_fifo.pop_front();
        }

        self.step_engine();

        if fire[Port::Start.index()] {
            if let Some(fields) = self.start_bus.take() {
                if !self.begin_session(&fields) {
                    self.violations += 1;
                }
            }
        }
        if fire[Port::Put.index()] {
            self.input_fifo.push_back(self.put_bus);
        }
        if fire[Port::EndOfText.index()] {
            if let Some(session) = self.session.as_mut() {
                session.end_of_text = true;
            }
        }

        let drained = self.input_fifo.is_empty()
            && self.engine.is_none()
            && self.output_fifo.is_empty();
        if drained && self.session.as_ref().is_some_and(|s| s.end_of_text) {
            self.session = None;
            self.sessions_completed += 1;
        }

        trace!(
            cycle = self.cycle,
            input = self.input_fifo.len(),
            busy = self.engine.is_some(),
            output = self.output_fifo.len(),
            "core edge"
        );
    }

    fn cycle(&self) -> u64 {
        self.cycle
    }
}
