#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Device signal contract.
//!
//! The core under test is a clock-synchronous block with one ready output and
//! one enable input per operation (`start`, `put`, `get`, `end_of_text`),
//! plus the data buses carried by `start`, `put` and `get`. [`ClockedDevice`]
//! is that contract as seen from the driver; a simulator binding or the
//! behavioral [`sim::PipelinedCore`] implements it.
//!
//! Timing model of one cycle, as seen by the driver:
//!
//! 1. after [`ClockedDevice::rising_edge`] returns, ready outputs reflect the
//!    registered state for the new cycle;
//! 2. the driver drives data buses and enables;
//! 3. [`ClockedDevice::settle`] propagates combinational logic, after which
//!    [`ClockedDevice::output`] is stable for this cycle;
//! 4. the next `rising_edge` commits every enabled operation.

pub mod sim;

use blockcheck_primitives::{Block, Session};
use blockcheck_primitives::session::KEY_FIELD_LEN;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four handshake operations, one ready/enable pair each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Port {
    Start,
    Put,
    Get,
    EndOfText,
}

impl Port {
    pub const ALL: [Port; 4] = [Port::Start, Port::Put, Port::Get, Port::EndOfText];

    /// Signal-name suffix (`RDY_<name>`, `EN_<name>`).
    #[must_use]
    pub const fn signal_name(self) -> &'static str {
        match self {
            Port::Start => "start",
            Port::Put => "put",
            Port::Get => "get",
            Port::EndOfText => "end_of_text",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Port::Start => 0,
            Port::Put => 1,
            Port::Get => 2,
            Port::EndOfText => 3,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signal_name())
    }
}

/// Values driven on the `start` method's input buses.
#[derive(Clone, PartialEq, Eq)]
pub struct StartFields {
    /// `start_key`: 256 bits, key right-aligned.
    pub key: [u8; KEY_FIELD_LEN],
    /// `start_intext`: first input block.
    pub first_block: Block,
    /// `start_iv`: IV, or nonce || counter for CTR.
    pub iv: Block,
    /// `start_mode`: 3-bit selector.
    pub mode: u8,
    /// `start_keylenn`: 2-bit selector.
    pub key_length: u8,
    /// `start_decrypt`
    pub decrypt: bool,
}

impl StartFields {
    /// Encode a session's parameters and first block for the `start` buses.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            key: session.key().device_field(),
            first_block: session.blocks().first().copied().unwrap_or(Block::ZERO),
            iv: session.params().device_block(),
            mode: session.mode().code(),
            key_length: session.key_class().code(),
            decrypt: session.direction().is_decrypt(),
        }
    }
}

impl fmt::Debug for StartFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartFields")
            .field("key", &"[redacted]")
            .field("first_block", &self.first_block)
            .field("iv", &self.iv)
            .field("mode", &self.mode)
            .field("key_length", &self.key_length)
            .field("decrypt", &self.decrypt)
            .finish()
    }
}

/// Signal-level view of the core under test.
pub trait ClockedDevice {
    /// Drive the active-low reset. `true` holds the core in reset (`RST_N = 0`).
    fn set_reset(&mut self, asserted: bool);

    /// `RDY_<port>` for the current cycle.
    fn ready(&self, port: Port) -> bool;

    /// Secondary input-acceptance status that additionally gates `put`.
    fn can_take_input(&self) -> bool;

    /// Drive `EN_<port>`.
    fn set_enable(&mut self, port: Port, asserted: bool);

    /// Drive the `start` data buses.
    fn drive_start(&mut self, fields: &StartFields);

    /// Drive `put_nxt_blk`.
    fn drive_put(&mut self, block: Block);

    /// Let combinational outputs settle for the current cycle (read-only phase).
    fn settle(&mut self);

    /// Value on the `get` bus. Only meaningful after [`settle`](Self::settle)
    /// in a cycle where `RDY_get` is high.
    fn output(&self) -> Block;

    /// Advance one clock edge, committing every enabled operation.
    fn rising_edge(&mut self);

    /// Edges seen since construction.
    fn cycle(&self) -> u64;
}
