#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # blockcheck primitives
//!
//! Value types and the reference cipher model shared by the blockcheck
//! conformance harness.
//!
//! ## Modules
//!
//! - **block**: the 128-bit [`Block`] and block splitting helpers
//! - **mode**: [`Mode`], [`KeyLengthClass`] and [`Direction`] with their device selector codes
//! - **session**: [`CipherKey`], [`ChainingParams`] and the validated [`Session`]
//! - **reference**: the [`ReferenceModel`] computing expected output per SP 800-38A
//!
//! ## Example
//!
//! ```rust
//! use blockcheck_primitives::{Block, ChainingParams, CipherKey, Direction, Mode, Session};
//! use blockcheck_primitives::reference::expected_output;
//!
//! let key = CipherKey::from_hex("000102030405060708090a0b0c0d0e0f")?;
//! let block = Block::from_hex("6bc1bee22e409f96e93d7e117393172a")?;
//! let session =
//!     Session::new(Mode::Ecb, key, Direction::Encrypt, ChainingParams::None, vec![block, block])?;
//!
//! let expected = expected_output(&session)?;
//! assert_eq!(expected[0], expected[1]);
//! assert_eq!(expected[0].to_hex(), "47c58d5e21caaf840d015b7d9b910981");
//! # Ok::<(), blockcheck_primitives::PrimitivesError>(())
//! ```

pub mod block;
pub mod error;
pub mod mode;
pub mod reference;
pub mod session;

pub use block::{BLOCK_LEN, Block, join_blocks, split_blocks};
pub use error::{PrimitivesError, Result, decode_hex};
pub use mode::{Direction, KeyLengthClass, Mode, ParamRequirement};
pub use reference::{BlockTransform, ReferenceModel, expected_output};
pub use session::{ChainingParams, CipherKey, CounterBlock, Session};
