#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! 128-bit block value type.
//!
//! A [`Block`] is always exactly 16 bytes. Its integer view is big-endian,
//! which is also how a block is presented on the device's 128-bit buses.

use crate::error::{PrimitivesError, Result, decode_hex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::BitXor;

/// Block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// A single 16-byte cipher block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Block([u8; BLOCK_LEN]);

impl Block {
    /// The all-zero block.
    pub const ZERO: Block = Block([0u8; BLOCK_LEN]);

    /// Wrap 16 bytes.
    #[must_use]
    pub const fn new(bytes: [u8; BLOCK_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a block from a slice that must be exactly 16 bytes long.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBlockLength` for any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; BLOCK_LEN] = bytes
            .try_into()
            .map_err(|_err| PrimitivesError::InvalidBlockLength { actual: bytes.len() })?;
        Ok(Self(array))
    }

    /// Parse a 32-digit hex string.
    ///
    /// # Errors
    ///
    /// Returns `HexError` for malformed hex and `InvalidBlockLength` when the
    /// decoded value is not 16 bytes.
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::from_slice(&decode_hex(s)?)
    }

    /// Big-endian integer view.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    /// Big-endian integer view.
    #[must_use]
    pub const fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Raw bytes, most significant first.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BLOCK_LEN] {
        &self.0
    }

    /// Lowercase hex, 32 digits.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Bytewise XOR.
    #[must_use]
    pub fn xor(&self, other: &Block) -> Block {
        let mut out = self.0;
        for (o, b) in out.iter_mut().zip(other.0.iter()) {
            *o ^= b;
        }
        Block(out)
    }
}

impl BitXor for Block {
    type Output = Block;

    fn bitxor(self, rhs: Block) -> Block {
        self.xor(&rhs)
    }
}

impl From<[u8; BLOCK_LEN]> for Block {
    fn from(bytes: [u8; BLOCK_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Block> for [u8; BLOCK_LEN] {
    fn from(block: Block) -> Self {
        block.0
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.to_hex())
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Block::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Split a byte string into whole blocks.
///
/// # Errors
///
/// Returns `PartialBlock` when the length is not a multiple of 16. No padding
/// is ever applied.
pub fn split_blocks(data: &[u8]) -> Result<Vec<Block>> {
    if data.len() % BLOCK_LEN != 0 {
        return Err(PrimitivesError::PartialBlock { actual: data.len() });
    }
    data.chunks_exact(BLOCK_LEN).map(Block::from_slice).collect()
}

/// Concatenate blocks back into bytes.
#[must_use]
pub fn join_blocks(blocks: &[Block]) -> Vec<u8> {
    blocks.iter().flat_map(|b| b.0).collect()
}
