#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Session descriptor: one complete cryptographic run handed to a device.
//!
//! A [`Session`] is validated once, at construction, against the mode's
//! parameter requirements. After that it is immutable; the driver takes it by
//! value and consumes it.

use crate::block::{BLOCK_LEN, Block, split_blocks};
use crate::error::{PrimitivesError, Result, decode_hex};
use crate::mode::{Direction, KeyLengthClass, Mode, ParamRequirement};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Width of the device's `start_key` bus in bytes.
pub const KEY_FIELD_LEN: usize = 32;

/// Nonce length for CTR sessions.
pub const NONCE_LEN: usize = 8;

/// AES key with its derived length class. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    class: KeyLengthClass,
}

impl CipherKey {
    /// # Errors
    ///
    /// Returns `UnsupportedKeyLength` unless the key is 16, 24 or 32 bytes.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let class = KeyLengthClass::from_key_len(bytes.len())?;
        Ok(Self { bytes: bytes.to_vec(), class })
    }

    /// # Errors
    ///
    /// Returns `HexError` or `UnsupportedKeyLength`.
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::new(&decode_hex(s)?)
    }

    /// Length class derived from the key size.
    #[must_use]
    pub fn class(&self) -> KeyLengthClass {
        self.class
    }

    /// Key bytes as supplied.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key as driven on the 256-bit `start_key` bus: big-endian, right-aligned,
    /// zero-extended on the left for 128- and 192-bit keys.
    #[must_use]
    pub fn device_field(&self) -> [u8; KEY_FIELD_LEN] {
        let mut field = [0u8; KEY_FIELD_LEN];
        let offset = KEY_FIELD_LEN - self.bytes.len();
        field[offset..].copy_from_slice(&self.bytes);
        field
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherKey({}, [{} bytes])", self.class, self.bytes.len())
    }
}

impl PartialEq for CipherKey {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.bytes == other.bytes
    }
}

impl Eq for CipherKey {}

/// CTR initial counter block: 8-byte nonce followed by a big-endian 64-bit counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterBlock {
    nonce: [u8; NONCE_LEN],
    initial: u64,
}

impl CounterBlock {
    /// Nonce plus the counter value of the first data block.
    #[must_use]
    pub const fn new(nonce: [u8; NONCE_LEN], initial: u64) -> Self {
        Self { nonce, initial }
    }

    /// Split a full 16-byte counter block (as published in KAT files).
    #[must_use]
    pub fn from_block(block: Block) -> Self {
        let bytes = block.as_bytes();
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&bytes[..NONCE_LEN]);
        let mut counter = [0u8; 8];
        counter.copy_from_slice(&bytes[NONCE_LEN..]);
        Self { nonce, initial: u64::from_be_bytes(counter) }
    }

    /// The fixed upper half.
    #[must_use]
    pub const fn nonce(&self) -> [u8; NONCE_LEN] {
        self.nonce
    }

    /// Counter value of the first data block.
    #[must_use]
    pub const fn initial(&self) -> u64 {
        self.initial
    }

    /// Counter block for the `index`-th data block; the counter wraps mod 2^64
    /// and never carries into the nonce.
    #[must_use]
    pub fn block_at(&self, index: u64) -> Block {
        let mut bytes = [0u8; BLOCK_LEN];
        bytes[..NONCE_LEN].copy_from_slice(&self.nonce);
        bytes[NONCE_LEN..].copy_from_slice(&self.initial.wrapping_add(index).to_be_bytes());
        Block::new(bytes)
    }

    /// The initial counter block.
    #[must_use]
    pub fn to_block(&self) -> Block {
        self.block_at(0)
    }
}

/// IV / nonce / counter parameters of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainingParams {
    /// ECB carries nothing.
    None,
    /// CBC, CFB and OFB.
    Iv(Block),
    /// CTR.
    Counter(CounterBlock),
}

impl ChainingParams {
    /// Which requirement these parameters satisfy.
    #[must_use]
    pub const fn kind(&self) -> ParamRequirement {
        match self {
            ChainingParams::None => ParamRequirement::KeyOnly,
            ChainingParams::Iv(_) => ParamRequirement::Iv,
            ChainingParams::Counter(_) => ParamRequirement::NonceCounter,
        }
    }

    /// Value for the device's 128-bit IV bus. ECB drives zero.
    #[must_use]
    pub fn device_block(&self) -> Block {
        match self {
            ChainingParams::None => Block::ZERO,
            ChainingParams::Iv(iv) => *iv,
            ChainingParams::Counter(counter) => counter.to_block(),
        }
    }

    /// Check these parameters against what `mode` requires.
    ///
    /// # Errors
    ///
    /// Returns `ParameterMismatch` when the kinds differ.
    pub fn check(&self, mode: Mode) -> Result<()> {
        let expected = mode.requirement();
        if self.kind() == expected {
            Ok(())
        } else {
            Err(PrimitivesError::ParameterMismatch {
                mode,
                expected: expected.describe(),
                actual: self.kind().describe(),
            })
        }
    }
}

/// One cryptographic operation instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    mode: Mode,
    key: CipherKey,
    direction: Direction,
    params: ChainingParams,
    blocks: Vec<Block>,
}

impl Session {
    /// Build a validated session.
    ///
    /// # Errors
    ///
    /// Returns `ParameterMismatch` if `params` do not fit `mode`, and
    /// `EmptySession` if there are no blocks.
    pub fn new(
        mode: Mode,
        key: CipherKey,
        direction: Direction,
        params: ChainingParams,
        blocks: Vec<Block>,
    ) -> Result<Self> {
        params.check(mode)?;
        if blocks.is_empty() {
            return Err(PrimitivesError::EmptySession);
        }
        Ok(Self { mode, key, direction, params, blocks })
    }

    /// Like [`Session::new`] but splits a byte string into blocks.
    ///
    /// # Errors
    ///
    /// Additionally returns `PartialBlock` if `data` is not block-aligned.
    pub fn from_bytes(
        mode: Mode,
        key: CipherKey,
        direction: Direction,
        params: ChainingParams,
        data: &[u8],
    ) -> Result<Self> {
        Self::new(mode, key, direction, params, split_blocks(data)?)
    }

    /// Cipher mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Session key.
    #[must_use]
    pub fn key(&self) -> &CipherKey {
        &self.key
    }

    /// Length class of the session key.
    #[must_use]
    pub fn key_class(&self) -> KeyLengthClass {
        self.key.class()
    }

    /// Encrypt or decrypt.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// IV or counter parameters.
    #[must_use]
    pub fn params(&self) -> &ChainingParams {
        &self.params
    }

    /// Input blocks in submission order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of input blocks; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
