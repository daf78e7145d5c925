#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Reference cipher model.
//!
//! Computes the expected output block sequence for a session without touching
//! the device. The block transform is the `aes` crate; everything above the
//! single-block transform (chaining, feedback, counters) is implemented here
//! from the mode definitions in NIST SP 800-38A:
//!
//! | Mode | Encrypt | Decrypt |
//! |------|---------|---------|
//! | ECB  | `E(P_i)` | `D(C_i)` |
//! | CBC  | `E(P_i ^ C_{i-1})` | `D(C_i) ^ C_{i-1}` |
//! | CFB  | `P_i ^ E(C_{i-1})` | `C_i ^ E(C_{i-1})` |
//! | OFB  | `P_i ^ O_i`, `O_i = E(O_{i-1})` | same |
//! | CTR  | `P_i ^ E(nonce ‖ ctr+i)` | same |
//!
//! with `C_{-1} = O_{-1} = IV`.

use crate::block::{BLOCK_LEN, Block};
use crate::error::{PrimitivesError, Result};
use crate::mode::{Direction, Mode};
use crate::session::{ChainingParams, CipherKey, CounterBlock, Session};
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use tracing::debug;

/// Single-block AES transform for any of the three key sizes.
#[derive(Clone)]
pub enum BlockTransform {
    /// 128-bit key schedule.
    Aes128(Aes128),
    /// 192-bit key schedule.
    Aes192(Aes192),
    /// 256-bit key schedule.
    Aes256(Aes256),
}

impl BlockTransform {
    /// Expand the key schedule for `key`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedKeyLength` if the key schedule rejects the key.
    pub fn new(key: &CipherKey) -> Result<Self> {
        let bytes = key.as_bytes();
        let invalid = |_err| PrimitivesError::UnsupportedKeyLength { actual: bytes.len() };
        Ok(match bytes.len() {
            16 => BlockTransform::Aes128(Aes128::new_from_slice(bytes).map_err(invalid)?),
            24 => BlockTransform::Aes192(Aes192::new_from_slice(bytes).map_err(invalid)?),
            32 => BlockTransform::Aes256(Aes256::new_from_slice(bytes).map_err(invalid)?),
            actual => return Err(PrimitivesError::UnsupportedKeyLength { actual }),
        })
    }

    /// Forward cipher `E(k, block)`.
    #[must_use]
    pub fn encrypt(&self, block: Block) -> Block {
        let mut bytes: [u8; BLOCK_LEN] = block.into();
        match self {
            BlockTransform::Aes128(c) => c.encrypt_block((&mut bytes).into()),
            BlockTransform::Aes192(c) => c.encrypt_block((&mut bytes).into()),
            BlockTransform::Aes256(c) => c.encrypt_block((&mut bytes).into()),
        }
        Block::new(bytes)
    }

    /// Inverse cipher `D(k, block)`.
    #[must_use]
    pub fn decrypt(&self, block: Block) -> Block {
        let mut bytes: [u8; BLOCK_LEN] = block.into();
        match self {
            BlockTransform::Aes128(c) => c.decrypt_block((&mut bytes).into()),
            BlockTransform::Aes192(c) => c.decrypt_block((&mut bytes).into()),
            BlockTransform::Aes256(c) => c.decrypt_block((&mut bytes).into()),
        }
        Block::new(bytes)
    }
}

/// Mode together with its initial chaining value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chain {
    Ecb,
    Cbc(Block),
    Cfb(Block),
    Ofb(Block),
    Ctr(CounterBlock),
}

impl Chain {
    fn new(mode: Mode, params: &ChainingParams) -> Result<Self> {
        params.check(mode)?;
        Ok(match (mode, *params) {
            (Mode::Ecb, ChainingParams::None) => Chain::Ecb,
            (Mode::Cbc, ChainingParams::Iv(iv)) => Chain::Cbc(iv),
            (Mode::Cfb, ChainingParams::Iv(iv)) => Chain::Cfb(iv),
            (Mode::Ofb, ChainingParams::Iv(iv)) => Chain::Ofb(iv),
            (Mode::Ctr, ChainingParams::Counter(ctr)) => Chain::Ctr(ctr),
            (mode, params) => {
                return Err(PrimitivesError::ParameterMismatch {
                    mode,
                    expected: mode.requirement().describe(),
                    actual: params.kind().describe(),
                });
            }
        })
    }
}

/// Reference model for one (mode, key, direction, params) tuple.
#[derive(Clone)]
pub struct ReferenceModel {
    transform: BlockTransform,
    chain: Chain,
    direction: Direction,
}

impl ReferenceModel {
    /// Model for explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns `ParameterMismatch` when `params` do not fit `mode`.
    pub fn new(
        mode: Mode,
        key: &CipherKey,
        direction: Direction,
        params: &ChainingParams,
    ) -> Result<Self> {
        let chain = Chain::new(mode, params)?;
        Ok(Self { transform: BlockTransform::new(key)?, chain, direction })
    }

    /// Model matching a validated session.
    ///
    /// # Errors
    ///
    /// Never fails for a validly constructed session; the `Result` covers the
    /// key schedule.
    pub fn for_session(session: &Session) -> Result<Self> {
        Self::new(session.mode(), session.key(), session.direction(), session.params())
    }

    /// Run the mode over `input`, starting from the initial chaining value.
    /// Output length always equals input length.
    #[must_use]
    pub fn process(&self, input: &[Block]) -> Vec<Block> {
        let t = &self.transform;
        let decrypt = self.direction.is_decrypt();
        let mut output = Vec::with_capacity(input.len());

        match self.chain {
            Chain::Ecb => {
                output.extend(
                    input.iter().map(|b| if decrypt { t.decrypt(*b) } else { t.encrypt(*b) }),
                );
            }
            Chain::Cbc(iv) => {
                let mut prev = iv;
                for &block in input {
                    if decrypt {
                        output.push(t.decrypt(block) ^ prev);
                        prev = block;
                    } else {
                        let c = t.encrypt(block ^ prev);
                        output.push(c);
                        prev = c;
                    }
                }
            }
            Chain::Cfb(iv) => {
                let mut feedback = iv;
                for &block in input {
                    let out = block ^ t.encrypt(feedback);
                    // feedback is the ciphertext stream in both directions
                    feedback = if decrypt { block } else { out };
                    output.push(out);
                }
            }
            Chain::Ofb(iv) => {
                let mut keystream = iv;
                for &block in input {
                    keystream = t.encrypt(keystream);
                    output.push(block ^ keystream);
                }
            }
            Chain::Ctr(counter) => {
                for (i, &block) in (0u64..).zip(input) {
                    output.push(block ^ t.encrypt(counter.block_at(i)));
                }
            }
        }

        output
    }

    /// First `count` keystream blocks for the stream modes (OFB, CTR).
    /// Returns `None` for modes whose keystream depends on the data.
    #[must_use]
    pub fn keystream(&self, count: usize) -> Option<Vec<Block>> {
        match self.chain {
            Chain::Ofb(iv) => {
                let mut ks = Vec::with_capacity(count);
                let mut state = iv;
                for _ in 0..count {
                    state = self.transform.encrypt(state);
                    ks.push(state);
                }
                Some(ks)
            }
            Chain::Ctr(counter) => Some(
                (0u64..)
                    .take(count)
                    .map(|i| self.transform.encrypt(counter.block_at(i)))
                    .collect(),
            ),
            Chain::Ecb | Chain::Cbc(_) | Chain::Cfb(_) => None,
        }
    }
}

/// Expected output for a session.
///
/// # Errors
///
/// Propagates key schedule failures from [`ReferenceModel::for_session`].
pub fn expected_output(session: &Session) -> Result<Vec<Block>> {
    let model = ReferenceModel::for_session(session)?;
    let output = model.process(session.blocks());
    debug!(
        mode = %session.mode(),
        key = %session.key_class(),
        direction = %session.direction(),
        blocks = output.len(),
        "reference output computed"
    );
    Ok(output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn key(hex: &str) -> CipherKey {
        CipherKey::from_hex(hex).unwrap()
    }

    fn block(hex: &str) -> Block {
        Block::from_hex(hex).unwrap()
    }

    #[test]
    fn test_ecb_single_block() {
        let t = BlockTransform::new(&key("000102030405060708090a0b0c0d0e0f")).unwrap();
        let c = t.encrypt(block("6bc1bee22e409f96e93d7e117393172a"));
        assert_eq!(c, block("47c58d5e21caaf840d015b7d9b910981"));
        assert_eq!(t.decrypt(c), block("6bc1bee22e409f96e93d7e117393172a"));
    }

    #[test]
    fn test_all_zero_key_and_block() {
        let t = BlockTransform::new(&key("00000000000000000000000000000000")).unwrap();
        assert_eq!(t.encrypt(Block::ZERO), block("66e94bd4ef8a2c3b884cfa59ca342b2e"));
    }

    #[test]
    fn test_ecb_identical_blocks_identical_output() {
        let model = ReferenceModel::new(
            Mode::Ecb,
            &key("000102030405060708090a0b0c0d0e0f"),
            Direction::Encrypt,
            &ChainingParams::None,
        )
        .unwrap();
        let p = block("6bc1bee22e409f96e93d7e117393172a");
        let out = model.process(&[p, p]);
        assert_eq!(out, vec![block("47c58d5e21caaf840d015b7d9b910981"); 2]);
    }

    #[test]
    fn test_ctr_keystream_tracks_counter() {
        let counter = CounterBlock::new([0xf0, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7], 2);
        let model = ReferenceModel::new(
            Mode::Ctr,
            &key("000102030405060708090a0b0c0d0e0f"),
            Direction::Encrypt,
            &ChainingParams::Counter(counter),
        )
        .unwrap();
        let ks = model.keystream(2).unwrap();
        assert_eq!(ks[0], block("aa8aafa8f07fd32c79aed99bbb561bcd"));
        assert_eq!(ks[1], block("fbd1c558b1c2bdc31f2c7ebaefa919ae"));
    }

    #[test]
    fn test_keystream_none_for_data_dependent_modes() {
        let model = ReferenceModel::new(
            Mode::Cbc,
            &key("000102030405060708090a0b0c0d0e0f"),
            Direction::Encrypt,
            &ChainingParams::Iv(Block::ZERO),
        )
        .unwrap();
        assert!(model.keystream(1).is_none());
    }

    #[test]
    fn test_mismatched_params_rejected() {
        let result = ReferenceModel::new(
            Mode::Ofb,
            &key("000102030405060708090a0b0c0d0e0f"),
            Direction::Encrypt,
            &ChainingParams::None,
        );
        assert!(matches!(result, Err(PrimitivesError::ParameterMismatch { mode: Mode::Ofb, .. })));
    }
}
