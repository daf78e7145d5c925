#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Cipher mode, key-length class and direction enumerations.
//!
//! Each enum carries the selector code the device expects on its `start`
//! bus, so the code table lives in exactly one place.

use crate::error::{PrimitivesError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which chaining parameters a mode needs besides the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamRequirement {
    /// Key only.
    KeyOnly,
    /// Key plus a 16-byte IV.
    Iv,
    /// Key plus nonce and initial counter.
    NonceCounter,
}

impl ParamRequirement {
    /// Human-readable name used in mismatch errors.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            ParamRequirement::KeyOnly => "no IV or nonce",
            ParamRequirement::Iv => "a 16-byte IV",
            ParamRequirement::NonceCounter => "a nonce and initial counter",
        }
    }
}

/// The five supported confidentiality modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    /// Electronic codebook
    Ecb,
    /// Cipher block chaining
    Cbc,
    /// Cipher feedback, 128-bit segments
    Cfb,
    /// Output feedback
    Ofb,
    /// Counter
    Ctr,
}

impl Mode {
    /// All modes in device-code order.
    pub const ALL: [Mode; 5] = [Mode::Ecb, Mode::Cbc, Mode::Cfb, Mode::Ofb, Mode::Ctr];

    /// 3-bit selector driven on `start_mode`.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Mode::Ecb => 0,
            Mode::Cbc => 1,
            Mode::Cfb => 2,
            Mode::Ofb => 3,
            Mode::Ctr => 4,
        }
    }

    /// Decode a `start_mode` selector.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCode` for codes 5 to 7 (and anything wider).
    pub fn from_code(code: u8) -> Result<Self> {
        Mode::ALL
            .into_iter()
            .find(|m| m.code() == code)
            .ok_or(PrimitivesError::InvalidCode { field: "mode", code })
    }

    /// Upper-case mode name as used in AESAVS file names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Ecb => "ECB",
            Mode::Cbc => "CBC",
            Mode::Cfb => "CFB",
            Mode::Ofb => "OFB",
            Mode::Ctr => "CTR",
        }
    }

    /// Chaining parameters the mode needs.
    #[must_use]
    pub const fn requirement(self) -> ParamRequirement {
        match self {
            Mode::Ecb => ParamRequirement::KeyOnly,
            Mode::Cbc | Mode::Cfb | Mode::Ofb => ParamRequirement::Iv,
            Mode::Ctr => ParamRequirement::NonceCounter,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ECB" => Ok(Mode::Ecb),
            "CBC" => Ok(Mode::Cbc),
            "CFB" | "CFB128" => Ok(Mode::Cfb),
            "OFB" => Ok(Mode::Ofb),
            "CTR" => Ok(Mode::Ctr),
            other => Err(PrimitivesError::UnsupportedMode(other.to_string())),
        }
    }
}

/// AES key-length class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyLengthClass {
    /// 128-bit key
    Aes128,
    /// 192-bit key
    Aes192,
    /// 256-bit key
    Aes256,
}

impl KeyLengthClass {
    /// Derive the class from a key's byte length.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedKeyLength` for anything but 16, 24 or 32.
    pub fn from_key_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(KeyLengthClass::Aes128),
            24 => Ok(KeyLengthClass::Aes192),
            32 => Ok(KeyLengthClass::Aes256),
            actual => Err(PrimitivesError::UnsupportedKeyLength { actual }),
        }
    }

    /// Key length in bytes.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            KeyLengthClass::Aes128 => 16,
            KeyLengthClass::Aes192 => 24,
            KeyLengthClass::Aes256 => 32,
        }
    }

    /// Key length in bits.
    #[must_use]
    pub const fn bits(self) -> usize {
        self.key_len() * 8
    }

    /// 2-bit selector driven on `start_keylenn`.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            KeyLengthClass::Aes128 => 0,
            KeyLengthClass::Aes192 => 1,
            KeyLengthClass::Aes256 => 2,
        }
    }

    /// Decode a `start_keylenn` selector.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCode` for code 3.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(KeyLengthClass::Aes128),
            1 => Ok(KeyLengthClass::Aes192),
            2 => Ok(KeyLengthClass::Aes256),
            code => Err(PrimitivesError::InvalidCode { field: "key length", code }),
        }
    }
}

impl fmt::Display for KeyLengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}", self.bits())
    }
}

/// Direction of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Plaintext to ciphertext
    Encrypt,
    /// Ciphertext to plaintext
    Decrypt,
}

impl Direction {
    /// 1-bit `start_decrypt` flag.
    #[must_use]
    pub const fn is_decrypt(self) -> bool {
        matches!(self, Direction::Decrypt)
    }

    /// Decode the `start_decrypt` flag.
    #[must_use]
    pub const fn from_flag(decrypt: bool) -> Self {
        if decrypt { Direction::Decrypt } else { Direction::Encrypt }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encrypt"),
            Direction::Decrypt => f.write_str("decrypt"),
        }
    }
}
