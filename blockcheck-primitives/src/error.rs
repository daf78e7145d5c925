//! Error types for blockcheck-primitives.

use crate::mode::Mode;

/// Errors raised while constructing blocks, keys, sessions or the reference model.
///
/// Every variant is an "unsupported parameter" or caller error: it is raised
/// before a [`Session`](crate::session::Session) exists, so nothing downstream
/// ever sees a half-valid session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitivesError {
    /// Key length is not one of 16, 24 or 32 bytes.
    #[error("Unsupported key length: {actual} bytes (expected 16, 24 or 32)")]
    UnsupportedKeyLength {
        /// The length that was supplied.
        actual: usize,
    },

    /// Mode name or code outside the supported enumeration.
    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    /// A device selector code that does not map to a known value.
    #[error("Invalid {field} code: {code}")]
    InvalidCode {
        /// Which selector was decoded.
        field: &'static str,
        /// The raw code.
        code: u8,
    },

    /// A single block was built from the wrong number of bytes.
    #[error("Invalid block length: expected 16 bytes, got {actual}")]
    InvalidBlockLength {
        /// The length that was supplied.
        actual: usize,
    },

    /// Byte string is not a whole number of blocks.
    #[error("Data length {actual} is not a multiple of the 16-byte block size")]
    PartialBlock {
        /// The length that was supplied.
        actual: usize,
    },

    /// Hex decoding failed.
    #[error("Hex decode error: {0}")]
    HexError(String),

    /// The chaining parameters do not match what the mode requires.
    #[error("{mode} requires {expected}, got {actual}")]
    ParameterMismatch {
        /// Mode being configured.
        mode: Mode,
        /// Parameter kind the mode needs.
        expected: &'static str,
        /// Parameter kind that was supplied.
        actual: &'static str,
    },

    /// A session must carry at least one block.
    #[error("Session has no input blocks")]
    EmptySession,
}

/// Result alias for blockcheck-primitives operations.
pub type Result<T> = std::result::Result<T, PrimitivesError>;

/// Decode a hex string into bytes.
///
/// # Errors
///
/// Returns `PrimitivesError::HexError` if the input string is not valid hex.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    hex::decode(s.trim()).map_err(|e| PrimitivesError::HexError(e.to_string()))
}
