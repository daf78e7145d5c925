#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Known-answer test corpora.
//!
//! A corpus is the AESAVS `.rsp` text format: `[ENCRYPT]` / `[DECRYPT]`
//! sections containing records of `KEY`, `IV`, `PLAINTEXT` and `CIPHERTEXT`
//! hex fields. [`parser`] turns text into [`KatCase`]s, [`loader`] reads
//! files and infers their mode, [`vectors`] embeds a built-in suite.

pub mod loader;
pub mod parser;
pub mod vectors;

use blockcheck_primitives::{
    Block, ChainingParams, CipherKey, CounterBlock, Direction, Mode, ParamRequirement, Session,
    split_blocks,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use loader::{LoadedCorpus, discover_corpora, load_corpus_file, mode_from_file_name};
pub use parser::CorpusParser;

/// Failures reading or locating corpus files.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The file cannot be run against this core (unknown mode, CFB1/CFB8, ...).
    #[error("Unsupported corpus {}: {reason}", path.display())]
    Unsupported { path: PathBuf, reason: String },
}

/// How serious a corpus diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Suspicious input that did not cost a record.
    Warning,
    /// A record was skipped.
    Error,
}

/// A problem found while parsing, tied to a line of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusDiagnostic {
    /// 1-based line number.
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for CorpusDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "line {}: {}: {}", self.line, level, self.message)
    }
}

/// One record of a corpus.
#[derive(Clone, PartialEq, Eq)]
pub struct KatCase {
    /// Position among the cases emitted from the same corpus.
    pub index: usize,
    /// Line on which the record began.
    pub line: usize,
    /// `COUNT` label, if the record had one.
    pub count: Option<u32>,
    pub direction: Direction,
    pub key: Vec<u8>,
    pub iv: Option<Vec<u8>>,
    pub plaintext: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl KatCase {
    /// Bytes fed to the device: the ciphertext when decrypting.
    #[must_use]
    pub fn input(&self) -> &[u8] {
        match self.direction {
            Direction::Encrypt => &self.plaintext,
            Direction::Decrypt => &self.ciphertext,
        }
    }

    /// Bytes the corpus publishes as the expected output.
    #[must_use]
    pub fn published(&self) -> &[u8] {
        match self.direction {
            Direction::Encrypt => &self.ciphertext,
            Direction::Decrypt => &self.plaintext,
        }
    }

    /// Human-readable identity used in reports, e.g. `DECRYPT COUNT=3 (line 41)`.
    #[must_use]
    pub fn label(&self) -> String {
        let section = match self.direction {
            Direction::Encrypt => "ENCRYPT",
            Direction::Decrypt => "DECRYPT",
        };
        match self.count {
            Some(count) => format!("{section} COUNT={count} (line {})", self.line),
            None => format!("{section} #{} (line {})", self.index, self.line),
        }
    }

    /// Build the device session for this record under `mode`.
    ///
    /// For CTR the 16-byte IV field is the initial counter block: its first
    /// eight bytes are the nonce and the last eight the big-endian counter.
    ///
    /// # Errors
    ///
    /// Any [`PrimitivesError`](blockcheck_primitives::PrimitivesError): bad key
    /// length, an IV where the mode takes none (or vice versa), or data that
    /// is not block-aligned.
    pub fn to_session(&self, mode: Mode) -> blockcheck_primitives::Result<PreparedCase> {
        let key = CipherKey::new(&self.key)?;
        let params = match (mode.requirement(), self.iv.as_deref()) {
            (ParamRequirement::KeyOnly, None) => ChainingParams::None,
            // rejected below by Session::new as a parameter mismatch
            (ParamRequirement::KeyOnly, Some(iv)) => ChainingParams::Iv(Block::from_slice(iv)?),
            (ParamRequirement::Iv, Some(iv)) => ChainingParams::Iv(Block::from_slice(iv)?),
            (ParamRequirement::NonceCounter, Some(iv)) => {
                ChainingParams::Counter(CounterBlock::from_block(Block::from_slice(iv)?))
            }
            (_, None) => ChainingParams::None,
        };
        let session = Session::from_bytes(mode, key, self.direction, params, self.input())?;
        let published = split_blocks(self.published())?;
        Ok(PreparedCase { session, published })
    }
}

impl fmt::Debug for KatCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KatCase")
            .field("index", &self.index)
            .field("line", &self.line)
            .field("count", &self.count)
            .field("direction", &self.direction)
            .field("key", &crate::logging::sanitize_key(&self.key))
            .field("iv", &self.iv.as_deref().map(hex::encode))
            .field("plaintext", &hex::encode(&self.plaintext))
            .field("ciphertext", &hex::encode(&self.ciphertext))
            .finish()
    }
}

/// A record turned into a runnable session plus its published answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCase {
    pub session: Session,
    pub published: Vec<Block>,
}

/// Parser output: every well-formed record plus what went wrong elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCorpus {
    pub cases: Vec<KatCase>,
    pub diagnostics: Vec<CorpusDiagnostic>,
}

impl ParsedCorpus {
    /// Records dropped by the parser.
    #[must_use]
    pub fn skipped_records(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn cases_in(&self, direction: Direction) -> impl Iterator<Item = &KatCase> {
        self.cases.iter().filter(move |c| c.direction == direction)
    }
}
