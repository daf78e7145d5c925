#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Error type for harness-level operations.

use crate::device::sim::CoreModelError;
use crate::driver::DriverError;
use crate::kat::CorpusError;
use blockcheck_primitives::PrimitivesError;
use thiserror::Error;

/// Errors surfaced by the harness and orchestrator.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Rejected configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Handshake failure.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Invalid session or key material.
    #[error(transparent)]
    Primitives(#[from] PrimitivesError),

    /// Corpus could not be read or interpreted.
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The device model could not be constructed.
    #[error("Device model error: {0}")]
    Device(#[from] CoreModelError),
}

impl HarnessError {
    /// True for failures that must stop the whole run rather than one case.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, HarnessError::Driver(DriverError::ProtocolViolation { .. }))
    }
}

/// Result alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
