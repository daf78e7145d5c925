#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! # blockcheck validation
//!
//! Conformance harness for clock-synchronous AES cores exposing a
//! `start` / `put` / `get` / `end_of_text` ready-enable handshake.
//!
//! ## Modules
//!
//! - **device**: the [`ClockedDevice`] signal contract and the behavioral
//!   [`PipelinedCore`](device::sim::PipelinedCore)
//! - **driver**: [`HandshakeDriver`], the per-session protocol state machine
//! - **harness**: [`TestHarness`], device ownership, reset and teardown
//! - **kat**: `.rsp` corpus parsing, loading and the embedded vectors
//! - **orchestrator**: reference-versus-device comparison and corpus runs
//! - **report**: [`ValidationSummary`] text and JSON reports
//! - **config** / **logging**: [`HarnessConfig`] and tracing setup
//!
//! ## Example
//!
//! ```rust
//! use blockcheck_validation::config::HarnessConfig;
//! use blockcheck_validation::device::sim::CoreTiming;
//! use blockcheck_validation::harness::TestHarness;
//! use blockcheck_validation::orchestrator::run_embedded;
//!
//! let mut harness = TestHarness::simulated(CoreTiming::default(), HarnessConfig::default())?;
//! let summary = run_embedded(&mut harness)?;
//! assert!(summary.all_passed());
//! # Ok::<(), blockcheck_validation::HarnessError>(())
//! ```

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod harness;
pub mod kat;
pub mod logging;
pub mod orchestrator;
pub mod report;

pub use config::HarnessConfig;
pub use device::{ClockedDevice, Port, StartFields};
pub use driver::{DriverError, HandshakeDriver, SessionPhase};
pub use error::{HarnessError, Result};
pub use harness::TestHarness;
pub use kat::{CorpusDiagnostic, CorpusError, KatCase, ParsedCorpus, PreparedCase, Severity};
pub use orchestrator::{
    BlockMismatch, CaseOutcome, Verdict, compare_blocks, run_corpus_dir, run_corpus_file,
    run_embedded, validate_case, validate_session,
};
pub use report::ValidationSummary;
