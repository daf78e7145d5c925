#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![allow(clippy::arithmetic_side_effects)]

//! Validation orchestrator.
//!
//! For each session: compute the reference output, drive the device, and
//! compare block by block in input order. When a corpus publishes its own
//! answer the comparison is three-way (device, reference, published) so a
//! broken reference model or corpus cannot hide a device bug.
//!
//! Failure handling per case:
//! - a data mismatch fails that case only;
//! - a timeout fails that case; the harness has already reset the device;
//! - a record with unsupported parameters is skipped;
//! - a protocol violation aborts the whole run.

use crate::device::{ClockedDevice, Port};
use crate::driver::DriverError;
use crate::error::{HarnessError, Result};
use crate::harness::TestHarness;
use crate::kat::{CorpusError, KatCase, ParsedCorpus, discover_corpora, load_corpus_file, vectors};
use crate::report::ValidationSummary;
use anyhow::Context;
use blockcheck_primitives::{Block, Direction, KeyLengthClass, Mode, Session, expected_output};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// First disagreeing block of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMismatch {
    pub index: usize,
    pub reference: Block,
    pub actual: Block,
    pub published: Option<Block>,
}

impl fmt::Display for BlockMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {}: reference {} device {}", self.index, self.reference, self.actual)?;
        if let Some(published) = self.published {
            write!(f, " published {published}")?;
        }
        Ok(())
    }
}

/// Result of validating one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Mismatch(BlockMismatch),
    /// Output block counts differ.
    LengthMismatch { expected: usize, actual: usize },
    Timeout { operation: Port, waited_cycles: u64 },
    /// Not runnable on this core (bad key length, parameter mismatch, ...).
    Rejected(String),
}

impl Verdict {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Verdict::Rejected(_))
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.is_pass() && !self.is_skipped()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("pass"),
            Verdict::Mismatch(m) => write!(f, "mismatch at {m}"),
            Verdict::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} blocks, got {actual}")
            }
            Verdict::Timeout { operation, waited_cycles } => {
                write!(f, "timeout on {operation} after {waited_cycles} cycles")
            }
            Verdict::Rejected(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

/// One validated case with its identity and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Corpus name, or a caller-chosen label for ad hoc sessions.
    pub corpus: String,
    pub case: String,
    pub mode: Mode,
    /// `None` when the record was rejected before its key was classified.
    pub key_length: Option<KeyLengthClass>,
    pub direction: Direction,
    pub blocks: usize,
    pub verdict: Verdict,
    pub started_at: DateTime<Utc>,
    /// Execution time in microseconds.
    pub execution_time_us: u64,
}

/// Compare device output against the reference and, optionally, the
/// published answer. Stops at the first disagreeing block.
#[must_use]
pub fn compare_blocks(
    reference: &[Block],
    actual: &[Block],
    published: Option<&[Block]>,
) -> Verdict {
    if actual.len() != reference.len() {
        return Verdict::LengthMismatch { expected: reference.len(), actual: actual.len() };
    }
    if let Some(published) = published {
        if published.len() != reference.len() {
            return Verdict::LengthMismatch { expected: published.len(), actual: reference.len() };
        }
    }

    for (index, (reference, actual)) in reference.iter().zip(actual).enumerate() {
        let published = published.and_then(|p| p.get(index)).copied();
        if actual != reference || published.is_some_and(|p| p != *reference) {
            return Verdict::Mismatch(BlockMismatch {
                index,
                reference: *reference,
                actual: *actual,
                published,
            });
        }
    }
    Verdict::Pass
}

/// Validate one session on the harness's device.
///
/// # Errors
///
/// A protocol violation, or a session the reference model cannot run.
/// Timeouts are reported as [`Verdict::Timeout`], not as errors.
pub fn validate_session<D: ClockedDevice>(
    harness: &mut TestHarness<D>,
    session: Session,
    published: Option<&[Block]>,
) -> Result<Verdict> {
    let reference = expected_output(&session)?;
    match harness.run_session(session) {
        Ok(actual) => Ok(compare_blocks(&reference, &actual, published)),
        Err(HarnessError::Driver(DriverError::Timeout { operation, waited_cycles })) => {
            Ok(Verdict::Timeout { operation, waited_cycles })
        }
        Err(e) => Err(e),
    }
}

/// Prepare and validate one corpus record.
///
/// # Errors
///
/// Only a protocol violation; everything else becomes part of the outcome.
pub fn validate_case<D: ClockedDevice>(
    harness: &mut TestHarness<D>,
    corpus: &str,
    mode: Mode,
    case: &KatCase,
) -> Result<CaseOutcome> {
    let started_at = Utc::now();
    let start = Instant::now();

    let (verdict, key_length, blocks) = match case.to_session(mode) {
        Ok(prepared) => {
            let key_length = prepared.session.key_class();
            let blocks = prepared.session.len();
            let check_published = harness.config().check_published;
            let published = check_published.then_some(prepared.published.as_slice());
            let verdict = validate_session(harness, prepared.session, published)?;
            (verdict, Some(key_length), blocks)
        }
        Err(e) => (Verdict::Rejected(e.to_string()), None, 0),
    };

    let outcome = CaseOutcome {
        corpus: corpus.to_string(),
        case: case.label(),
        mode,
        key_length,
        direction: case.direction,
        blocks,
        verdict,
        started_at,
        execution_time_us: u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
    };
    log_outcome(&outcome);
    Ok(outcome)
}

fn log_outcome(outcome: &CaseOutcome) {
    if outcome.verdict.is_failure() {
        warn!(
            corpus = %outcome.corpus,
            case = %outcome.case,
            mode = %outcome.mode,
            verdict = %outcome.verdict,
            "case failed"
        );
    } else {
        info!(
            corpus = %outcome.corpus,
            case = %outcome.case,
            mode = %outcome.mode,
            verdict = %outcome.verdict,
            "case done"
        );
    }
}

/// Run every case in order, honoring `fail_fast`.
///
/// # Errors
///
/// Aborts on a protocol violation.
pub fn run_cases<D: ClockedDevice>(
    harness: &mut TestHarness<D>,
    corpus: &str,
    mode: Mode,
    cases: &[KatCase],
) -> Result<ValidationSummary> {
    let mut summary = ValidationSummary::new();
    for case in cases {
        let outcome = validate_case(harness, corpus, mode, case)?;
        let failed = outcome.verdict.is_failure();
        summary.add_outcome(outcome);
        if failed && harness.config().fail_fast {
            warn!(corpus, "stopping at first failure");
            break;
        }
    }
    summary.finish();
    Ok(summary)
}

/// Run a parsed corpus, counting records the parser dropped as skipped.
///
/// # Errors
///
/// Aborts on a protocol violation.
pub fn run_parsed<D: ClockedDevice>(
    harness: &mut TestHarness<D>,
    corpus: &str,
    mode: Mode,
    parsed: &ParsedCorpus,
) -> Result<ValidationSummary> {
    let mut summary = run_cases(harness, corpus, mode, &parsed.cases)?;
    summary.record_diagnostics(corpus, &parsed.diagnostics);
    Ok(summary)
}

/// Run the built-in SP 800-38A and AESAVS corpora.
///
/// # Errors
///
/// Aborts on a protocol violation.
pub fn run_embedded<D: ClockedDevice>(harness: &mut TestHarness<D>) -> Result<ValidationSummary> {
    let mut summary = ValidationSummary::new();
    for corpus in vectors::ALL {
        let part = run_parsed(harness, corpus.name, corpus.mode, &corpus.parse())?;
        let stop = harness.config().fail_fast && !part.all_passed();
        summary.merge(part);
        if stop {
            break;
        }
    }
    summary.finish();
    info!(
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        "embedded corpora done"
    );
    Ok(summary)
}

/// Load one `.rsp` file and run it.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the run hits a
/// protocol violation.
pub fn run_corpus_file<D: ClockedDevice>(
    harness: &mut TestHarness<D>,
    path: &Path,
) -> anyhow::Result<ValidationSummary> {
    let corpus =
        load_corpus_file(path).with_context(|| format!("loading corpus {}", path.display()))?;
    let name = corpus.name();
    run_parsed(harness, &name, corpus.mode, &corpus.parsed)
        .with_context(|| format!("running corpus {name}"))
}

/// Run every `.rsp` file under `dir`. Files for unsupported modes are noted
/// in the summary and skipped.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked, a file cannot be read,
/// or the run hits a protocol violation.
pub fn run_corpus_dir<D: ClockedDevice>(
    harness: &mut TestHarness<D>,
    dir: &Path,
) -> anyhow::Result<ValidationSummary> {
    let files = discover_corpora(dir)
        .with_context(|| format!("discovering corpora under {}", dir.display()))?;
    if files.is_empty() {
        warn!(dir = %dir.display(), "no .rsp files found");
    }

    let mut summary = ValidationSummary::new();
    for path in files {
        let corpus = match load_corpus_file(&path) {
            Ok(corpus) => corpus,
            Err(CorpusError::Unsupported { path, reason }) => {
                warn!(path = %path.display(), %reason, "corpus skipped");
                summary.record_unsupported(&path.display().to_string(), &reason);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("loading corpus {}", path.display()));
            }
        };
        let name = corpus.name();
        let part = run_parsed(harness, &name, corpus.mode, &corpus.parsed)
            .with_context(|| format!("running corpus {name}"))?;
        let stop = harness.config().fail_fast && !part.all_passed();
        summary.merge(part);
        if stop {
            break;
        }
    }
    summary.finish();
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn blocks(values: &[u128]) -> Vec<Block> {
        values.iter().map(|v| Block::from_u128(*v)).collect()
    }

    #[test]
    fn test_compare_pass() {
        let r = blocks(&[1, 2, 3]);
        assert_eq!(compare_blocks(&r, &r, None), Verdict::Pass);
        assert_eq!(compare_blocks(&r, &r, Some(&r)), Verdict::Pass);
    }

    #[test]
    fn test_compare_reports_first_device_mismatch() {
        let r = blocks(&[1, 2, 3]);
        let a = blocks(&[1, 9, 8]);
        match compare_blocks(&r, &a, None) {
            Verdict::Mismatch(m) => {
                assert_eq!(m.index, 1);
                assert_eq!(m.reference, Block::from_u128(2));
                assert_eq!(m.actual, Block::from_u128(9));
                assert_eq!(m.published, None);
            }
            other => panic!("expected a mismatch, got {other}"),
        }
    }

    #[test]
    fn test_compare_catches_published_disagreement() {
        let r = blocks(&[1, 2]);
        let p = blocks(&[1, 5]);
        let verdict = compare_blocks(&r, &r, Some(&p));
        assert_eq!(
            verdict,
            Verdict::Mismatch(BlockMismatch {
                index: 1,
                reference: Block::from_u128(2),
                actual: Block::from_u128(2),
                published: Some(Block::from_u128(5)),
            })
        );
    }

    #[test]
    fn test_compare_lengths() {
        let r = blocks(&[1, 2]);
        assert_eq!(
            compare_blocks(&r, &r[..1], None),
            Verdict::LengthMismatch { expected: 2, actual: 1 }
        );
        assert!(matches!(
            compare_blocks(&r, &r, Some(&r[..1])),
            Verdict::LengthMismatch { .. }
        ));
    }

    #[test]
    fn test_verdict_classes() {
        assert!(Verdict::Pass.is_pass());
        assert!(Verdict::Rejected("x".into()).is_skipped());
        assert!(!Verdict::Rejected("x".into()).is_failure());
        assert!(Verdict::Timeout { operation: Port::Get, waited_cycles: 1 }.is_failure());
        assert_eq!(
            Verdict::Timeout { operation: Port::Get, waited_cycles: 5 }.to_string(),
            "timeout on get after 5 cycles"
        );
    }
}
