#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![allow(clippy::arithmetic_side_effects)]

//! Run summaries.

use crate::kat::{CorpusDiagnostic, Severity};
use crate::orchestrator::CaseOutcome;
use blockcheck_primitives::Mode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A parser diagnostic attributed to its corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusNote {
    pub corpus: String,
    pub diagnostic: CorpusDiagnostic,
}

/// A corpus file that was not run at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedCorpus {
    pub corpus: String,
    pub reason: String,
}

/// Per-mode counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Aggregated result of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub passed: usize,
    pub failed: usize,
    /// Rejected cases plus records the parser dropped.
    pub skipped: usize,
    pub outcomes: Vec<CaseOutcome>,
    pub diagnostics: Vec<CorpusNote>,
    pub unsupported: Vec<UnsupportedCorpus>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Sum of per-case execution times, in microseconds.
    pub total_time_us: u64,
}

impl Default for ValidationSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationSummary {
    #[must_use]
    pub fn new() -> Self {
        Self {
            passed: 0,
            failed: 0,
            skipped: 0,
            outcomes: Vec::new(),
            diagnostics: Vec::new(),
            unsupported: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
            total_time_us: 0,
        }
    }

    pub fn add_outcome(&mut self, outcome: CaseOutcome) {
        if outcome.verdict.is_pass() {
            self.passed += 1;
        } else if outcome.verdict.is_skipped() {
            self.skipped += 1;
        } else {
            self.failed += 1;
        }
        self.total_time_us = self.total_time_us.saturating_add(outcome.execution_time_us);
        self.outcomes.push(outcome);
    }

    /// Keep the parser's diagnostics; every error-level one is a skipped record.
    pub fn record_diagnostics(&mut self, corpus: &str, diagnostics: &[CorpusDiagnostic]) {
        for diagnostic in diagnostics {
            if diagnostic.severity == Severity::Error {
                self.skipped += 1;
            }
            self.diagnostics
                .push(CorpusNote { corpus: corpus.to_string(), diagnostic: diagnostic.clone() });
        }
    }

    pub fn record_unsupported(&mut self, corpus: &str, reason: &str) {
        self.unsupported
            .push(UnsupportedCorpus { corpus: corpus.to_string(), reason: reason.to_string() });
    }

    /// Fold another summary into this one, keeping the earlier start time.
    pub fn merge(&mut self, other: ValidationSummary) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.total_time_us = self.total_time_us.saturating_add(other.total_time_us);
        self.started_at = self.started_at.min(other.started_at);
        self.outcomes.extend(other.outcomes);
        self.diagnostics.extend(other.diagnostics);
        self.unsupported.extend(other.unsupported);
    }

    /// Stamp the end of the run.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Pass rate over executed cases, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 { 0.0 } else { (self.passed as f64 / executed as f64) * 100.0 }
    }

    #[must_use]
    pub fn by_mode(&self) -> BTreeMap<Mode, ModeTally> {
        let mut tallies: BTreeMap<Mode, ModeTally> = BTreeMap::new();
        for outcome in &self.outcomes {
            let tally = tallies.entry(outcome.mode).or_default();
            if outcome.verdict.is_pass() {
                tally.passed += 1;
            } else if outcome.verdict.is_skipped() {
                tally.skipped += 1;
            } else {
                tally.failed += 1;
            }
        }
        tallies
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| o.verdict.is_failure())
    }

    /// Plain-text report; same as the `Display` output.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

const RULE: &str = "========================================";
const THIN_RULE: &str = "----------------------------------------";

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "AES Core Validation Summary")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Total Cases:  {}", self.total())?;
        writeln!(f, "Passed:       {} ({:.1}%)", self.passed, self.pass_rate())?;
        writeln!(f, "Failed:       {}", self.failed)?;
        writeln!(f, "Skipped:      {}", self.skipped)?;
        writeln!(f, "Total Time:   {} ms", self.total_time_us / 1000)?;

        let by_mode = self.by_mode();
        if !by_mode.is_empty() {
            writeln!(f, "\nPer-Mode Breakdown:")?;
            writeln!(f, "{THIN_RULE}")?;
            for (mode, tally) in &by_mode {
                writeln!(
                    f,
                    "  {:<6} {}/{} passed, {} skipped",
                    mode.name(),
                    tally.passed,
                    tally.passed + tally.failed,
                    tally.skipped
                )?;
            }
        }

        if self.failed > 0 {
            writeln!(f, "\nFailed Cases:")?;
            writeln!(f, "{THIN_RULE}")?;
            for outcome in self.failures() {
                writeln!(f, "  {} - {}", outcome.corpus, outcome.case)?;
                writeln!(f, "    {}", outcome.verdict)?;
            }
        }

        if !self.diagnostics.is_empty() {
            writeln!(f, "\nCorpus Diagnostics:")?;
            writeln!(f, "{THIN_RULE}")?;
            for note in &self.diagnostics {
                writeln!(f, "  {}: {}", note.corpus, note.diagnostic)?;
            }
        }

        if !self.unsupported.is_empty() {
            writeln!(f, "\nUnsupported Corpora:")?;
            writeln!(f, "{THIN_RULE}")?;
            for skipped in &self.unsupported {
                writeln!(f, "  {}: {}", skipped.corpus, skipped.reason)?;
            }
        }

        writeln!(f, "{RULE}")
    }
}
