#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![allow(clippy::arithmetic_side_effects)]

//! Line-oriented `.rsp` parser.
//!
//! Grammar, one line at a time:
//!
//! - `[ENCRYPT]` / `[DECRYPT]` set the direction and clear every field;
//! - `KEY`, `IV`, `PLAINTEXT`, `CIPHERTEXT` (`NAME = hex`, case-sensitive)
//!   fill the current record;
//! - `COUNT = n` is kept as a label only;
//! - blank lines, `#` comments, other bracketed headers, unknown names and
//!   lines without `=` are ignored.
//!
//! A record is emitted the moment both `PLAINTEXT` and `CIPHERTEXT` are set,
//! after which those two are cleared. `KEY` and `IV` carry over to later
//! records until overwritten. The parser never stops early: a bad record
//! becomes a [`CorpusDiagnostic`] and parsing continues.

use super::{CorpusDiagnostic, KatCase, ParsedCorpus, Severity};
use blockcheck_primitives::{Direction, decode_hex};
use std::io::BufRead;
use tracing::{debug, warn};

/// Incremental parser; feed it lines, then [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct CorpusParser {
    line: usize,
    direction: Option<Direction>,
    key: Option<Vec<u8>>,
    iv: Option<Vec<u8>>,
    plaintext: Option<Vec<u8>>,
    ciphertext: Option<Vec<u8>>,
    count: Option<u32>,
    record_line: Option<usize>,
    poisoned: bool,
    cases: Vec<KatCase>,
    diagnostics: Vec<CorpusDiagnostic>,
}

impl CorpusParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole corpus held in memory.
    #[must_use]
    pub fn parse_str(text: &str) -> ParsedCorpus {
        let mut parser = Self::new();
        for line in text.lines() {
            parser.feed_line(line);
        }
        parser.finish()
    }

    /// Parse from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error from `reader`.
    pub fn parse_reader<R: BufRead>(reader: R) -> std::io::Result<ParsedCorpus> {
        let mut parser = Self::new();
        for line in reader.lines() {
            parser.feed_line(&line?);
        }
        Ok(parser.finish())
    }

    /// Consume one line of input.
    pub fn feed_line(&mut self, raw: &str) {
        self.line += 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        if line.starts_with('[') {
            match line {
                "[ENCRYPT]" => self.enter_section(Direction::Encrypt),
                "[DECRYPT]" => self.enter_section(Direction::Decrypt),
                _ => {}
            }
            return;
        }

        let Some((name, value)) = line.split_once('=') else {
            return;
        };
        let (name, value) = (name.trim(), value.trim());

        match name {
            "COUNT" => {
                self.mark_record_start();
                match value.parse() {
                    Ok(count) => self.count = Some(count),
                    Err(_) => {
                        self.diagnose(Severity::Warning, format!("unreadable COUNT `{value}`"));
                    }
                }
            }
            "KEY" => self.key = self.field(name, value),
            "IV" => self.iv = self.field(name, value),
            // a bad value still occupies the slot so the record completes and is skipped
            "PLAINTEXT" => {
                self.plaintext = Some(self.field(name, value).unwrap_or_default());
                self.try_emit();
            }
            "CIPHERTEXT" => {
                self.ciphertext = Some(self.field(name, value).unwrap_or_default());
                self.try_emit();
            }
            _ => {}
        }
    }

    /// Flush and return everything parsed so far.
    #[must_use]
    pub fn finish(mut self) -> ParsedCorpus {
        if self.plaintext.is_some() || self.ciphertext.is_some() {
            self.diagnose(Severity::Warning, "incomplete record at end of input".to_string());
        }
        debug!(
            cases = self.cases.len(),
            diagnostics = self.diagnostics.len(),
            "corpus parsed"
        );
        ParsedCorpus { cases: self.cases, diagnostics: self.diagnostics }
    }

    fn enter_section(&mut self, direction: Direction) {
        if self.plaintext.is_some() || self.ciphertext.is_some() {
            let message = "incomplete record dropped at section change".to_string();
            self.diagnose(Severity::Warning, message);
        }
        self.direction = Some(direction);
        self.key = None;
        self.iv = None;
        self.clear_record();
    }

    fn mark_record_start(&mut self) {
        if self.record_line.is_none() {
            self.record_line = Some(self.line);
        }
    }

    /// Decode a hex field. A bad value poisons the current record.
    fn field(&mut self, name: &str, value: &str) -> Option<Vec<u8>> {
        self.mark_record_start();
        match decode_hex(value) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                self.poisoned = true;
                self.diagnose(Severity::Error, format!("{name}: {e}"));
                None
            }
        }
    }

    fn try_emit(&mut self) {
        if self.plaintext.is_none() || self.ciphertext.is_none() {
            return;
        }
        let start = self.record_line.unwrap_or(self.line);
        let plaintext = self.plaintext.take().unwrap_or_default();
        let ciphertext = self.ciphertext.take().unwrap_or_default();
        let count = self.count;
        let poisoned = self.poisoned;
        self.clear_record();
        if poisoned {
            return;
        }

        let Some(direction) = self.direction else {
            self.reject(start, "record appears before any [ENCRYPT] or [DECRYPT] section");
            return;
        };
        let Some(key) = self.key.clone() else {
            self.reject(start, "record has no KEY");
            return;
        };

        self.cases.push(KatCase {
            index: self.cases.len(),
            line: start,
            count,
            direction,
            key,
            iv: self.iv.clone(),
            plaintext,
            ciphertext,
        });
    }

    fn reject(&mut self, line: usize, message: &str) {
        warn!(line, reason = message, "corpus record skipped");
        self.diagnostics.push(CorpusDiagnostic {
            line,
            severity: Severity::Error,
            message: message.to_string(),
        });
    }

    fn clear_record(&mut self) {
        self.plaintext = None;
        self.ciphertext = None;
        self.count = None;
        self.record_line = None;
        self.poisoned = false;
    }

    fn diagnose(&mut self, severity: Severity, message: String) {
        warn!(line = self.line, reason = %message, "corpus diagnostic");
        self.diagnostics.push(CorpusDiagnostic { line: self.line, severity, message });
    }
}
