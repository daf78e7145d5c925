#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Corpus files on disk.
//!
//! AESAVS response files name their mode in the file-name prefix
//! (`CBCGFSbox128.rsp`, `CFB128VarKey256.rsp`, `ECBMMT192.rsp`, ...).
//! Bit- and byte-segment CFB files (`CFB1*`, `CFB8*`) exercise modes the core
//! does not implement and are rejected.

use super::{CorpusError, ParsedCorpus, parser::CorpusParser};
use blockcheck_primitives::Mode;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A parsed corpus file and the mode its cases run under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCorpus {
    pub path: PathBuf,
    pub mode: Mode,
    pub parsed: ParsedCorpus,
}

impl LoadedCorpus {
    /// File name for reports, falling back to the full path.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// Infer the mode from an AESAVS file name.
///
/// # Errors
///
/// `CorpusError::Unsupported` for CFB1/CFB8 and unrecognized prefixes.
pub fn mode_from_file_name(path: &Path) -> Result<Mode, CorpusError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_uppercase())
        .unwrap_or_default();

    let unsupported = |reason: &str| CorpusError::Unsupported {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if let Some(rest) = name.strip_prefix("CFB") {
        return if rest.starts_with("128") {
            Ok(Mode::Cfb)
        } else if rest.starts_with('1') || rest.starts_with('8') {
            Err(unsupported("CFB segment sizes other than 128 bits are not supported"))
        } else {
            Err(unsupported("CFB corpus without a segment size"))
        };
    }

    [("ECB", Mode::Ecb), ("CBC", Mode::Cbc), ("OFB", Mode::Ofb), ("CTR", Mode::Ctr)]
        .into_iter()
        .find(|(prefix, _)| name.starts_with(prefix))
        .map(|(_, mode)| mode)
        .ok_or_else(|| unsupported("file name does not start with a known mode"))
}

/// Read and parse one corpus, inferring its mode from the file name.
///
/// # Errors
///
/// Returns an error if the mode cannot be inferred or the file cannot be read.
pub fn load_corpus_file(path: &Path) -> Result<LoadedCorpus, CorpusError> {
    let mode = mode_from_file_name(path)?;
    load_corpus_file_as(path, mode)
}

/// Read and parse one corpus under an explicit mode.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_corpus_file_as(path: &Path, mode: Mode) -> Result<LoadedCorpus, CorpusError> {
    let io_error = |source| CorpusError::Io { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(io_error)?;
    let parsed = CorpusParser::parse_reader(BufReader::new(file)).map_err(io_error)?;
    info!(
        path = %path.display(),
        mode = %mode,
        cases = parsed.cases.len(),
        diagnostics = parsed.diagnostics.len(),
        "corpus loaded"
    );
    Ok(LoadedCorpus { path: path.to_path_buf(), mode, parsed })
}

/// Every `.rsp` file under `dir`, recursively, in sorted order.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked.
pub fn discover_corpora(dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry =
            entry.map_err(|source| CorpusError::Walk { path: dir.to_path_buf(), source })?;
        let is_rsp = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("rsp"));
        if entry.file_type().is_file() && is_rsp {
            found.push(entry.into_path());
        }
    }
    debug!(dir = %dir.display(), files = found.len(), "corpus discovery");
    Ok(found)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_prefixes() {
        let cases = [
            ("ECBGFSbox128.rsp", Mode::Ecb),
            ("CBCVarKey256.rsp", Mode::Cbc),
            ("CFB128MMT192.rsp", Mode::Cfb),
            ("ofbvartxt128.rsp", Mode::Ofb),
            ("CTR_custom.rsp", Mode::Ctr),
        ];
        for (name, mode) in cases {
            assert_eq!(mode_from_file_name(Path::new(name)).unwrap(), mode, "{name}");
        }
        assert_eq!(mode_from_file_name(Path::new("vectors/aes/CBCMMT128.rsp")).unwrap(), Mode::Cbc);
    }

    #[test]
    fn test_unsupported_prefixes() {
        for name in
            ["CFB1GFSbox128.rsp", "CFB8VarTxt256.rsp", "GCMEncrypt.rsp", "XTSGenAES128.rsp"]
        {
            let result = mode_from_file_name(Path::new(name));
            assert!(matches!(result, Err(CorpusError::Unsupported { .. })), "{name}");
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_corpus_file(Path::new("/nonexistent/ECBGFSbox128.rsp")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
        assert!(err.to_string().contains("ECBGFSbox128.rsp"));
    }
}
