//! codesim: a source-code similarity engine.
//!
//! Given a corpus of tokenized files, codesim finds near-duplicate regions
//! with winnowed k-gram fingerprints, ranks file pairs by similarity and
//! reconstructs the matching source fragments as evidence. The engine is a
//! pure in-memory computation: callers load files, the engine measures; it
//! parses nothing beyond tokens, persists nothing and decides no policy.
//!
//! The stage crates can be used individually; this umbrella crate re-exports
//! them and provides the end-to-end pipeline:
//!
//! ```
//! use codesim::{analyze, AnalysisConfig, File};
//!
//! let files = vec![
//!     File::new(1, "a.c", "int main() { return 0; }"),
//!     File::new(2, "b.c", "int main() { return 1; }"),
//! ];
//! let report = analyze(files, None, &AnalysisConfig::default())?;
//! for pair in report.sorted_pairs(codesim::SortKey::Similarity) {
//!     println!("{} ~ {}: {:.2}", pair.left_file, pair.right_file, pair.similarity);
//! }
//! # Ok::<(), codesim::AnalysisError>(())
//! ```

pub use codesim_fingerprint::{
    fingerprint_tokens, Fingerprint, FingerprintConfig, FingerprintError, WinnowFilter,
};
pub use codesim_index::{
    FileEntry, FingerprintIndex, IndexConfig, IndexError, Occurrence, OccurrencePair,
    SharedFingerprint,
};
pub use codesim_match::{
    Fragment, KgramRange, Pair, Report, ReportConfig, ReportError, SortKey, StudentSummary,
};
pub use codesim_tokenize::{
    tokenize, File, Region, TokenizeError, TokenizedFile,
};

mod config;
pub use config::AnalysisConfig;

use thiserror::Error;
use tracing::{info, warn};

/// Errors from the end-to-end pipeline.
///
/// A single file failing to tokenize is not fatal; it is skipped with a
/// recorded warning. [`AnalysisError::Tokenize`] only occurs when the
/// designated template file itself is unusable.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("template file failed to tokenize: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Run the full pipeline: tokenize, index, derive every pair.
///
/// Files that fail to tokenize are skipped; each is logged and recorded in
/// [`Report::warnings`]. `template` designates a file whose fingerprints are
/// ignored corpus-wide (shared boilerplate such as assignment skeletons).
pub fn analyze(
    files: Vec<File>,
    template: Option<File>,
    cfg: &AnalysisConfig,
) -> Result<Report, AnalysisError> {
    let mut warnings = Vec::new();
    let mut tokenized = Vec::with_capacity(files.len());
    for file in files {
        let id = file.id;
        let path = file.path.clone();
        match tokenize(file) {
            Ok(tf) => tokenized.push(tf),
            Err(err) => {
                warn!(file = id, path = %path, %err, "skipping file that failed to tokenize");
                warnings.push(format!("{path}: {err}"));
            }
        }
    }

    let template = template.map(tokenize).transpose()?;
    let mut report = analyze_tokenized(tokenized, template, cfg)?;
    report.warnings = warnings;
    Ok(report)
}

/// [`analyze`] for callers bringing their own tokenizer: index pre-tokenized
/// files and derive the report.
pub fn analyze_tokenized(
    files: Vec<TokenizedFile>,
    template: Option<TokenizedFile>,
    cfg: &AnalysisConfig,
) -> Result<Report, AnalysisError> {
    cfg.validate()?;

    let mut index = FingerprintIndex::new(cfg.fingerprint.clone(), cfg.index.clone())?;
    if let Some(template) = template {
        index.add_ignored_file(template)?;
    }
    index.add_files(files)?;

    let report = Report::build(&index, &cfg.report)?;
    info!(
        files = report.file_count,
        comparisons = report.comparison_count,
        highest = report.highest_similarity,
        "analysis complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_cfg() -> AnalysisConfig {
        AnalysisConfig {
            fingerprint: FingerprintConfig {
                kgram_length: 2,
                kgrams_in_window: 2,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn analyze_runs_end_to_end() {
        let files = vec![
            File::new(1, "a.py", "for i in range(10):\n    total += i\n"),
            File::new(2, "b.py", "for i in range(10):\n    total += i\n"),
            File::new(3, "c.py", "print('hello world, nothing shared here')\n"),
        ];
        let report = analyze(files, None, &small_cfg()).unwrap();
        assert_eq!(report.file_count, 3);
        assert_eq!(report.comparison_count, 3);
        assert_eq!(report.highest_similarity, 1.0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn unreadable_files_become_warnings_not_errors() {
        let files = vec![
            File::new(1, "a.c", "int a; int b; int c;"),
            File::new(2, "bad.bin", "int a;\u{0} garbage"),
            File::new(3, "c.c", "int a; int b; int d;"),
        ];
        let report = analyze(files, None, &small_cfg()).unwrap();
        assert_eq!(report.file_count, 2);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("bad.bin"));
    }

    #[test]
    fn broken_template_is_fatal() {
        let files = vec![
            File::new(1, "a.c", "int a; int b;"),
            File::new(2, "b.c", "int a; int b;"),
        ];
        let template = File::new(100, "tpl.bin", "\u{0}");
        let err = analyze(files, Some(template), &small_cfg()).unwrap_err();
        assert!(matches!(err, AnalysisError::Tokenize(_)));
    }

    #[test]
    fn invalid_config_is_rejected_before_work() {
        let cfg = AnalysisConfig {
            report: ReportConfig {
                min_similarity: 2.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = analyze_tokenized(Vec::new(), None, &cfg).unwrap_err();
        assert!(matches!(err, AnalysisError::Report(_)));
    }
}
