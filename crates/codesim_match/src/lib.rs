//! codesim_match: pair similarity, fragment reconstruction and corpus-level
//! reporting.
//!
//! Everything here is a pure derivation over a built
//! [`FingerprintIndex`](codesim_index::FingerprintIndex): a [`Pair`] is the
//! similarity view of two files, a [`Fragment`] a maximal contiguous matched
//! region within one pair, and a [`Report`] the ranked aggregate over every
//! pair in the corpus. Because the index is read-only during derivation, the
//! pair loop can optionally run on rayon with no synchronization.

mod config;
mod fragment;
mod pair;
mod report;

pub use config::{ReportConfig, SortKey};
pub use fragment::{Fragment, KgramRange};
pub use pair::Pair;
pub use report::{Report, StudentSummary};

use thiserror::Error;

/// Errors produced while deriving pairs and reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A report needs at least two comparable files.
    #[error("need at least two comparable files in the index (got {found})")]
    InsufficientCorpus { found: usize },

    /// Invalid report configuration.
    #[error("invalid report configuration: {0}")]
    InvalidConfig(String),

    /// The underlying index query failed.
    #[error(transparent)]
    Index(#[from] codesim_index::IndexError),
}
