//! codesim_index: the inverted fingerprint index.
//!
//! Maps every winnowed fingerprint hash to the set of files and k-gram
//! occurrences carrying it, and keeps a per-file active/ignored partition of
//! owned fingerprints. Three mechanisms mark a fingerprint ignored:
//!
//! - it originates from the designated **template** file,
//! - its hash is on the caller's **manual** ignore list,
//! - it occurs in more distinct files than the configured cap
//!   (boilerplate detection; the cap may also be given as a fraction of the
//!   corpus).
//!
//! Template and manual ignores are sticky. The file-count cap is dynamic:
//! [`FingerprintIndex::update_max_fingerprint_file_count`] migrates affected
//! fingerprints between each owner's partitions in place instead of
//! rebuilding the index.

mod config;
mod entry;
mod index;
mod shared;

pub use config::IndexConfig;
pub use entry::FileEntry;
pub use index::{FingerprintIndex, OccurrencePair};
pub use shared::{Occurrence, SharedFingerprint};

use thiserror::Error;

/// Errors produced by the fingerprint index.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndexError {
    /// A file with this id was already added; re-adding is a caller bug.
    #[error("file {id} ({path}) was already indexed")]
    DuplicateFile { id: u32, path: String },

    /// The queried file was never indexed.
    #[error("file {id} is not in the index")]
    UnknownFile { id: u32 },

    /// A pair requires two distinct files.
    #[error("cannot pair file {id} with itself")]
    SameFile { id: u32 },

    /// `max_fingerprint_file_count` and `max_fingerprint_percentage` are
    /// mutually exclusive.
    #[error("max_fingerprint_file_count and max_fingerprint_percentage are mutually exclusive")]
    ConflictingCaps,

    /// The percentage cap must lie in (0, 1].
    #[error("max_fingerprint_percentage must be in (0, 1] (got {pct})")]
    InvalidPercentage { pct: f64 },

    /// Invalid fingerprint-stage configuration.
    #[error(transparent)]
    Fingerprint(#[from] codesim_fingerprint::FingerprintError),
}
