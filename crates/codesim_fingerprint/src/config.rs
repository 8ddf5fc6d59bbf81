//! Configuration and error types for the fingerprinting stage.
//!
//! The fingerprint pipeline is a pure function of `(tokens, config)`: no
//! I/O, no environment-dependent behavior, no hidden global state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the fingerprinting stage (k-gram hashing + winnowing).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// Configuration schema version. Any algorithmic change that can affect
    /// which fingerprints are selected must bump this version.
    pub version: u32,
    /// Number of tokens per k-gram.
    ///
    /// Larger values are harder to defeat with small edits but raise the
    /// minimum detectable match length.
    pub kgram_length: usize,
    /// Winnowing window size, in consecutive k-gram positions.
    ///
    /// Every window of this many k-grams contributes at least one selected
    /// fingerprint, which bounds both index size and the shortest match the
    /// engine is guaranteed to detect.
    pub kgrams_in_window: usize,
    /// Seed for token hashing and the rolling-hash base. Two equal configs
    /// produce bit-identical fingerprints for equal token streams.
    pub seed: u64,
    /// Carry the literal token slice on each selected fingerprint, for
    /// rendering matched evidence. Selection itself never depends on this.
    pub include_token_data: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            version: 1,
            kgram_length: 23,
            kgrams_in_window: 17,
            seed: 0x5EED_C0DE_5EED_C0DE,
            include_token_data: false,
        }
    }
}

impl FingerprintConfig {
    /// Validate the configuration before use.
    pub fn validate(&self) -> Result<(), FingerprintError> {
        if self.version == 0 {
            return Err(FingerprintError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.kgram_length == 0 {
            return Err(FingerprintError::InvalidKgramLength {
                kgram_length: self.kgram_length,
            });
        }
        if self.kgrams_in_window == 0 {
            return Err(FingerprintError::InvalidWindow {
                kgrams_in_window: self.kgrams_in_window,
            });
        }
        Ok(())
    }

    /// Minimum token count below which a file yields zero fingerprints.
    ///
    /// Shorter files are not an error; they simply contribute nothing to the
    /// index.
    pub fn min_tokens(&self) -> usize {
        self.kgram_length + self.kgrams_in_window - 1
    }
}

/// Errors returned by the fingerprinting stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("invalid config: kgram_length must be >= 1 (got {kgram_length})")]
    InvalidKgramLength { kgram_length: usize },

    #[error("invalid config: kgrams_in_window must be >= 1 (got {kgrams_in_window})")]
    InvalidWindow { kgrams_in_window: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
}
