use serde::{Deserialize, Serialize};

use crate::ReportError;

/// Sort order for ranked pair listings, always descending by the metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Similarity,
    TotalOverlap,
    LongestFragment,
}

/// Configuration for pair derivation and reporting.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// configs or passed across process boundaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Fragments shorter than this many k-grams are dropped. 0 disables the
    /// floor.
    #[serde(default)]
    pub min_fragment_length: usize,
    /// Pairs scoring below this similarity are excluded from the report.
    #[serde(default)]
    pub min_similarity: f64,
    /// Compute pairs on a rayon pool. Output is identical to the sequential
    /// path; the index is only read.
    #[serde(default)]
    pub use_parallel: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_fragment_length: 0,
            min_similarity: 0.0,
            use_parallel: false,
        }
    }
}

impl ReportConfig {
    /// Validate the configuration before use.
    pub fn validate(&self) -> Result<(), ReportError> {
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(ReportError::InvalidConfig(format!(
                "min_similarity must be in [0, 1] (got {})",
                self.min_similarity
            )));
        }
        Ok(())
    }
}
