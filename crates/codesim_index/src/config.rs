use serde::{Deserialize, Serialize};

use crate::IndexError;

/// Configuration for the fingerprint index.
///
/// The two caps are mutually exclusive ways of declaring a fingerprint
/// "boilerplate": either an absolute count of distinct files, or a fraction
/// of the indexed corpus resolved to a count at build time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndexConfig {
    /// A fingerprint present in more than this many distinct files is
    /// ignored. `None` disables the cap.
    #[serde(default)]
    pub max_fingerprint_file_count: Option<usize>,
    /// Fractional form of the cap, in (0, 1]; resolved against the number of
    /// indexed files every time files are added.
    #[serde(default)]
    pub max_fingerprint_percentage: Option<f64>,
}

impl IndexConfig {
    /// Validate the configuration before use.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.max_fingerprint_file_count.is_some() && self.max_fingerprint_percentage.is_some() {
            return Err(IndexError::ConflictingCaps);
        }
        if let Some(pct) = self.max_fingerprint_percentage {
            if !(pct > 0.0 && pct <= 1.0) {
                return Err(IndexError::InvalidPercentage { pct });
            }
        }
        Ok(())
    }
}
