use serde::{Deserialize, Serialize};

use codesim_fingerprint::FingerprintConfig;
use codesim_index::IndexConfig;
use codesim_match::ReportConfig;

use crate::AnalysisError;

/// End-to-end analysis configuration, one section per pipeline stage.
///
/// The defaults reproduce the standard engine parameters (k-gram length 23,
/// window 17, no fingerprint caps, no similarity floor) and are suitable for
/// most corpora.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub fingerprint: FingerprintConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl AnalysisConfig {
    /// Validate every stage section before any work starts.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.fingerprint.validate()?;
        self.index.validate()?;
        self.report.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn stage_errors_surface() {
        let cfg = AnalysisConfig {
            fingerprint: FingerprintConfig {
                kgram_length: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(AnalysisError::Fingerprint(_))
        ));
    }

    #[test]
    fn deserializes_from_partial_json() {
        let cfg: AnalysisConfig = serde_json::from_str(
            r#"{ "report": { "min_similarity": 0.25 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.report.min_similarity, 0.25);
        assert_eq!(cfg.fingerprint.kgram_length, 23);
        assert_eq!(cfg.fingerprint.kgrams_in_window, 17);
    }
}
