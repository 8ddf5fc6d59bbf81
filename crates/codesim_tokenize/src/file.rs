use serde::{Deserialize, Serialize};

use crate::region::Region;
use crate::TokenizeError;

/// A corpus file with caller-supplied stable identity.
///
/// Ids come from the corpus loader; the engine never allocates them. Two
/// files with the same id are the same file as far as the index is concerned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct File {
    /// Stable numeric id, unique within one analysis.
    pub id: u32,
    /// Display path; not interpreted by the engine.
    pub path: String,
    /// Raw content. Only used to derive the line count for display.
    pub content: String,
}

impl File {
    pub fn new(id: u32, path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
            content: content.into(),
        }
    }

    /// Number of lines in the raw content, for display purposes only.
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// A file together with its ordered token stream and token-to-source mapping.
///
/// Invariant: `mapping.len() == tokens.len()`. Token indices are the unit in
/// which k-gram boundaries are expressed downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenizedFile {
    pub file: File,
    pub tokens: Vec<String>,
    pub mapping: Vec<Region>,
}

impl TokenizedFile {
    /// Bundle a file with its token stream, enforcing the mapping invariant.
    pub fn new(
        file: File,
        tokens: Vec<String>,
        mapping: Vec<Region>,
    ) -> Result<Self, TokenizeError> {
        if tokens.len() != mapping.len() {
            return Err(TokenizeError::MappingLengthMismatch {
                tokens: tokens.len(),
                mapping: mapping.len(),
            });
        }
        Ok(Self {
            file,
            tokens,
            mapping,
        })
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Merged source region for the k-gram spanning token indices
    /// `start..=stop` (the union of the two boundary tokens' regions).
    pub fn kgram_region(&self, start: usize, stop: usize) -> Region {
        self.mapping[start].merge(&self.mapping[stop])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_mapping_is_rejected() {
        let file = File::new(1, "a.c", "int x;");
        let err = TokenizedFile::new(
            file,
            vec!["int".into(), "x".into()],
            vec![Region::new(0, 0, 0, 3)],
        )
        .expect_err("mapping shorter than tokens must fail");
        match err {
            TokenizeError::MappingLengthMismatch { tokens, mapping } => {
                assert_eq!((tokens, mapping), (2, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn kgram_region_merges_boundary_tokens() {
        let file = File::new(1, "a.c", "int x = 0;");
        let tf = TokenizedFile::new(
            file,
            vec!["int".into(), "x".into(), "=".into()],
            vec![
                Region::new(0, 0, 0, 3),
                Region::new(0, 4, 0, 5),
                Region::new(0, 6, 0, 7),
            ],
        )
        .unwrap();
        assert_eq!(tf.kgram_region(0, 2), Region::new(0, 0, 0, 7));
    }
}
