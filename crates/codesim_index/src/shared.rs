use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use codesim_tokenize::Region;

/// One side of a potential match: a selected k-gram occurrence in one file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Occurrence {
    /// Owning file.
    pub file_id: u32,
    /// Ordinal position of this k-gram among the file's selected k-grams.
    /// Strictly increasing in token order; the unit for adjacency tests.
    pub kgram_index: usize,
    /// Token index of the first token in the k-gram.
    pub start: usize,
    /// Token index of the last token in the k-gram (inclusive).
    pub stop: usize,
    /// Merged source region of the k-gram's boundary tokens.
    pub region: Region,
    /// Literal token slice when token data was requested at fingerprint time.
    pub data: Option<Vec<String>>,
}

/// A fingerprint value and every place it occurs across the corpus.
///
/// Ignored state is mutable: a fingerprint flips to ignored when it comes
/// from the template file, is manually blacklisted, or spreads over more
/// distinct files than the configured cap. Template and manual ignores are
/// sticky; threshold changes never resurrect them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharedFingerprint {
    hash: u64,
    ignored: bool,
    sticky: bool,
    /// File id → occurrences of this hash in that file, in k-gram order.
    occurrences: BTreeMap<u32, Vec<Occurrence>>,
}

impl SharedFingerprint {
    pub(crate) fn new(hash: u64, ignored: bool, sticky: bool) -> Self {
        Self {
            hash,
            ignored,
            sticky,
            occurrences: BTreeMap::new(),
        }
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Sticky fingerprints (template/manual) ignore threshold updates.
    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    /// Number of distinct files containing this fingerprint.
    pub fn file_count(&self) -> usize {
        self.occurrences.len()
    }

    /// Ids of the files containing this fingerprint, ascending.
    pub fn file_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.occurrences.keys().copied()
    }

    /// Occurrences of this fingerprint within one file, in k-gram order.
    pub fn occurrences_in(&self, file_id: u32) -> &[Occurrence] {
        self.occurrences.get(&file_id).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn push_occurrence(&mut self, occ: Occurrence) {
        self.occurrences.entry(occ.file_id).or_default().push(occ);
    }

    pub(crate) fn set_ignored(&mut self, ignored: bool) {
        self.ignored = ignored;
    }

    pub(crate) fn set_sticky(&mut self) {
        self.sticky = true;
    }
}
