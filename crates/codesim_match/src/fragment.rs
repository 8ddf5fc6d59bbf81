//! Fragment reconstruction: turning the flat, ordered list of paired
//! fingerprint occurrences for one file pair back into maximal contiguous
//! matched source regions.
//!
//! Two paired occurrences are adjacent when their k-gram indices are each
//! exactly one more than the previous pair's, on both sides simultaneously.
//! Runs of adjacent pairs become one fragment with merged source regions;
//! after building, fragments whose (left, right) k-gram ranges are both
//! contained in another fragment's are squashed away as sub-matches.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use codesim_index::OccurrencePair;
use codesim_tokenize::Region;

/// Inclusive range of k-gram indices on one side of a fragment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct KgramRange {
    pub start: usize,
    pub stop: usize,
}

#[allow(clippy::len_without_is_empty)]
impl KgramRange {
    fn single(index: usize) -> Self {
        Self {
            start: index,
            stop: index,
        }
    }

    /// Number of k-grams covered. Always at least one; the range is
    /// inclusive on both ends.
    pub fn len(&self) -> usize {
        self.stop - self.start + 1
    }

    /// Whether `other` lies fully inside this range.
    pub fn contains(&self, other: &KgramRange) -> bool {
        self.start <= other.start && other.stop <= self.stop
    }
}

/// A maximal contiguous run of paired occurrences between two files.
///
/// `left_selection`/`right_selection` are the merged source regions of every
/// constituent occurrence, 0-indexed. `data`, present only when token data
/// was recorded at fingerprint time, is the left file's matched token
/// sequence; a `"..."` entry marks tokens the winnowed k-grams skipped over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fragment {
    pub left_kgrams: KgramRange,
    pub right_kgrams: KgramRange,
    pub left_selection: Region,
    pub right_selection: Region,
    pub data: Option<Vec<String>>,
}

impl Fragment {
    /// Fragment length in k-grams. Both sides extend in lockstep, so the two
    /// ranges always have the same length.
    pub fn length(&self) -> usize {
        self.left_kgrams.len()
    }

    fn open(pair: &OccurrencePair) -> Self {
        Self {
            left_kgrams: KgramRange::single(pair.left.kgram_index),
            right_kgrams: KgramRange::single(pair.right.kgram_index),
            left_selection: pair.left.region,
            right_selection: pair.right.region,
            data: pair.left.data.clone(),
        }
    }

    fn extend(&mut self, pair: &OccurrencePair, prev_left_stop: usize) {
        self.left_kgrams.stop = pair.left.kgram_index;
        self.right_kgrams.stop = pair.right.kgram_index;
        self.left_selection = self.left_selection.merge(&pair.left.region);
        self.right_selection = self.right_selection.merge(&pair.right.region);

        if let (Some(data), Some(occ_data)) = (&mut self.data, &pair.left.data) {
            if pair.left.start > prev_left_stop + 1 {
                // The next k-gram starts past the tokens we already have;
                // whatever lay between was not selected and cannot be
                // reconstructed.
                data.push("...".to_string());
                data.extend(occ_data.iter().cloned());
            } else {
                let overlap = prev_left_stop + 1 - pair.left.start;
                data.extend(occ_data.iter().skip(overlap).cloned());
            }
        }
    }
}

/// Build the squashed fragment list from occurrence pairs ordered by
/// (left, right) k-gram index, as produced by the index.
pub(crate) fn build_fragments(pairs: &[OccurrencePair]) -> Vec<Fragment> {
    let mut fragments: Vec<Fragment> = Vec::new();
    // Token stop of the last occurrence appended to each fragment's left
    // side, needed for token-data gap detection.
    let mut left_stops: Vec<usize> = Vec::new();
    // (left, right) k-gram end → index of the fragment ending there.
    let mut by_end: HashMap<(usize, usize), usize> = HashMap::new();

    for pair in pairs {
        let li = pair.left.kgram_index;
        let ri = pair.right.kgram_index;
        let open = (li > 0 && ri > 0)
            .then(|| by_end.remove(&(li - 1, ri - 1)))
            .flatten();
        match open {
            Some(idx) => {
                let prev_stop = left_stops[idx];
                fragments[idx].extend(pair, prev_stop);
                left_stops[idx] = pair.left.stop;
                by_end.insert((li, ri), idx);
            }
            None => {
                by_end.insert((li, ri), fragments.len());
                left_stops.push(pair.left.stop);
                fragments.push(Fragment::open(pair));
            }
        }
    }

    squash(fragments)
}

/// Drop every fragment whose left and right ranges are both contained in
/// another fragment's. Distinct fragments never share both ranges exactly,
/// so containment here is always proper on at least one side.
fn squash(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let keep: Vec<bool> = fragments
        .iter()
        .enumerate()
        .map(|(i, f)| {
            !fragments.iter().enumerate().any(|(j, g)| {
                j != i
                    && g.left_kgrams.contains(&f.left_kgrams)
                    && g.right_kgrams.contains(&f.right_kgrams)
            })
        })
        .collect();
    fragments
        .into_iter()
        .zip(keep)
        .filter_map(|(f, k)| k.then_some(f))
        .collect()
}
