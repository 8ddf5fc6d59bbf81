use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use codesim_index::FingerprintIndex;

use crate::config::ReportConfig;
use crate::fragment::{build_fragments, Fragment};
use crate::ReportError;

/// Derived similarity view of two indexed files. Canonically ordered:
/// `left_file < right_file` regardless of argument order, so the same two
/// ids always produce an identical pair.
///
/// All counts are in selected k-grams. `left_covered`/`right_covered` count
/// that file's own k-gram positions matched by a shared active fingerprint
/// (a fingerprint duplicated within one file covers every one of its
/// positions); totals and ignored counts come from the file entry's
/// partition. `similarity = (left_covered + right_covered) / (left_total +
/// right_total)`, which is symmetric, lands in [0, 1], is 1 when comparing a
/// file against an exact copy and 0 when nothing active is shared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pair {
    pub left_file: u32,
    pub right_file: u32,
    pub left_covered: usize,
    pub right_covered: usize,
    pub left_total: usize,
    pub right_total: usize,
    pub left_ignored: usize,
    pub right_ignored: usize,
    /// `left_covered + right_covered`.
    pub overlap: usize,
    /// Length in k-grams of the longest contiguous matching run, before any
    /// `min_fragment_length` floor is applied.
    pub longest: usize,
    pub similarity: f64,
    pub fragments: Vec<Fragment>,
}

impl Pair {
    /// Derive the pair for two distinct indexed files. Pure: the index is
    /// only read, and equal inputs always produce an equal pair.
    pub fn build(
        index: &FingerprintIndex,
        a: u32,
        b: u32,
        cfg: &ReportConfig,
    ) -> Result<Self, ReportError> {
        let (left_id, right_id) = if a <= b { (a, b) } else { (b, a) };
        let occ_pairs = index.shared_occurrence_pairs(left_id, right_id)?;
        let left = index.entry(left_id)?;
        let right = index.entry(right_id)?;

        let left_covered = occ_pairs
            .iter()
            .map(|p| p.left.kgram_index)
            .collect::<HashSet<_>>()
            .len();
        let right_covered = occ_pairs
            .iter()
            .map(|p| p.right.kgram_index)
            .collect::<HashSet<_>>()
            .len();

        let left_total = left.active_kgrams();
        let right_total = right.active_kgrams();
        let denominator = left_total + right_total;
        let similarity = if denominator == 0 {
            0.0
        } else {
            (left_covered + right_covered) as f64 / denominator as f64
        };

        let mut fragments = build_fragments(&occ_pairs);
        let longest = fragments.iter().map(Fragment::length).max().unwrap_or(0);
        if cfg.min_fragment_length > 0 {
            fragments.retain(|f| f.length() >= cfg.min_fragment_length);
        }

        Ok(Self {
            left_file: left_id,
            right_file: right_id,
            left_covered,
            right_covered,
            left_total,
            right_total,
            left_ignored: left.ignored_kgrams(),
            right_ignored: right.ignored_kgrams(),
            overlap: left_covered + right_covered,
            longest,
            similarity,
            fragments,
        })
    }
}
