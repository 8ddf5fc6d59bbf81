use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use codesim_index::FingerprintIndex;

use crate::config::{ReportConfig, SortKey};
use crate::pair::Pair;
use crate::ReportError;

/// Per-submission rollup, a pure projection over the pair list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentSummary {
    pub submission_id: u32,
    /// `1 - highest_similarity`.
    pub originality_score: f64,
    pub highest_similarity: f64,
    pub total_pairs: usize,
    /// Pairs above the caller-supplied suspicion threshold.
    pub suspicious_pairs: usize,
    /// Partner of the highest-similarity pair; `None` when the submission
    /// has no pairs at all.
    pub highest_match_with: Option<u32>,
}

/// Corpus-level result: every derived pair plus aggregate statistics.
///
/// The report holds all computed pairs; the `min_similarity` threshold from
/// [`ReportConfig`] is a view filter applied by [`Report::pairs`] and
/// [`Report::sorted_pairs`], never by construction, so aggregate statistics
/// and student summaries always reflect the full comparison set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    cfg: ReportConfig,
    pairs: Vec<Pair>,
    pub file_count: usize,
    pub comparison_count: usize,
    pub average_similarity: f64,
    pub highest_similarity: f64,
    /// Non-fatal problems recorded upstream, typically files that failed to
    /// tokenize and were excluded from the corpus.
    pub warnings: Vec<String>,
}

impl Report {
    /// Derive every pair of comparable files in the index.
    ///
    /// Fails with [`ReportError::InsufficientCorpus`] when fewer than two
    /// comparable files are indexed. With `use_parallel` set the pair loop
    /// runs on the rayon pool; the index is shared read-only and the result
    /// is identical to the sequential path.
    pub fn build(index: &FingerprintIndex, cfg: &ReportConfig) -> Result<Self, ReportError> {
        cfg.validate()?;
        let ids = index.file_ids();
        if ids.len() < 2 {
            return Err(ReportError::InsufficientCorpus { found: ids.len() });
        }

        let mut combos = Vec::with_capacity(ids.len() * (ids.len() - 1) / 2);
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                combos.push((a, b));
            }
        }

        let pairs: Vec<Pair> = if cfg.use_parallel {
            combos
                .par_iter()
                .map(|&(a, b)| Pair::build(index, a, b, cfg))
                .collect::<Result<_, _>>()?
        } else {
            combos
                .iter()
                .map(|&(a, b)| Pair::build(index, a, b, cfg))
                .collect::<Result<_, _>>()?
        };

        let comparison_count = pairs.len();
        let highest_similarity = pairs.iter().map(|p| p.similarity).fold(0.0, f64::max);
        let average_similarity = if comparison_count == 0 {
            0.0
        } else {
            pairs.iter().map(|p| p.similarity).sum::<f64>() / comparison_count as f64
        };

        info!(
            files = ids.len(),
            comparisons = comparison_count,
            highest = highest_similarity,
            parallel = cfg.use_parallel,
            "derived pair report"
        );

        Ok(Self {
            cfg: cfg.clone(),
            pairs,
            file_count: ids.len(),
            comparison_count,
            average_similarity,
            highest_similarity,
            warnings: Vec::new(),
        })
    }

    /// Every computed pair, in canonical (left, right) id order, ignoring
    /// the `min_similarity` filter.
    pub fn all_pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Pairs at or above the configured `min_similarity`, in canonical order.
    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.pairs
            .iter()
            .filter(move |p| p.similarity >= self.cfg.min_similarity)
    }

    /// Filtered pairs, descending by the given metric. Ties fall back to
    /// ascending (left, right) id so the order is total and deterministic.
    pub fn sorted_pairs(&self, key: SortKey) -> Vec<&Pair> {
        let mut out: Vec<&Pair> = self.pairs().collect();
        out.sort_by(|a, b| {
            let by_metric = match key {
                SortKey::Similarity => b.similarity.total_cmp(&a.similarity),
                SortKey::TotalOverlap => b.overlap.cmp(&a.overlap),
                SortKey::LongestFragment => b.longest.cmp(&a.longest),
            };
            by_metric.then_with(|| (a.left_file, a.right_file).cmp(&(b.left_file, b.right_file)))
        });
        out
    }

    /// Per-submission rollups over the full (unfiltered) pair list, in
    /// ascending submission-id order. `suspicion_threshold` is the policy
    /// line above which a pair counts as suspicious.
    pub fn student_summaries(&self, suspicion_threshold: f64) -> Vec<StudentSummary> {
        let ids: BTreeSet<u32> = self
            .pairs
            .iter()
            .flat_map(|p| [p.left_file, p.right_file])
            .collect();

        ids.into_iter()
            .map(|id| {
                let mut highest_similarity = 0.0f64;
                let mut highest_match_with = None;
                let mut total_pairs = 0;
                let mut suspicious_pairs = 0;
                for p in &self.pairs {
                    let partner = match (p.left_file == id, p.right_file == id) {
                        (true, _) => p.right_file,
                        (_, true) => p.left_file,
                        _ => continue,
                    };
                    total_pairs += 1;
                    if p.similarity > suspicion_threshold {
                        suspicious_pairs += 1;
                    }
                    if highest_match_with.is_none() || p.similarity > highest_similarity {
                        highest_similarity = p.similarity;
                        highest_match_with = Some(partner);
                    }
                }
                StudentSummary {
                    submission_id: id,
                    originality_score: 1.0 - highest_similarity,
                    highest_similarity,
                    total_pairs,
                    suspicious_pairs,
                    highest_match_with,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesim_fingerprint::FingerprintConfig;
    use codesim_index::IndexConfig;
    use codesim_tokenize::{tokenize, File};

    fn small_index(files: &[(u32, &str)]) -> FingerprintIndex {
        let cfg = FingerprintConfig {
            kgram_length: 1,
            kgrams_in_window: 1,
            ..Default::default()
        };
        let mut idx = FingerprintIndex::new(cfg, IndexConfig::default()).unwrap();
        idx.add_files(
            files
                .iter()
                .map(|&(id, content)| tokenize(File::new(id, format!("f{id}.c"), content)).unwrap())
                .collect(),
        )
        .unwrap();
        idx
    }

    #[test]
    fn insufficient_corpus_is_rejected() {
        let idx = small_index(&[(1, "a b c")]);
        let err = Report::build(&idx, &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ReportError::InsufficientCorpus { found: 1 }));
    }

    #[test]
    fn all_pairs_are_derived() {
        let idx = small_index(&[(1, "a b"), (2, "a c"), (3, "d e")]);
        let report = Report::build(&idx, &ReportConfig::default()).unwrap();
        assert_eq!(report.file_count, 3);
        assert_eq!(report.comparison_count, 3);
        assert_eq!(report.all_pairs().len(), 3);
    }

    #[test]
    fn parallel_matches_sequential() {
        let files: Vec<(u32, String)> = (1..=6)
            .map(|i| (i, format!("shared tokens everywhere plus unique{i}")))
            .collect();
        let refs: Vec<(u32, &str)> = files.iter().map(|(i, s)| (*i, s.as_str())).collect();
        let idx = small_index(&refs);

        let seq = Report::build(&idx, &ReportConfig::default()).unwrap();
        let par = Report::build(
            &idx,
            &ReportConfig {
                use_parallel: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(seq.all_pairs(), par.all_pairs());
        assert_eq!(seq.highest_similarity, par.highest_similarity);
    }

    #[test]
    fn min_similarity_filters_views_not_statistics() {
        let idx = small_index(&[(1, "a b c d"), (2, "a b c d"), (3, "x y z w")]);
        let cfg = ReportConfig {
            min_similarity: 0.5,
            ..Default::default()
        };
        let report = Report::build(&idx, &cfg).unwrap();
        assert_eq!(report.comparison_count, 3);
        assert_eq!(report.pairs().count(), 1);
        assert_eq!(report.all_pairs().len(), 3);
    }

    #[test]
    fn sorting_is_descending_with_stable_ties() {
        let idx = small_index(&[(1, "a b c d"), (2, "a b c d"), (3, "a x y z")]);
        let report = Report::build(&idx, &ReportConfig::default()).unwrap();
        let sorted = report.sorted_pairs(SortKey::Similarity);
        assert_eq!(sorted[0].left_file, 1);
        assert_eq!(sorted[0].right_file, 2);
        assert!(sorted
            .windows(2)
            .all(|w| w[0].similarity >= w[1].similarity));
        // the two 1-3 / 2-3 pairs tie; canonical id order breaks it
        assert_eq!(
            (sorted[1].left_file, sorted[1].right_file),
            (1, 3)
        );
    }

    #[test]
    fn student_summaries_report_originality_and_partner() {
        // 1 and 2 are near-copies; 3 barely overlaps either.
        let idx = small_index(&[
            (1, "a b c d e"),
            (2, "a b c d x"),
            (3, "a q r s t"),
        ]);
        let report = Report::build(&idx, &ReportConfig::default()).unwrap();
        let summaries = report.student_summaries(0.5);

        let s1 = &summaries[0];
        assert_eq!(s1.submission_id, 1);
        assert_eq!(s1.total_pairs, 2);
        assert_eq!(s1.highest_match_with, Some(2));
        assert_eq!(s1.suspicious_pairs, 1);
        assert!((s1.originality_score - (1.0 - s1.highest_similarity)).abs() < 1e-12);

        let s3 = &summaries[2];
        assert_eq!(s3.submission_id, 3);
        assert!(s3.highest_similarity < 0.5);
        assert_eq!(s3.suspicious_pairs, 0);
        assert!(s3.originality_score > 0.5);
    }

    #[test]
    fn zero_similarity_pairs_still_have_a_partner() {
        let idx = small_index(&[(1, "a b"), (2, "c d")]);
        let report = Report::build(&idx, &ReportConfig::default()).unwrap();
        let summaries = report.student_summaries(0.5);
        // zero-similarity pairs still count as pairs; the partner is the
        // first in canonical order
        assert_eq!(summaries[0].total_pairs, 1);
        assert_eq!(summaries[0].highest_match_with, Some(2));
        assert_eq!(summaries[0].originality_score, 1.0);
    }
}
