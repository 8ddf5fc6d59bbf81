use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info};

use codesim_fingerprint::{fingerprint_tokens, FingerprintConfig};
use codesim_tokenize::TokenizedFile;

use crate::config::IndexConfig;
use crate::entry::FileEntry;
use crate::shared::{Occurrence, SharedFingerprint};
use crate::IndexError;

/// A matched occurrence pair: one shared, active fingerprint seen in two
/// files. The unit the fragment builder consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrencePair {
    pub hash: u64,
    pub left: Occurrence,
    pub right: Occurrence,
}

/// The inverted fingerprint index: hash → [`SharedFingerprint`], plus one
/// [`FileEntry`] per indexed file.
///
/// The index has two phases. During **build**, files, the template file and
/// manual ignores may be added and the file-count cap may change. During
/// **query**, occurrence pairs and per-file statistics are read; queries are
/// pure and the index is safe to share read-only across threads.
#[derive(Debug)]
pub struct FingerprintIndex {
    fingerprint_cfg: FingerprintConfig,
    cfg: IndexConfig,
    entries: BTreeMap<u32, FileEntry>,
    shared: HashMap<u64, SharedFingerprint>,
    manual_ignores: HashSet<u64>,
    /// Effective cap after percentage resolution.
    max_file_count: Option<usize>,
}

impl FingerprintIndex {
    pub fn new(fingerprint_cfg: FingerprintConfig, cfg: IndexConfig) -> Result<Self, IndexError> {
        fingerprint_cfg.validate()?;
        cfg.validate()?;
        let max_file_count = cfg.max_fingerprint_file_count;
        Ok(Self {
            fingerprint_cfg,
            cfg,
            entries: BTreeMap::new(),
            shared: HashMap::new(),
            manual_ignores: HashSet::new(),
            max_file_count,
        })
    }

    pub fn fingerprint_config(&self) -> &FingerprintConfig {
        &self.fingerprint_cfg
    }

    /// Current effective file-count cap, if any.
    pub fn max_fingerprint_file_count(&self) -> Option<usize> {
        self.max_file_count
    }

    /// Index a batch of tokenized files.
    ///
    /// Re-adding an id that is already present (file or template) is a
    /// caller bug and fails with [`IndexError::DuplicateFile`] before any
    /// file of the batch is inserted.
    pub fn add_files(&mut self, files: Vec<TokenizedFile>) -> Result<(), IndexError> {
        let mut batch_ids = HashSet::new();
        for tf in &files {
            if self.entries.contains_key(&tf.file.id) || !batch_ids.insert(tf.file.id) {
                return Err(IndexError::DuplicateFile {
                    id: tf.file.id,
                    path: tf.file.path.clone(),
                });
            }
        }

        let count = files.len();
        for tf in files {
            self.insert_file(tf, false)?;
        }
        info!(files = count, total = self.file_count(), "indexed file batch");

        self.resolve_percentage_cap();
        Ok(())
    }

    /// Index the designated template file: its fingerprints are inserted
    /// through the normal path but immediately marked ignored, and the
    /// ignore propagates to every other file sharing them.
    pub fn add_ignored_file(&mut self, file: TokenizedFile) -> Result<(), IndexError> {
        if self.entries.contains_key(&file.file.id) {
            return Err(IndexError::DuplicateFile {
                id: file.file.id,
                path: file.file.path.clone(),
            });
        }
        self.insert_file(file, true)
    }

    /// Manually blacklist fingerprint hashes, existing and future.
    pub fn add_ignored_hashes(&mut self, hashes: impl IntoIterator<Item = u64>) {
        for hash in hashes {
            self.manual_ignores.insert(hash);
            if let Some(sf) = self.shared.get_mut(&hash) {
                sf.set_sticky();
                if !sf.is_ignored() {
                    sf.set_ignored(true);
                    let owners: Vec<u32> = sf.file_ids().collect();
                    for id in owners {
                        if let Some(entry) = self.entries.get_mut(&id) {
                            entry.migrate(hash, true);
                        }
                    }
                }
            }
        }
    }

    /// Change the file-count cap and migrate every non-sticky fingerprint
    /// whose ignored state flips under the new threshold. No-op when the
    /// value is unchanged. Raising the cap can only move fingerprints
    /// ignored → active; lowering it only active → ignored.
    pub fn update_max_fingerprint_file_count(&mut self, max: Option<usize>) {
        if max == self.max_file_count {
            return;
        }
        self.max_file_count = max;

        let Self {
            shared, entries, ..
        } = self;
        let mut migrated = 0usize;
        for sf in shared.values_mut() {
            if sf.is_sticky() {
                continue;
            }
            let should_ignore = max.is_some_and(|m| sf.file_count() > m);
            if should_ignore == sf.is_ignored() {
                continue;
            }
            sf.set_ignored(should_ignore);
            migrated += 1;
            let hash = sf.hash();
            for id in sf.file_ids() {
                if let Some(entry) = entries.get_mut(&id) {
                    entry.migrate(hash, should_ignore);
                }
            }
        }
        debug!(?max, migrated, "re-evaluated fingerprint file-count cap");
    }

    /// Entry for an indexed file (template included).
    pub fn entry(&self, file_id: u32) -> Result<&FileEntry, IndexError> {
        self.entries
            .get(&file_id)
            .ok_or(IndexError::UnknownFile { id: file_id })
    }

    /// Ids of comparable (non-template) files, ascending.
    pub fn file_ids(&self) -> Vec<u32> {
        self.entries
            .values()
            .filter(|e| !e.is_template())
            .map(FileEntry::id)
            .collect()
    }

    /// Number of comparable (non-template) files.
    pub fn file_count(&self) -> usize {
        self.entries.values().filter(|e| !e.is_template()).count()
    }

    pub fn fingerprint(&self, hash: u64) -> Option<&SharedFingerprint> {
        self.shared.get(&hash)
    }

    /// All occurrence pairs for the shared, active fingerprints of two
    /// distinct indexed files, ordered by (left, right) k-gram index.
    ///
    /// A fingerprint duplicated within one file contributes one pair per
    /// left/right occurrence combination.
    pub fn shared_occurrence_pairs(
        &self,
        left_id: u32,
        right_id: u32,
    ) -> Result<Vec<OccurrencePair>, IndexError> {
        if left_id == right_id {
            return Err(IndexError::SameFile { id: left_id });
        }
        let left = self.entry(left_id)?;
        let right = self.entry(right_id)?;

        // Iterate the smaller active set.
        let (probe, other) = if left.shared_hashes().len() <= right.shared_hashes().len() {
            (left.shared_hashes(), right.shared_hashes())
        } else {
            (right.shared_hashes(), left.shared_hashes())
        };

        let mut pairs = Vec::new();
        for &hash in probe {
            if !other.contains(&hash) {
                continue;
            }
            let sf = match self.shared.get(&hash) {
                Some(sf) if !sf.is_ignored() => sf,
                _ => continue,
            };
            for l in sf.occurrences_in(left_id) {
                for r in sf.occurrences_in(right_id) {
                    pairs.push(OccurrencePair {
                        hash,
                        left: l.clone(),
                        right: r.clone(),
                    });
                }
            }
        }
        pairs.sort_by_key(|p| (p.left.kgram_index, p.right.kgram_index));
        Ok(pairs)
    }

    fn insert_file(&mut self, tf: TokenizedFile, is_template: bool) -> Result<(), IndexError> {
        let selected = fingerprint_tokens(&tf.tokens, &self.fingerprint_cfg)?;
        debug!(
            file = tf.file.id,
            path = %tf.file.path,
            tokens = tf.token_count(),
            fingerprints = selected.len(),
            is_template,
            "fingerprinted file"
        );

        let mut entry = FileEntry::new(tf.file.clone(), tf.token_count(), is_template);
        let file_id = tf.file.id;

        for (kgram_index, fp) in selected.into_iter().enumerate() {
            let occ = Occurrence {
                file_id,
                kgram_index,
                start: fp.start,
                stop: fp.stop,
                region: tf.kgram_region(fp.start, fp.stop),
                data: fp.data,
            };

            let manual = self.manual_ignores.contains(&fp.hash);
            let sf = self
                .shared
                .entry(fp.hash)
                .or_insert_with(|| SharedFingerprint::new(fp.hash, manual, manual));
            sf.push_occurrence(occ);

            if is_template && !sf.is_sticky() {
                sf.set_sticky();
                if !sf.is_ignored() {
                    sf.set_ignored(true);
                    // Propagate to every earlier owner.
                    let hash = sf.hash();
                    for id in sf.file_ids().collect::<Vec<_>>() {
                        if let Some(other) = self.entries.get_mut(&id) {
                            other.migrate(hash, true);
                        }
                    }
                }
            }

            entry.push_kgram(fp.hash, self.shared[&fp.hash].is_ignored());
        }

        self.entries.insert(file_id, entry);

        if !is_template {
            self.apply_cap_to_new_overflows(file_id);
        }
        Ok(())
    }

    /// After inserting a file, any fingerprint it pushed over the cap flips
    /// to ignored for all owners.
    fn apply_cap_to_new_overflows(&mut self, file_id: u32) {
        let Some(max) = self.max_file_count else {
            return;
        };
        let hashes: Vec<u64> = {
            let entry = &self.entries[&file_id];
            entry
                .shared_hashes()
                .iter()
                .chain(entry.ignored_hashes())
                .copied()
                .collect()
        };
        let Self {
            shared, entries, ..
        } = self;
        for hash in hashes {
            let Some(sf) = shared.get_mut(&hash) else {
                continue;
            };
            if sf.is_sticky() || sf.is_ignored() || sf.file_count() <= max {
                continue;
            }
            sf.set_ignored(true);
            for id in sf.file_ids() {
                if let Some(entry) = entries.get_mut(&id) {
                    entry.migrate(hash, true);
                }
            }
        }
    }

    /// Resolve the percentage cap against the current corpus size.
    fn resolve_percentage_cap(&mut self) {
        if let Some(pct) = self.cfg.max_fingerprint_percentage {
            let resolved = ((pct * self.file_count() as f64).ceil() as usize).max(1);
            self.update_max_fingerprint_file_count(Some(resolved));
        }
    }
}
