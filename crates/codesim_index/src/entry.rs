use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use codesim_tokenize::File;

/// Per-file view of the index: which fingerprints the file owns and how they
/// are partitioned between `shared` (active, comparable) and `ignored`.
///
/// Entries are created once at index-build time and afterwards mutated only
/// through ignore/un-ignore migrations driven by the index; the partition
/// invariant (`shared ∪ ignored` covers exactly the hashes in
/// `kgram_hashes`, disjointly) holds at all times.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileEntry {
    file: File,
    token_count: usize,
    is_template: bool,
    /// Hash of each selected k-gram, by ordinal k-gram index.
    kgram_hashes: Vec<u64>,
    /// Hashes whose fingerprints are active.
    shared: HashSet<u64>,
    /// Hashes whose fingerprints are ignored.
    ignored: HashSet<u64>,
}

impl FileEntry {
    pub(crate) fn new(file: File, token_count: usize, is_template: bool) -> Self {
        Self {
            file,
            token_count,
            is_template,
            kgram_hashes: Vec::new(),
            shared: HashSet::new(),
            ignored: HashSet::new(),
        }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn id(&self) -> u32 {
        self.file.id
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn is_template(&self) -> bool {
        self.is_template
    }

    /// Total selected k-grams, ignored or not.
    pub fn total_kgrams(&self) -> usize {
        self.kgram_hashes.len()
    }

    /// Selected k-grams whose fingerprint is currently ignored.
    pub fn ignored_kgrams(&self) -> usize {
        self.kgram_hashes
            .iter()
            .filter(|h| self.ignored.contains(h))
            .count()
    }

    /// Selected k-grams whose fingerprint is active. This is the "total"
    /// side of similarity normalization.
    pub fn active_kgrams(&self) -> usize {
        self.total_kgrams() - self.ignored_kgrams()
    }

    /// Active fingerprint hashes owned by this file.
    pub fn shared_hashes(&self) -> &HashSet<u64> {
        &self.shared
    }

    /// Ignored fingerprint hashes owned by this file.
    pub fn ignored_hashes(&self) -> &HashSet<u64> {
        &self.ignored
    }

    /// Number of this file's own k-gram occurrences carrying `hash`.
    pub fn occurrence_count(&self, hash: u64) -> usize {
        self.kgram_hashes.iter().filter(|&&h| h == hash).count()
    }

    pub(crate) fn push_kgram(&mut self, hash: u64, fingerprint_ignored: bool) {
        self.kgram_hashes.push(hash);
        if fingerprint_ignored {
            self.ignored.insert(hash);
        } else {
            self.shared.insert(hash);
        }
    }

    /// Migration hook used by the index when a fingerprint's ignored state
    /// changes. Never called directly by anything else.
    pub(crate) fn migrate(&mut self, hash: u64, to_ignored: bool) {
        if to_ignored {
            if self.shared.remove(&hash) {
                self.ignored.insert(hash);
            }
        } else if self.ignored.remove(&hash) {
            self.shared.insert(hash);
        }
    }
}
