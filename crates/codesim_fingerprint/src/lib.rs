//! codesim_fingerprint: hashing primitives and the winnow filter.
//!
//! This crate turns an ordered token stream into a bounded set of selected
//! fingerprints: one rolling 64-bit hash per k-gram (contiguous window of
//! `kgram_length` tokens), subsampled by winnowing so that every window of
//! `kgrams_in_window` consecutive k-grams contributes at least one selected
//! fingerprint. The stage is deterministic and pure: equal tokens and equal
//! [`FingerprintConfig`]s produce bit-identical selections on any machine.

mod config;
mod hash;
mod winnow;

pub use config::{FingerprintConfig, FingerprintError};
pub use hash::{hash_token, rolling_kgram_hashes};
pub use winnow::{Winnow, WinnowFilter};

use serde::{Deserialize, Serialize};

/// SplitMix64 finalizer, used to derive internal constants from the seed.
pub(crate) fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A selected fingerprint: one k-gram's hash plus its token range.
///
/// `start..=stop` are token indices into the originating file's stream;
/// `stop - start + 1 == kgram_length` always. The ordinal position of a
/// selected fingerprint within its file (its "k-gram index") is assigned by
/// the index when the file entry is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fingerprint {
    /// Rolling hash of the k-gram.
    pub hash: u64,
    /// Token index of the first token in the k-gram.
    pub start: usize,
    /// Token index of the last token in the k-gram (inclusive).
    pub stop: usize,
    /// Literal token slice, populated only when
    /// [`FingerprintConfig::include_token_data`] is set.
    pub data: Option<Vec<String>>,
}

/// Run the full fingerprint pipeline: hash k-grams, winnow, optionally
/// attach token data.
///
/// Streams shorter than [`FingerprintConfig::min_tokens`] yield an empty
/// selection; that is not an error. Configuration problems are.
pub fn fingerprint_tokens<S: AsRef<str>>(
    tokens: &[S],
    cfg: &FingerprintConfig,
) -> Result<Vec<Fingerprint>, FingerprintError> {
    cfg.validate()?;

    let hashes = rolling_kgram_hashes(tokens, cfg.kgram_length, cfg.seed);
    let filter = WinnowFilter::new(cfg.kgram_length, cfg.kgrams_in_window);
    let mut selected = filter.select(&hashes);

    if cfg.include_token_data {
        for fp in &mut selected {
            fp.data = Some(
                tokens[fp.start..=fp.stop]
                    .iter()
                    .map(|t| t.as_ref().to_string())
                    .collect(),
            );
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    fn small_cfg() -> FingerprintConfig {
        FingerprintConfig {
            kgram_length: 2,
            kgrams_in_window: 2,
            ..Default::default()
        }
    }

    #[test]
    fn identical_streams_produce_identical_selections() {
        let cfg = small_cfg();
        let a = fingerprint_tokens(&toks("for i in range n sum += i"), &cfg).unwrap();
        let b = fingerprint_tokens(&toks("for i in range n sum += i"), &cfg).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn short_stream_is_empty_not_an_error() {
        let cfg = FingerprintConfig::default();
        let selected = fingerprint_tokens(&toks("just a few tokens"), &cfg).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn invalid_config_is_an_error() {
        let cfg = FingerprintConfig {
            kgram_length: 0,
            ..Default::default()
        };
        assert!(fingerprint_tokens(&toks("a b c"), &cfg).is_err());
    }

    #[test]
    fn token_data_matches_kgram_range() {
        let cfg = FingerprintConfig {
            include_token_data: true,
            ..small_cfg()
        };
        let tokens = toks("alpha beta gamma delta epsilon");
        for fp in fingerprint_tokens(&tokens, &cfg).unwrap() {
            let data = fp.data.as_ref().expect("token data requested");
            assert_eq!(data.len(), cfg.kgram_length);
            assert_eq!(data[0], tokens[fp.start]);
            assert_eq!(data[data.len() - 1], tokens[fp.stop]);
        }
    }

    #[test]
    fn selection_never_depends_on_token_data_flag() {
        let tokens = toks("one two three four five six seven eight");
        let plain = fingerprint_tokens(&tokens, &small_cfg()).unwrap();
        let with_data = fingerprint_tokens(
            &tokens,
            &FingerprintConfig {
                include_token_data: true,
                ..small_cfg()
            },
        )
        .unwrap();
        let plain_keys: Vec<_> = plain.iter().map(|f| (f.hash, f.start, f.stop)).collect();
        let data_keys: Vec<_> = with_data.iter().map(|f| (f.hash, f.start, f.stop)).collect();
        assert_eq!(plain_keys, data_keys);
    }
}
