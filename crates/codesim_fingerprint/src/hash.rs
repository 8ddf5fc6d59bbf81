//! Hashing primitives: per-token hashing and the O(1) rolling k-gram hash.
//!
//! All arithmetic is fixed-width wrapping; overflow is part of the hash
//! definition, never a panic.

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::splitmix64;

/// Hash a single token under the configured seed.
#[inline]
pub fn hash_token(token: &str, seed: u64) -> u64 {
    xxh3_64_with_seed(token.as_bytes(), seed)
}

/// Compute one 64-bit fingerprint per k-gram start position, in O(n).
///
/// The hash of window `[i+1, i+k]` is derived from the hash of `[i, i+k-1]`
/// by removing the oldest token's contribution and appending the newest —
/// a polynomial rolling hash over the per-token hashes. Returns one value
/// per k-gram, `tokens.len() - k + 1` in total; empty when the stream is
/// shorter than `k`.
pub fn rolling_kgram_hashes<S: AsRef<str>>(tokens: &[S], k: usize, seed: u64) -> Vec<u64> {
    let n = tokens.len();
    if k == 0 || n < k {
        return Vec::new();
    }

    let th: Vec<u64> = tokens
        .iter()
        .map(|t| hash_token(t.as_ref(), seed))
        .collect();

    // Large prime base, xored with a seed-derived value so the polynomial is
    // not predictable from the token hashes alone.
    const BASE: u64 = 1_000_003;
    let base = BASE ^ splitmix64(seed);

    let mut base_km1 = 1u64;
    for _ in 1..k {
        base_km1 = base_km1.wrapping_mul(base);
    }

    let mut out = Vec::with_capacity(n - k + 1);
    let mut h = 0u64;
    for &val in th.iter().take(k) {
        h = h.wrapping_mul(base).wrapping_add(val);
    }
    out.push(h);

    for (&old, &new) in th.iter().zip(th.iter().skip(k)) {
        h = h.wrapping_sub(old.wrapping_mul(base_km1));
        h = h.wrapping_mul(base).wrapping_add(new);
        out.push(h);
    }
    out
}
