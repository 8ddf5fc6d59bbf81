//! Winnow filter: local-minimum fingerprint selection over a sliding window.
//!
//! Implemented with a monotonic deque in O(n) over the k-gram hash stream.
//! Within each window of `kgrams_in_window` consecutive k-gram positions the
//! minimum hash is selected, ties broken toward the rightmost (most recent)
//! occurrence, and a position already selected by an earlier window is never
//! emitted again. The net guarantee: every window of `kgrams_in_window`
//! consecutive k-grams contains at least one selected fingerprint.

use std::collections::VecDeque;

use crate::Fingerprint;

/// Restartable winnowing pass over a k-gram hash stream.
///
/// The filter itself is cheap to construct; [`WinnowFilter::iter`] returns a
/// lazy iterator and can be called any number of times over the same stream
/// with identical results.
#[derive(Debug, Clone, Copy)]
pub struct WinnowFilter {
    kgram_length: usize,
    window: usize,
}

impl WinnowFilter {
    pub fn new(kgram_length: usize, window: usize) -> Self {
        Self {
            kgram_length,
            window: window.max(1),
        }
    }

    /// Lazily yield the selected fingerprints for `hashes`, where
    /// `hashes[i]` is the fingerprint of the k-gram starting at token `i`.
    pub fn iter<'a>(&self, hashes: &'a [u64]) -> Winnow<'a> {
        Winnow {
            hashes,
            kgram_length: self.kgram_length,
            window: self.window,
            deque: VecDeque::with_capacity(self.window.min(hashes.len().max(1))),
            pos: 0,
            last_picked: None,
        }
    }

    /// Collect the whole selection eagerly.
    pub fn select(&self, hashes: &[u64]) -> Vec<Fingerprint> {
        self.iter(hashes).collect()
    }
}

/// Lazy winnowing iterator. See [`WinnowFilter`].
#[derive(Debug)]
pub struct Winnow<'a> {
    hashes: &'a [u64],
    kgram_length: usize,
    window: usize,
    /// Indices into `hashes`, front-to-back in increasing hash order; the
    /// front is always the rightmost minimum of the current window.
    deque: VecDeque<usize>,
    pos: usize,
    last_picked: Option<usize>,
}

impl Iterator for Winnow<'_> {
    type Item = Fingerprint;

    fn next(&mut self) -> Option<Fingerprint> {
        while self.pos < self.hashes.len() {
            let i = self.pos;
            self.pos += 1;

            // Drop positions that fell out of the window [i - window + 1, i].
            let left = (i + 1).saturating_sub(self.window);
            while let Some(&j) = self.deque.front() {
                if j < left {
                    self.deque.pop_front();
                } else {
                    break;
                }
            }

            // Pop everything >= the incoming hash: keeps the deque strictly
            // increasing and makes the front the *rightmost* minimum on ties.
            while let Some(&j) = self.deque.back() {
                if self.hashes[i] <= self.hashes[j] {
                    self.deque.pop_back();
                } else {
                    break;
                }
            }
            self.deque.push_back(i);

            // Only complete windows emit; a stream with fewer than `window`
            // k-grams yields nothing.
            if i + 1 >= self.window {
                let idx = *self.deque.front().expect("window has items");
                if self.last_picked != Some(idx) {
                    self.last_picked = Some(idx);
                    return Some(Fingerprint {
                        hash: self.hashes[idx],
                        start: idx,
                        stop: idx + self.kgram_length - 1,
                        data: None,
                    });
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(filter: &WinnowFilter, hashes: &[u64]) -> Vec<usize> {
        filter.iter(hashes).map(|f| f.start).collect()
    }

    #[test]
    fn window_one_selects_everything() {
        let filter = WinnowFilter::new(1, 1);
        let hashes = [5, 3, 9, 9, 1];
        assert_eq!(starts(&filter, &hashes), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn selects_window_minimum_once() {
        let filter = WinnowFilter::new(1, 3);
        // windows: [7,3,9] -> 3, [3,9,8] -> 3 (already picked), [9,8,2] -> 2
        let hashes = [7, 3, 9, 8, 2];
        assert_eq!(starts(&filter, &hashes), vec![1, 4]);
    }

    #[test]
    fn ties_break_rightmost() {
        let filter = WinnowFilter::new(1, 3);
        // equal minima at 0 and 2: the rightmost (2) wins the first window
        let hashes = [4, 9, 4, 9, 9];
        assert_eq!(starts(&filter, &hashes), vec![2]);
    }

    #[test]
    fn short_stream_yields_nothing() {
        let filter = WinnowFilter::new(1, 4);
        assert_eq!(starts(&filter, &[1, 2, 3]), Vec::<usize>::new());
    }

    #[test]
    fn restartable_and_deterministic() {
        let filter = WinnowFilter::new(2, 3);
        let hashes = [12, 7, 7, 40, 3, 9, 9, 3];
        let first: Vec<_> = filter.iter(&hashes).collect();
        let second: Vec<_> = filter.iter(&hashes).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn every_window_is_covered() {
        // Coverage guarantee: any `window` consecutive k-gram positions
        // contain at least one selected position.
        let window = 4;
        let filter = WinnowFilter::new(1, window);
        let hashes: Vec<u64> = (0..100u64).map(|i| i.wrapping_mul(2654435761) % 97).collect();
        let selected: Vec<usize> = starts(&filter, &hashes);
        for w0 in 0..=(hashes.len() - window) {
            assert!(
                selected.iter().any(|&s| s >= w0 && s < w0 + window),
                "window starting at {w0} has no selected fingerprint"
            );
        }
    }

    #[test]
    fn stop_is_start_plus_kgram_length() {
        let filter = WinnowFilter::new(5, 2);
        let hashes = [9, 1, 8];
        for f in filter.iter(&hashes) {
            assert_eq!(f.stop, f.start + 4);
        }
    }
}
