// Candidate index over a window of the second sequence.
//
// Maps element hash -> positions sharing that hash. The indexed window only
// ever grows: a query for a window that reaches past the covered range
// extends it toward the lower or upper bound, one position at a time, so a
// series of overlapping queries costs O(1) per newly covered position.
// Positions outside a query window stay indexed and are filtered by the
// caller. Within a bucket the first indexed position stays at the head and
// every later one is walked newest first.

use std::collections::HashMap;
use std::ops::Range;

use crate::compare::Comparer;

/// Hash-bucketed inverted index of second-sequence positions.
#[derive(Debug, Default)]
pub struct CandidateIndex {
    /// Bucket lists in insertion order.
    buckets: HashMap<u64, Vec<usize>>,
    /// Covered range, `None` until the first window is indexed.
    covered: Option<Range<usize>>,
}

impl CandidateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Range of positions indexed so far.
    pub fn covered(&self) -> Option<Range<usize>> {
        self.covered.clone()
    }

    /// Number of indexed positions.
    pub fn len(&self) -> usize {
        self.covered.as_ref().map_or(0, |r| r.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make sure `window` is covered, indexing only what is missing.
    pub fn ensure<T, C: Comparer<T>>(&mut self, seq: &[T], comparer: &C, window: Range<usize>) {
        match self.covered {
            None => {
                for pos in window.clone() {
                    self.insert(comparer.hash(&seq[pos]), pos);
                }
                self.covered = Some(window);
            }
            Some(_) => {
                self.extend_lower(seq, comparer, window.start);
                self.extend_upper(seq, comparer, window.end);
            }
        }
    }

    /// Grow the covered range downward until it starts at `lower`.
    pub fn extend_lower<T, C: Comparer<T>>(&mut self, seq: &[T], comparer: &C, lower: usize) {
        let mut covered = self.covered.take().unwrap_or(lower..lower);
        while covered.start > lower {
            covered.start -= 1;
            self.insert(comparer.hash(&seq[covered.start]), covered.start);
        }
        self.covered = Some(covered);
    }

    /// Grow the covered range upward until it ends at `upper`.
    pub fn extend_upper<T, C: Comparer<T>>(&mut self, seq: &[T], comparer: &C, upper: usize) {
        let mut covered = self.covered.take().unwrap_or(upper..upper);
        while covered.end < upper {
            self.insert(comparer.hash(&seq[covered.end]), covered.end);
            covered.end += 1;
        }
        self.covered = Some(covered);
    }

    /// Positions whose element hashes to `hash`: the first one indexed,
    /// then the rest most recently indexed first.
    pub fn candidates(&self, hash: u64) -> impl Iterator<Item = usize> + '_ {
        let (head, rest) = match self.buckets.get(&hash).and_then(|b| b.split_first()) {
            Some((head, rest)) => (Some(*head), rest),
            None => (None, &[][..]),
        };
        head.into_iter().chain(rest.iter().rev().copied())
    }

    fn insert(&mut self, hash: u64, pos: usize) {
        self.buckets.entry(hash).or_default().push(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::DefaultComparer;

    #[test]
    fn first_window_is_indexed_in_full() {
        let seq = ['a', 'b', 'a', 'c', 'a'];
        let cmp = DefaultComparer;
        let mut index = CandidateIndex::new();
        index.ensure(&seq, &cmp, 1..5);
        assert_eq!(index.covered(), Some(1..5));
        let found: Vec<_> = index.candidates(cmp.hash(&'a')).collect();
        assert_eq!(found, vec![2, 4], "position 0 not indexed");
    }

    #[test]
    fn overlapping_windows_extend_incrementally() {
        let seq = ['x', 'y', 'x', 'y', 'x'];
        let cmp = DefaultComparer;
        let mut index = CandidateIndex::new();
        index.ensure(&seq, &cmp, 2..3);
        assert_eq!(index.len(), 1);

        index.ensure(&seq, &cmp, 0..5);
        assert_eq!(index.covered(), Some(0..5));
        assert_eq!(index.len(), 5);
        // Indexed as 2, 0 (extended downward), 4 (extended upward).
        let found: Vec<_> = index.candidates(cmp.hash(&'x')).collect();
        assert_eq!(found, vec![2, 4, 0]);
    }

    #[test]
    fn narrower_window_does_not_reindex() {
        let seq = [1u8, 2, 1, 2];
        let cmp = DefaultComparer;
        let mut index = CandidateIndex::new();
        index.ensure(&seq, &cmp, 0..4);
        index.ensure(&seq, &cmp, 1..3);
        let found: Vec<_> = index.candidates(cmp.hash(&1u8)).collect();
        assert_eq!(found, vec![0, 2]);
    }

    #[test]
    fn bucket_head_is_kept_and_later_positions_run_newest_first() {
        let seq = ['a', 'a', 'a', 'a'];
        let cmp = DefaultComparer;
        let mut index = CandidateIndex::new();
        index.ensure(&seq, &cmp, 0..4);
        let found: Vec<_> = index.candidates(cmp.hash(&'a')).collect();
        assert_eq!(found, vec![0, 3, 2, 1]);
    }

    #[test]
    fn missing_hash_has_no_candidates() {
        let index = CandidateIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.candidates(42).count(), 0);
    }
}
