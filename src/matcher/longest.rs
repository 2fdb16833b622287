// Longest common run search.
//
// For each start position in the first window (ascending), candidates from
// the second window that share the element's hash are tried in index bucket
// order: the first indexed position, then the others newest first.
// A candidate is only scanned in full when it also agrees at offset
// `best.length`, since anything shorter cannot win. The first run found at
// a given length wins; later runs must be strictly longer.

use std::ops::Range;

use crate::compare::Comparer;

use super::index::CandidateIndex;

/// A run of pairwise-equal elements shared by both sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonRun {
    /// Start of the run in the first sequence.
    pub start1: usize,
    /// Start of the run in the second sequence.
    pub start2: usize,
    /// Number of equal elements.
    pub length: usize,
}

/// Finds longest common runs between windows of two sequences.
///
/// One matcher serves a whole planning pass: the candidate index over the
/// second sequence is kept between calls and extended as needed.
pub struct LongestRunMatcher<'a, T, C> {
    seq1: &'a [T],
    seq2: &'a [T],
    comparer: C,
    index: CandidateIndex,
}

impl<'a, T, C: Comparer<T>> LongestRunMatcher<'a, T, C> {
    pub fn new(seq1: &'a [T], seq2: &'a [T], comparer: C) -> Self {
        Self {
            seq1,
            seq2,
            comparer,
            index: CandidateIndex::new(),
        }
    }

    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Longest run inside `range1` x `range2` that is at least `min_length`
    /// long, or `None` when there is none.
    pub fn find(
        &mut self,
        range1: Range<usize>,
        range2: Range<usize>,
        min_length: usize,
    ) -> Option<CommonRun> {
        let Range {
            start: lower1,
            end: upper1,
        } = range1;
        let Range {
            start: lower2,
            end: upper2,
        } = range2.clone();

        self.index.ensure(self.seq2, &self.comparer, range2);

        let mut best = CommonRun {
            start1: 0,
            start2: 0,
            length: 0,
        };
        let mut tried = 0usize;

        for index1 in lower1..upper1 {
            // Nothing starting here or later can beat the current best.
            if index1 + best.length >= upper1 {
                break;
            }

            let hash = self.comparer.hash(&self.seq1[index1]);
            for index2 in self.index.candidates(hash) {
                if index2 < lower2 || index2 + best.length >= upper2 {
                    continue;
                }
                tried += 1;

                if !self.comparer.equals(
                    &self.seq1[index1 + best.length],
                    &self.seq2[index2 + best.length],
                ) {
                    continue;
                }

                let length = self.run_length(index1, upper1, index2, upper2);
                if length > best.length && length >= min_length {
                    best = CommonRun {
                        start1: index1,
                        start2: index2,
                        length,
                    };
                }

                if index1 + best.length >= upper1 {
                    break;
                }
            }
        }

        log::trace!(
            "longest run in [{lower1},{upper1})x[{lower2},{upper2}): {best:?} after {tried} tries"
        );

        (best.length > 0).then_some(best)
    }

    fn run_length(
        &self,
        mut index1: usize,
        upper1: usize,
        mut index2: usize,
        upper2: usize,
    ) -> usize {
        let start = index1;
        while index1 < upper1
            && index2 < upper2
            && self.comparer.equals(&self.seq1[index1], &self.seq2[index2])
        {
            index1 += 1;
            index2 += 1;
        }
        index1 - start
    }
}
