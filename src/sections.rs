// Section planning.
//
// Partitions two sequences into an ordered, gapless list of matched and
// unmatched spans. Each window is optionally trimmed of its common prefix
// and suffix, then split around the longest common run of its interior;
// the parts before and after the run are planned the same way.
//
// The planner is an iterator over an explicit work stack. Frames are popped
// in the same order the recursive formulation would visit them, so the
// shared candidate index sees the same sequence of windows.

use std::fmt;
use std::iter::FusedIterator;

use crate::compare::Comparer;
use crate::error::DiffError;
use crate::matcher::LongestRunMatcher;
use crate::options::DiffOptions;

/// A contiguous matched or unmatched run spanning both sequences.
///
/// A matched section always has `length1 == length2`, and the elements it
/// covers are pairwise equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiffSection {
    pub is_match: bool,
    pub length1: usize,
    pub length2: usize,
}

impl DiffSection {
    pub fn matched(length: usize) -> Self {
        Self {
            is_match: true,
            length1: length,
            length2: length,
        }
    }

    pub fn unmatched(length1: usize, length2: usize) -> Self {
        Self {
            is_match: false,
            length1,
            length2,
        }
    }
}

impl fmt::Display for DiffSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (l1, l2) = (self.length1, self.length2);
        if self.is_match {
            write!(f, "{l1} matched")
        } else if l1 == l2 {
            write!(f, "{l1} did not match")
        } else if l1 == 0 {
            write!(f, "{l2} was present in seq2, but not in seq1")
        } else if l2 == 0 {
            write!(f, "{l1} was present in seq1, but not in seq2")
        } else {
            write!(f, "{l1} did not match with {l2}")
        }
    }
}

/// Plan the sections between `seq1` and `seq2`.
///
/// Options are validated up front; planning itself happens lazily as the
/// returned iterator is consumed.
pub fn compute_sections<'a, T, C: Comparer<T>>(
    seq1: &'a [T],
    seq2: &'a [T],
    options: &DiffOptions,
    comparer: C,
) -> Result<Sections<'a, T, C>, DiffError> {
    options.validate()?;
    Ok(plan(seq1, seq2, *options, comparer))
}

// Planning with options already known to be valid.
pub(crate) fn plan<'a, T, C: Comparer<T>>(
    seq1: &'a [T],
    seq2: &'a [T],
    options: DiffOptions,
    comparer: C,
) -> Sections<'a, T, C> {
    Sections {
        matcher: LongestRunMatcher::new(seq1, seq2, comparer),
        seq1,
        seq2,
        options,
        stack: vec![Frame::Solve(Window {
            lower1: 0,
            upper1: seq1.len(),
            lower2: 0,
            upper2: seq2.len(),
        })],
        emitted: 0,
    }
}

// ---------------------------------------------------------------------------
// Planner state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Window {
    lower1: usize,
    upper1: usize,
    lower2: usize,
    upper2: usize,
}

impl Window {
    fn is_empty(&self) -> bool {
        self.lower1 == self.upper1 && self.lower2 == self.upper2
    }

    fn is_one_sided(&self) -> bool {
        self.lower1 == self.upper1 || self.lower2 == self.upper2
    }

    fn remainder(&self) -> DiffSection {
        DiffSection::unmatched(self.upper1 - self.lower1, self.upper2 - self.lower2)
    }
}

#[derive(Debug)]
enum Frame {
    Solve(Window),
    Emit(DiffSection),
}

/// Lazy iterator over the planned sections. See [`compute_sections`].
pub struct Sections<'a, T, C> {
    matcher: LongestRunMatcher<'a, T, C>,
    seq1: &'a [T],
    seq2: &'a [T],
    options: DiffOptions,
    stack: Vec<Frame>,
    emitted: usize,
}

impl<T, C: Comparer<T>> Sections<'_, T, C> {
    /// Expand one window. Pushes deferred work and returns the section to
    /// emit right away, if any.
    fn solve(&mut self, mut w: Window) -> Option<DiffSection> {
        if w.is_empty() {
            return None;
        }

        let mut prefix = 0;
        if self.options.patience {
            prefix = self.common_prefix(&w);
            w.lower1 += prefix;
            w.lower2 += prefix;

            let suffix = self.common_suffix(&w);
            if suffix > 0 {
                w.upper1 -= suffix;
                w.upper2 -= suffix;
                self.stack.push(Frame::Emit(DiffSection::matched(suffix)));
            }
        }

        if !w.is_empty() {
            if w.is_one_sided() {
                self.stack.push(Frame::Emit(w.remainder()));
            } else {
                match self.matcher.find(
                    w.lower1..w.upper1,
                    w.lower2..w.upper2,
                    self.options.context_size,
                ) {
                    Some(run) => {
                        self.stack.push(Frame::Solve(Window {
                            lower1: run.start1 + run.length,
                            upper1: w.upper1,
                            lower2: run.start2 + run.length,
                            upper2: w.upper2,
                        }));
                        self.stack
                            .push(Frame::Emit(DiffSection::matched(run.length)));
                        self.stack.push(Frame::Solve(Window {
                            lower1: w.lower1,
                            upper1: run.start1,
                            lower2: w.lower2,
                            upper2: run.start2,
                        }));
                    }
                    None => self.stack.push(Frame::Emit(w.remainder())),
                }
            }
        }

        (prefix > 0).then(|| DiffSection::matched(prefix))
    }

    fn common_prefix(&self, w: &Window) -> usize {
        let cmp = self.matcher.comparer();
        self.seq1[w.lower1..w.upper1]
            .iter()
            .zip(&self.seq2[w.lower2..w.upper2])
            .take_while(|&(a, b)| cmp.equals(a, b))
            .count()
    }

    fn common_suffix(&self, w: &Window) -> usize {
        let cmp = self.matcher.comparer();
        self.seq1[w.lower1..w.upper1]
            .iter()
            .rev()
            .zip(self.seq2[w.lower2..w.upper2].iter().rev())
            .take_while(|&(a, b)| cmp.equals(a, b))
            .count()
    }
}

impl<T, C: Comparer<T>> Iterator for Sections<'_, T, C> {
    type Item = DiffSection;

    fn next(&mut self) -> Option<DiffSection> {
        while let Some(frame) = self.stack.pop() {
            let section = match frame {
                Frame::Emit(section) => Some(section),
                Frame::Solve(window) => self.solve(window),
            };
            if let Some(section) = section {
                self.emitted += 1;
                if self.stack.is_empty() {
                    log::debug!(
                        "planned {} section(s) over {}x{} elements",
                        self.emitted,
                        self.seq1.len(),
                        self.seq2.len()
                    );
                }
                return Some(section);
            }
        }
        None
    }
}

impl<T, C: Comparer<T>> FusedIterator for Sections<'_, T, C> {}
