// Three-way merge.
//
// Both sides are diffed against the common base, then the two element lists
// are themselves diffed, comparing each element by the value it contributes
// (its base value, or its new value when it has none). Where the two lists
// line up, each pair of operations is reconciled position by position
// (an Insert has no base anchor, so any pairing with one is fatal);
// where they diverge, the side that changed wins, or the resolver decides
// when both did. A side equal to the base yields the other side verbatim.

use std::iter::FusedIterator;

use crate::align::{Aligner, align_elements};
use crate::compare::{Comparer, DefaultComparer};
use crate::element::{DiffElement, DiffOperation};
use crate::error::{ConflictReason, DiffError, MergeConflict, MergeError};
use crate::options::DiffOptions;
use crate::sections::{self, DiffSection};

// ---------------------------------------------------------------------------
// Conflict resolvers
// ---------------------------------------------------------------------------

/// Decides what replaces a span both sides changed.
///
/// Returning an error aborts the merge with that conflict.
pub trait ConflictResolver<T> {
    fn resolve(
        &self,
        common_base: &[T],
        left: &[T],
        right: &[T],
    ) -> Result<Vec<T>, MergeConflict<T>>;
}

impl<T, F> ConflictResolver<T> for F
where
    F: Fn(&[T], &[T], &[T]) -> Result<Vec<T>, MergeConflict<T>>,
{
    fn resolve(
        &self,
        common_base: &[T],
        left: &[T],
        right: &[T],
    ) -> Result<Vec<T>, MergeConflict<T>> {
        self(common_base, left, right)
    }
}

/// Keeps the left side.
#[derive(Debug, Clone, Copy, Default)]
pub struct TakeLeft;

impl<T: Clone> ConflictResolver<T> for TakeLeft {
    fn resolve(&self, _: &[T], left: &[T], _: &[T]) -> Result<Vec<T>, MergeConflict<T>> {
        Ok(left.to_vec())
    }
}

/// Keeps the left side followed by the right side.
#[derive(Debug, Clone, Copy, Default)]
pub struct TakeLeftThenRight;

impl<T: Clone> ConflictResolver<T> for TakeLeftThenRight {
    fn resolve(&self, _: &[T], left: &[T], right: &[T]) -> Result<Vec<T>, MergeConflict<T>> {
        Ok(left.iter().chain(right).cloned().collect())
    }
}

/// Keeps the right side, followed by the left side unless both are equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TakeRightThenLeftIfDifferent<C = DefaultComparer> {
    comparer: C,
}

impl TakeRightThenLeftIfDifferent {
    pub fn new() -> Self {
        Self {
            comparer: DefaultComparer,
        }
    }
}

impl<C> TakeRightThenLeftIfDifferent<C> {
    /// Decide equality of the two sides with `comparer`.
    pub fn with_comparer(comparer: C) -> Self {
        Self { comparer }
    }
}

impl<T: Clone, C: Comparer<T>> ConflictResolver<T> for TakeRightThenLeftIfDifferent<C> {
    fn resolve(&self, _: &[T], left: &[T], right: &[T]) -> Result<Vec<T>, MergeConflict<T>> {
        let same = left.len() == right.len()
            && left.iter().zip(right).all(|(l, r)| self.comparer.equals(l, r));
        let mut out = right.to_vec();
        if !same {
            out.extend_from_slice(left);
        }
        Ok(out)
    }
}

/// Declines every conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectConflicts;

impl<T: Clone> ConflictResolver<T> for RejectConflicts {
    fn resolve(
        &self,
        common_base: &[T],
        left: &[T],
        right: &[T],
    ) -> Result<Vec<T>, MergeConflict<T>> {
        Err(MergeConflict::declined(common_base, left, right))
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Compares diff elements by the value each contributes.
struct ContributedComparer<C>(C);

impl<'a, T, C: Comparer<T>> Comparer<DiffElement<'a, T>> for ContributedComparer<C> {
    fn equals(&self, a: &DiffElement<'a, T>, b: &DiffElement<'a, T>) -> bool {
        match (a.contributed(), b.contributed()) {
            (Some(x), Some(y)) => self.0.equals(x, y),
            (None, None) => true,
            _ => false,
        }
    }

    fn hash(&self, value: &DiffElement<'a, T>) -> u64 {
        value.contributed().map_or(0, |v| self.0.hash(v))
    }
}

/// Merge `left` and `right`, two edits of `common_base`.
///
/// Both diffs and the plan of how they line up are computed here; the
/// merged elements are then produced lazily. A conflict ends the iteration
/// with an error, so collecting into `Result<Vec<T>, _>` never yields a
/// partial merge.
pub fn merge<'a, T, A, R, C>(
    common_base: &'a [T],
    left: &'a [T],
    right: &'a [T],
    options: &DiffOptions,
    aligner: A,
    resolver: R,
    comparer: C,
) -> Result<Merge<'a, T, R>, DiffError>
where
    A: Aligner<T>,
    R: ConflictResolver<T>,
    C: Comparer<T>,
{
    options.validate()?;

    let unchanged = if equal_slices(common_base, right, &comparer) {
        Some(left)
    } else if equal_slices(common_base, left, &comparer) {
        Some(right)
    } else {
        None
    };
    if let Some(side) = unchanged {
        log::debug!("one side equals the base, passing {} element(s) through", side.len());
        return Ok(Merge {
            left: Vec::new(),
            right: Vec::new(),
            sections: Vec::new().into_iter(),
            resolver,
            left_pos: 0,
            right_pos: 0,
            matched: 0,
            verbatim: side.iter(),
            pending: Vec::new().into_iter(),
            failed: false,
        });
    }

    let to_left = one_side(common_base, left, options, &aligner, &comparer)?;
    let to_right = one_side(common_base, right, options, &aligner, &comparer)?;
    let plan: Vec<DiffSection> =
        sections::plan(&to_left, &to_right, *options, ContributedComparer(&comparer)).collect();

    log::debug!(
        "merging {} base element(s): {} left and {} right diff element(s) in {} section(s)",
        common_base.len(),
        to_left.len(),
        to_right.len(),
        plan.len()
    );

    Ok(Merge {
        left: to_left,
        right: to_right,
        sections: plan.into_iter(),
        resolver,
        left_pos: 0,
        right_pos: 0,
        matched: 0,
        verbatim: Default::default(),
        pending: Vec::new().into_iter(),
        failed: false,
    })
}

/// Merge and collect the result.
pub fn merge_all<T, A, R, C>(
    common_base: &[T],
    left: &[T],
    right: &[T],
    options: &DiffOptions,
    aligner: A,
    resolver: R,
    comparer: C,
) -> Result<Vec<T>, MergeError<T>>
where
    T: Clone,
    A: Aligner<T>,
    R: ConflictResolver<T>,
    C: Comparer<T>,
{
    merge(common_base, left, right, options, aligner, resolver, comparer)?.collect()
}

fn equal_slices<T, C: Comparer<T>>(a: &[T], b: &[T], comparer: &C) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| comparer.equals(x, y))
}

fn one_side<'a, T, A: Aligner<T>, C: Comparer<T>>(
    base: &'a [T],
    other: &'a [T],
    options: &DiffOptions,
    aligner: A,
    comparer: C,
) -> Result<Vec<DiffElement<'a, T>>, DiffError> {
    let plan = sections::plan(base, other, *options, comparer);
    align_elements(base, other, plan, aligner).collect()
}

/// Lazy iterator over merged elements. See [`merge`].
pub struct Merge<'a, T, R> {
    left: Vec<DiffElement<'a, T>>,
    right: Vec<DiffElement<'a, T>>,
    sections: std::vec::IntoIter<DiffSection>,
    resolver: R,
    left_pos: usize,
    right_pos: usize,
    /// Pairs still to reconcile in the current matching section.
    matched: usize,
    /// The changed side, when the other one equals the base.
    verbatim: std::slice::Iter<'a, T>,
    /// Resolved values not yet yielded.
    pending: std::vec::IntoIter<T>,
    failed: bool,
}

impl<'a, T: Clone, R: ConflictResolver<T>> Merge<'a, T, R> {
    fn reconcile(
        &self,
        left: &DiffElement<'a, T>,
        right: &DiffElement<'a, T>,
    ) -> Result<Vec<T>, MergeError<T>> {
        use DiffOperation::*;

        let normalize = |op: DiffOperation| if op == Replace { Modify } else { op };
        let (lop, rop) = (normalize(left.operation), normalize(right.operation));
        let values = |v: Option<&'a T>| -> Vec<T> { v.into_iter().cloned().collect() };
        let base = values(left.value1.or(right.value1));
        let (lv, rv) = (values(left.value2), values(right.value2));

        match (lop, rop) {
            (Match, Match) | (Modify, Match) => Ok(lv),
            (Match, Modify) => Ok(rv),
            (Match, Delete) | (Delete, Match) | (Delete, Delete) => Ok(Vec::new()),
            (Delete, Modify) => self.escalate(&base, &[], &rv),
            (Modify, Delete) => self.escalate(&base, &lv, &[]),
            (Modify, Modify) => self.escalate(&base, &lv, &rv),
            (left_op, right_op) => {
                log::debug!("unreconcilable merge of {left_op} with {right_op}");
                Err(MergeError::Conflict(MergeConflict {
                    reason: ConflictReason::Unreconcilable {
                        left: left_op,
                        right: right_op,
                    },
                    common_base: base,
                    left: lv,
                    right: rv,
                }))
            }
        }
    }

    fn diverged(&self, section: DiffSection) -> Result<Vec<T>, MergeError<T>> {
        let new_values = |elements: &[DiffElement<'a, T>]| -> Vec<T> {
            elements.iter().filter_map(|e| e.value2).cloned().collect()
        };
        let left = &self.left[self.left_pos..self.left_pos + section.length1];
        let right = &self.right[self.right_pos..self.right_pos + section.length2];

        match (left.is_empty(), right.is_empty()) {
            (_, true) => Ok(new_values(left)),
            (true, false) => Ok(new_values(right)),
            (false, false) => self.escalate(&[], &new_values(left), &new_values(right)),
        }
    }

    fn escalate(&self, base: &[T], left: &[T], right: &[T]) -> Result<Vec<T>, MergeError<T>> {
        self.resolver.resolve(base, left, right).map_err(|conflict| {
            log::debug!("{conflict}");
            MergeError::Conflict(conflict)
        })
    }

    fn step(&mut self) -> Option<Result<Vec<T>, MergeError<T>>> {
        if self.matched > 0 {
            self.matched -= 1;
            let (l, r) = (self.left_pos, self.right_pos);
            self.left_pos += 1;
            self.right_pos += 1;
            return Some(match (self.left.get(l), self.right.get(r)) {
                (Some(left), Some(right)) => self.reconcile(left, right),
                _ => Err(MergeError::Diff(DiffError::Invariant(format!(
                    "merge section overruns the diffs at {l}/{r}"
                )))),
            });
        }

        let section = self.sections.next()?;
        if section.is_match {
            self.matched = section.length1;
            return Some(Ok(Vec::new()));
        }
        let resolved = self.diverged(section);
        self.left_pos += section.length1;
        self.right_pos += section.length2;
        Some(resolved)
    }
}

impl<T: Clone, R: ConflictResolver<T>> Iterator for Merge<'_, T, R> {
    type Item = Result<T, MergeError<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            if let Some(value) = self.verbatim.next() {
                return Some(Ok(value.clone()));
            }
            if let Some(value) = self.pending.next() {
                return Some(Ok(value));
            }
            match self.step()? {
                Ok(values) => self.pending = values.into_iter(),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<T: Clone, R: ConflictResolver<T>> FusedIterator for Merge<'_, T, R> {}
