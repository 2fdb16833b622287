// Element alignment.
//
// Turns a section plan into per-element correspondences. Matched sections
// become Match elements directly; each unmatched section is handed to an
// `Aligner`, which decides how its positions pair up.

pub mod basic;
pub mod similarity;
pub mod text;

use std::iter::FusedIterator;

use crate::compare::Comparer;
use crate::element::DiffElement;
use crate::error::DiffError;
use crate::options::DiffOptions;
use crate::sections::{self, DiffSection};

pub use basic::{InsertDeleteAligner, ReplaceInsertDeleteAligner};
pub use similarity::SimilarityAligner;
pub use text::{StringSimilarityAligner, Text, string_similarity};

// ---------------------------------------------------------------------------
// Aligner trait
// ---------------------------------------------------------------------------

/// Strategy that classifies the positions of one unmatched span.
///
/// The span is `seq1[start1..start1 + len1]` against
/// `seq2[start2..start2 + len2]`. The returned elements must consume every
/// position of both ranges exactly once, in ascending order on each side.
pub trait Aligner<T> {
    fn align<'a>(
        &self,
        seq1: &'a [T],
        start1: usize,
        len1: usize,
        seq2: &'a [T],
        start2: usize,
        len2: usize,
    ) -> Result<Vec<DiffElement<'a, T>>, DiffError>;
}

impl<T, A: Aligner<T> + ?Sized> Aligner<T> for &A {
    fn align<'a>(
        &self,
        seq1: &'a [T],
        start1: usize,
        len1: usize,
        seq2: &'a [T],
        start2: usize,
        len2: usize,
    ) -> Result<Vec<DiffElement<'a, T>>, DiffError> {
        (**self).align(seq1, start1, len1, seq2, start2, len2)
    }
}

impl<T, A: Aligner<T> + ?Sized> Aligner<T> for Box<A> {
    fn align<'a>(
        &self,
        seq1: &'a [T],
        start1: usize,
        len1: usize,
        seq2: &'a [T],
        start2: usize,
        len2: usize,
    ) -> Result<Vec<DiffElement<'a, T>>, DiffError> {
        (**self).align(seq1, start1, len1, seq2, start2, len2)
    }
}

/// Reject spans that reach past the end of either sequence.
pub(crate) fn check_span<T>(
    seq1: &[T],
    start1: usize,
    len1: usize,
    seq2: &[T],
    start2: usize,
    len2: usize,
) -> Result<(), DiffError> {
    let fits = |seq: &[T], start: usize, len: usize| {
        start.checked_add(len).is_some_and(|end| end <= seq.len())
    };
    if fits(seq1, start1, len1) && fits(seq2, start2, len2) {
        Ok(())
    } else {
        Err(DiffError::SpanOutOfBounds {
            start1,
            len1,
            start2,
            len2,
        })
    }
}

// ---------------------------------------------------------------------------
// Section walk
// ---------------------------------------------------------------------------

/// Expand `sections` into element-level correspondences.
///
/// Elements are produced lazily, one section at a time. A section that
/// consumes more elements than a sequence holds yields
/// [`DiffError::SectionOverrun`] and ends the iteration.
pub fn align_elements<'a, T, I, A>(
    seq1: &'a [T],
    seq2: &'a [T],
    sections: I,
    aligner: A,
) -> AlignedElements<'a, T, I::IntoIter, A>
where
    I: IntoIterator<Item = DiffSection>,
    A: Aligner<T>,
{
    AlignedElements {
        seq1,
        seq2,
        sections: sections.into_iter(),
        aligner,
        pos1: 0,
        pos2: 0,
        matched: 0,
        pending: Vec::new().into_iter(),
        done: false,
    }
}

/// Lazy iterator over aligned elements. See [`align_elements`].
pub struct AlignedElements<'a, T, I, A> {
    seq1: &'a [T],
    seq2: &'a [T],
    sections: I,
    aligner: A,
    /// Next unconsumed position on each side.
    pos1: usize,
    pos2: usize,
    /// Match elements still owed for the current matched section.
    matched: usize,
    /// Aligner output still owed for the current unmatched section.
    pending: std::vec::IntoIter<DiffElement<'a, T>>,
    done: bool,
}

impl<'a, T, I, A> AlignedElements<'a, T, I, A>
where
    I: Iterator<Item = DiffSection>,
    A: Aligner<T>,
{
    fn advance(&mut self, section: DiffSection) -> Result<(), DiffError> {
        let (len1, len2) = (self.seq1.len(), self.seq2.len());
        let needed1 = self.pos1.saturating_add(section.length1);
        let needed2 = self.pos2.saturating_add(section.length2);
        if needed1 > len1 || needed2 > len2 {
            return Err(DiffError::SectionOverrun {
                needed1,
                needed2,
                len1,
                len2,
            });
        }

        if section.is_match {
            if section.length1 != section.length2 {
                return Err(DiffError::Invariant(format!(
                    "matched section with unequal lengths {}/{}",
                    section.length1, section.length2
                )));
            }
            self.matched = section.length1;
        } else {
            let elements = self.aligner.align(
                self.seq1,
                self.pos1,
                section.length1,
                self.seq2,
                self.pos2,
                section.length2,
            )?;
            self.pending = elements.into_iter();
            self.pos1 = needed1;
            self.pos2 = needed2;
        }
        Ok(())
    }
}

impl<'a, T, I, A> Iterator for AlignedElements<'a, T, I, A>
where
    I: Iterator<Item = DiffSection>,
    A: Aligner<T>,
{
    type Item = Result<DiffElement<'a, T>, DiffError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if self.matched > 0 {
                let (i, j) = (self.pos1, self.pos2);
                self.matched -= 1;
                self.pos1 += 1;
                self.pos2 += 1;
                return Some(Ok(DiffElement::matched(
                    i,
                    &self.seq1[i],
                    j,
                    &self.seq2[j],
                )));
            }
            if let Some(element) = self.pending.next() {
                return Some(Ok(element));
            }
            let Some(section) = self.sections.next() else {
                self.done = true;
                return None;
            };
            if let Err(e) = self.advance(section) {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

impl<T, I, A> FusedIterator for AlignedElements<'_, T, I, A>
where
    I: Iterator<Item = DiffSection>,
    A: Aligner<T>,
{
}

/// Plan sections and align them in one go.
pub fn diff<'a, T, C, A>(
    seq1: &'a [T],
    seq2: &'a [T],
    options: &DiffOptions,
    comparer: C,
    aligner: A,
) -> Result<Vec<DiffElement<'a, T>>, DiffError>
where
    C: Comparer<T>,
    A: Aligner<T>,
{
    let sections = sections::compute_sections(seq1, seq2, options, comparer)?;
    align_elements(seq1, seq2, sections, aligner).collect()
}
