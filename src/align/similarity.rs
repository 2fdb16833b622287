// Similarity-driven alignment of one unmatched span.
//
// The span is an edit graph of (len1 + 1) x (len2 + 1) nodes. From node
// (i, j) a path may Insert to (i, j + 1), Delete to (i + 1, j), or, when the
// two elements are similar enough, Modify to (i + 1, j + 1). Each node
// stores the best continuation to the corner, scored by the mean similarity
// of the remaining steps (Insert and Delete score 0).
//
// The table is filled bottom-up from the corner, then walked forward from
// (0, 0). Spans above `MAX_ALIGNED_SPAN` total elements skip the search and
// fall back to delete-then-insert.

use crate::element::{DiffElement, DiffOperation};
use crate::error::DiffError;

use super::basic::{push_deletes, push_inserts};
use super::{Aligner, check_span};

/// Default similarity at or above which a pair counts as a modification.
pub const DEFAULT_THRESHOLD: f64 = 0.3333;

/// Largest `len1 + len2` that is searched; longer spans fall back to
/// deleting then inserting everything.
pub const MAX_ALIGNED_SPAN: usize = 15;

/// Aligns a span by maximizing the mean pairwise similarity along the path.
///
/// `similarity` must return values in `[0, 1]`. Pairs scoring at least the
/// threshold may be aligned as Modify; everything else is an Insert or a
/// Delete.
#[derive(Clone, Copy)]
pub struct SimilarityAligner<F> {
    similarity: F,
    threshold: f64,
}

impl<F> SimilarityAligner<F> {
    pub fn new(similarity: F) -> Self {
        Self {
            similarity,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl<F> std::fmt::Debug for SimilarityAligner<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityAligner")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl<T, F: Fn(&T, &T) -> f64> Aligner<T> for SimilarityAligner<F> {
    fn align<'a>(
        &self,
        seq1: &'a [T],
        start1: usize,
        len1: usize,
        seq2: &'a [T],
        start2: usize,
        len2: usize,
    ) -> Result<Vec<DiffElement<'a, T>>, DiffError> {
        check_span(seq1, start1, len1, seq2, start2, len2)?;
        if self.threshold.is_nan() {
            return Err(DiffError::InvalidThreshold(self.threshold));
        }

        if len1 == 0 || len2 == 0 || len1 + len2 > MAX_ALIGNED_SPAN {
            if len1 > 0 && len2 > 0 {
                log::debug!(
                    "span {len1}x{len2} exceeds {MAX_ALIGNED_SPAN} elements, using delete+insert"
                );
            }
            let mut out = Vec::with_capacity(len1 + len2);
            push_deletes(&mut out, seq1, start1..start1 + len1);
            push_inserts(&mut out, seq2, start2..start2 + len2);
            return Ok(out);
        }

        let table = self.fill(&seq1[start1..start1 + len1], &seq2[start2..start2 + len2])?;
        table.walk(seq1, start1, seq2, start2)
    }
}

// ---------------------------------------------------------------------------
// Decision table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    End,
    Insert,
    Delete,
    Modify,
}

/// Best continuation from one node to the corner.
#[derive(Debug, Clone, Copy)]
struct Node {
    step: Step,
    /// Summed similarity of the remaining steps.
    cumulative: f64,
    /// Number of remaining steps.
    count: usize,
}

impl Node {
    fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.cumulative / self.count as f64
        }
    }

    fn after(next: &Node, step: Step, similarity: f64) -> Self {
        Self {
            step,
            cumulative: similarity + next.cumulative,
            count: next.count + 1,
        }
    }
}

/// Flat arena of decision nodes, row-major over `(len1 + 1) x (len2 + 1)`.
struct Table {
    len1: usize,
    len2: usize,
    nodes: Vec<Option<Node>>,
}

impl Table {
    fn new(len1: usize, len2: usize) -> Self {
        Self {
            len1,
            len2,
            nodes: vec![None; (len1 + 1) * (len2 + 1)],
        }
    }

    fn slot(&self, i: usize, j: usize) -> usize {
        i * (self.len2 + 1) + j
    }

    fn get(&self, i: usize, j: usize) -> Result<Node, DiffError> {
        self.nodes
            .get(self.slot(i, j))
            .copied()
            .flatten()
            .ok_or_else(|| DiffError::Invariant(format!("alignment node ({i}, {j}) undecided")))
    }

    fn set(&mut self, i: usize, j: usize, node: Node) {
        let slot = self.slot(i, j);
        self.nodes[slot] = Some(node);
    }

    /// Follow the decisions from (0, 0) to the corner.
    fn walk<'a, T>(
        &self,
        seq1: &'a [T],
        start1: usize,
        seq2: &'a [T],
        start2: usize,
    ) -> Result<Vec<DiffElement<'a, T>>, DiffError> {
        let mut out = Vec::with_capacity(self.len1 + self.len2);
        let (mut i, mut j) = (0, 0);
        loop {
            let (x, y) = (start1 + i, start2 + j);
            match self.get(i, j)?.step {
                Step::End => break,
                Step::Insert => {
                    out.push(DiffElement::inserted(y, &seq2[y]));
                    j += 1;
                }
                Step::Delete => {
                    out.push(DiffElement::deleted(x, &seq1[x]));
                    i += 1;
                }
                Step::Modify => {
                    out.push(DiffElement::paired(
                        x,
                        &seq1[x],
                        y,
                        &seq2[y],
                        DiffOperation::Modify,
                    ));
                    i += 1;
                    j += 1;
                }
            }
        }
        if (i, j) != (self.len1, self.len2) {
            return Err(DiffError::Invariant(format!(
                "alignment stopped at ({i}, {j}) of ({}, {})",
                self.len1, self.len2
            )));
        }
        Ok(out)
    }
}

impl<F> SimilarityAligner<F> {
    fn fill<T>(&self, span1: &[T], span2: &[T]) -> Result<Table, DiffError>
    where
        F: Fn(&T, &T) -> f64,
    {
        let (len1, len2) = (span1.len(), span2.len());
        let mut table = Table::new(len1, len2);
        log::trace!("alignment table {}x{}", len1 + 1, len2 + 1);

        for i in (0..=len1).rev() {
            for j in (0..=len2).rev() {
                let node = if i == len1 && j == len2 {
                    Node {
                        step: Step::End,
                        cumulative: 0.0,
                        count: 0,
                    }
                } else if i == len1 {
                    Node::after(&table.get(i, j + 1)?, Step::Insert, 0.0)
                } else if j == len2 {
                    Node::after(&table.get(i + 1, j)?, Step::Delete, 0.0)
                } else {
                    let insert = Node::after(&table.get(i, j + 1)?, Step::Insert, 0.0);
                    let delete = Node::after(&table.get(i + 1, j)?, Step::Delete, 0.0);

                    let mut best = delete;
                    if insert.average() > best.average() {
                        best = insert;
                    }

                    let similarity = (self.similarity)(&span1[i], &span2[j]);
                    if similarity >= self.threshold {
                        // Accumulates along the diagonal it steps to: the
                        // average stays the mean of the path actually taken.
                        let modify =
                            Node::after(&table.get(i + 1, j + 1)?, Step::Modify, similarity);
                        if modify.average() > best.average() {
                            best = modify;
                        }
                    }
                    best
                };
                table.set(i, j, node);
            }
        }
        Ok(table)
    }
}
