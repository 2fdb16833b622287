// Error types shared by the planner, the aligners and the merge engine.

use std::fmt;

use thiserror::Error;

use crate::element::DiffOperation;

// ---------------------------------------------------------------------------
// Diff errors
// ---------------------------------------------------------------------------

/// Errors raised while planning sections or aligning elements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiffError {
    /// `DiffOptions::context_size` was below 1.
    #[error("context size must be at least 1, got {0}")]
    InvalidContextSize(usize),

    /// The modification threshold of a similarity aligner was NaN.
    #[error("modification threshold must be a number, got {0}")]
    InvalidThreshold(f64),

    /// The sections handed to `align_elements` consume more elements than a
    /// sequence holds.
    #[error(
        "sections overrun the input: need {needed1}/{needed2} elements, have {len1}/{len2}"
    )]
    SectionOverrun {
        needed1: usize,
        needed2: usize,
        len1: usize,
        len2: usize,
    },

    /// An aligner was asked to cover a span outside its sequences.
    #[error(
        "alignment span [{start1}, {start1}+{len1}) x [{start2}, {start2}+{len2}) is out of bounds"
    )]
    SpanOutOfBounds {
        start1: usize,
        len1: usize,
        start2: usize,
        len2: usize,
    },

    /// Internal consistency failure; never expected under correct use.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

// ---------------------------------------------------------------------------
// Merge conflicts
// ---------------------------------------------------------------------------

/// Why a merge could not produce output for a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConflictReason {
    /// An insertion lined up with an operation on the other side, another
    /// insertion included; there is no base position to resolve against.
    #[error("unable to reconcile {left} on the left with {right} on the right")]
    Unreconcilable {
        left: DiffOperation,
        right: DiffOperation,
    },

    /// The conflict resolver refused to pick a resolution.
    #[error("conflict resolver declined")]
    Declined,
}

/// An unresolved merge conflict with the fragments that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConflict<T> {
    pub reason: ConflictReason,
    pub common_base: Vec<T>,
    pub left: Vec<T>,
    pub right: Vec<T>,
}

impl<T: Clone> MergeConflict<T> {
    /// A conflict raised by a resolver that refuses the given fragments.
    pub fn declined(common_base: &[T], left: &[T], right: &[T]) -> Self {
        Self {
            reason: ConflictReason::Declined,
            common_base: common_base.to_vec(),
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }
}

impl<T> fmt::Display for MergeConflict<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "merge conflict: {} (base: {} element(s), left: {}, right: {})",
            self.reason,
            self.common_base.len(),
            self.left.len(),
            self.right.len()
        )
    }
}

impl<T: fmt::Debug> std::error::Error for MergeConflict<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

// ---------------------------------------------------------------------------
// Merge errors
// ---------------------------------------------------------------------------

/// Errors raised by the merge engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeError<T> {
    /// A conflict nobody resolved; no merged output is produced.
    Conflict(MergeConflict<T>),
    /// Planning or alignment of one of the underlying diffs failed.
    Diff(DiffError),
}

impl<T> MergeError<T> {
    /// The conflict carried by this error, if any.
    pub fn conflict(&self) -> Option<&MergeConflict<T>> {
        match self {
            Self::Conflict(c) => Some(c),
            Self::Diff(_) => None,
        }
    }
}

impl<T> fmt::Display for MergeError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict(c) => c.fmt(f),
            Self::Diff(e) => write!(f, "diff error: {e}"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for MergeError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Conflict(c) => Some(&c.reason),
            Self::Diff(e) => Some(e),
        }
    }
}

impl<T> From<DiffError> for MergeError<T> {
    fn from(e: DiffError) -> Self {
        Self::Diff(e)
    }
}

impl<T> From<MergeConflict<T>> for MergeError<T> {
    fn from(c: MergeConflict<T>) -> Self {
        Self::Conflict(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declined_conflict_copies_fragments() {
        let c = MergeConflict::declined(&["b"], &["l"], &[]);
        assert_eq!(c.reason, ConflictReason::Declined);
        assert_eq!(c.common_base, vec!["b"]);
        assert_eq!(c.left, vec!["l"]);
        assert!(c.right.is_empty());
    }

    #[test]
    fn display_mentions_operations() {
        let c: MergeConflict<char> = MergeConflict {
            reason: ConflictReason::Unreconcilable {
                left: DiffOperation::Insert,
                right: DiffOperation::Delete,
            },
            common_base: vec![],
            left: vec!['x'],
            right: vec![],
        };
        let text = MergeError::Conflict(c).to_string();
        assert!(text.contains("insert"), "{text}");
        assert!(text.contains("delete"), "{text}");
    }

    #[test]
    fn diff_error_converts_into_merge_error() {
        let e: MergeError<u8> = DiffError::InvalidContextSize(0).into();
        assert!(e.conflict().is_none());
        assert_eq!(e.to_string(), "diff error: context size must be at least 1, got 0");
    }
}
