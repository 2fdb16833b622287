// Element-level diff output.
//
// A `DiffElement` records how one position of the first sequence corresponds
// to one position of the second, or that a position exists on one side only.

use std::fmt;

/// How an element of the first sequence relates to one of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffOperation {
    /// Both elements are equal under the comparer.
    Match,
    /// Element present only in the second sequence.
    Insert,
    /// Element present only in the first sequence.
    Delete,
    /// The first element was replaced by an unrelated second element.
    Replace,
    /// The first element was edited into a similar second element.
    Modify,
}

impl DiffOperation {
    /// Whether this operation carries an element from the first sequence.
    pub fn has_first(self) -> bool {
        !matches!(self, Self::Insert)
    }

    /// Whether this operation carries an element from the second sequence.
    pub fn has_second(self) -> bool {
        !matches!(self, Self::Delete)
    }
}

impl fmt::Display for DiffOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Match => "match",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Replace => "replace",
            Self::Modify => "modify",
        })
    }
}

/// One aligned correspondence between the two sequences.
///
/// Match, Replace and Modify carry both sides; Insert carries only the
/// second sequence, Delete only the first. Values borrow from the input
/// sequences.
#[derive(Debug, PartialEq)]
pub struct DiffElement<'a, T> {
    pub index1: Option<usize>,
    pub value1: Option<&'a T>,
    pub index2: Option<usize>,
    pub value2: Option<&'a T>,
    pub operation: DiffOperation,
}

// Manual impls: the derive would require `T: Clone`.
impl<T> Clone for DiffElement<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DiffElement<'_, T> {}

impl<'a, T> DiffElement<'a, T> {
    /// Both sides present; `operation` must be Match, Replace or Modify.
    pub fn paired(
        index1: usize,
        value1: &'a T,
        index2: usize,
        value2: &'a T,
        operation: DiffOperation,
    ) -> Self {
        debug_assert!(operation.has_first() && operation.has_second());
        Self {
            index1: Some(index1),
            value1: Some(value1),
            index2: Some(index2),
            value2: Some(value2),
            operation,
        }
    }

    pub fn matched(index1: usize, value1: &'a T, index2: usize, value2: &'a T) -> Self {
        Self::paired(index1, value1, index2, value2, DiffOperation::Match)
    }

    pub fn inserted(index2: usize, value2: &'a T) -> Self {
        Self {
            index1: None,
            value1: None,
            index2: Some(index2),
            value2: Some(value2),
            operation: DiffOperation::Insert,
        }
    }

    pub fn deleted(index1: usize, value1: &'a T) -> Self {
        Self {
            index1: Some(index1),
            value1: Some(value1),
            index2: None,
            value2: None,
            operation: DiffOperation::Delete,
        }
    }

    /// The value this element contributes when diffs are compared against
    /// each other: the first-sequence value if present, else the second.
    pub fn contributed(&self) -> Option<&'a T> {
        self.value1.or(self.value2)
    }
}

impl<T: fmt::Display> fmt::Display for DiffElement<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<&T>| v.map(ToString::to_string).unwrap_or_default();
        let (a, b) = (show(self.value1), show(self.value2));
        match self.operation {
            DiffOperation::Match => write!(f, "same: {a}"),
            DiffOperation::Insert => write!(f, "insert: {b}"),
            DiffOperation::Delete => write!(f, "delete: {a}"),
            DiffOperation::Replace => write!(f, "replace: {a} with: {b}"),
            DiffOperation::Modify => write!(f, "modify: {a} to: {b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_fill_the_right_sides() {
        let (a, b) = ('a', 'b');
        let ins = DiffElement::inserted(3, &b);
        assert_eq!(ins.index1, None);
        assert_eq!(ins.value2, Some(&'b'));
        assert_eq!(ins.contributed(), Some(&'b'));

        let del = DiffElement::deleted(1, &a);
        assert_eq!(del.index2, None);
        assert_eq!(del.contributed(), Some(&'a'));

        let modify = DiffElement::paired(0, &a, 0, &b, DiffOperation::Modify);
        assert_eq!(modify.contributed(), Some(&'a'));
    }

    #[test]
    fn display_formats() {
        let (a, b) = ("old", "new");
        assert_eq!(DiffElement::matched(0, &a, 0, &a).to_string(), "same: old");
        assert_eq!(DiffElement::inserted(0, &b).to_string(), "insert: new");
        assert_eq!(DiffElement::deleted(0, &a).to_string(), "delete: old");
        assert_eq!(
            DiffElement::paired(0, &a, 0, &b, DiffOperation::Replace).to_string(),
            "replace: old with: new"
        );
        assert_eq!(
            DiffElement::paired(0, &a, 0, &b, DiffOperation::Modify).to_string(),
            "modify: old to: new"
        );
    }

    #[test]
    fn operation_sides() {
        assert!(!DiffOperation::Insert.has_first());
        assert!(!DiffOperation::Delete.has_second());
        assert!(DiffOperation::Modify.has_first() && DiffOperation::Modify.has_second());
    }
}
