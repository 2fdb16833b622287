// Pass-through aligners that never look at element values.

use crate::element::{DiffElement, DiffOperation};
use crate::error::DiffError;

use super::{Aligner, check_span};

/// Deletes the whole first side, then inserts the whole second side.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertDeleteAligner;

impl<T> Aligner<T> for InsertDeleteAligner {
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
        let mut out = Vec::with_capacity(len1 + len2);
        push_deletes(&mut out, seq1, start1..start1 + len1);
        push_inserts(&mut out, seq2, start2..start2 + len2);
        Ok(out)
    }
}

/// Pairs positions up as Replace while both sides last, then deletes or
/// inserts whatever is left over.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceInsertDeleteAligner;

impl<T> Aligner<T> for ReplaceInsertDeleteAligner {
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
        let paired = len1.min(len2);
        let mut out = Vec::with_capacity(len1.max(len2));
        for k in 0..paired {
            let (i, j) = (start1 + k, start2 + k);
            out.push(DiffElement::paired(
                i,
                &seq1[i],
                j,
                &seq2[j],
                DiffOperation::Replace,
            ));
        }
        push_deletes(&mut out, seq1, start1 + paired..start1 + len1);
        push_inserts(&mut out, seq2, start2 + paired..start2 + len2);
        Ok(out)
    }
}

pub(crate) fn push_deletes<'a, T>(
    out: &mut Vec<DiffElement<'a, T>>,
    seq1: &'a [T],
    range: std::ops::Range<usize>,
) {
    out.extend(range.map(|i| DiffElement::deleted(i, &seq1[i])));
}

pub(crate) fn push_inserts<'a, T>(
    out: &mut Vec<DiffElement<'a, T>>,
    seq2: &'a [T],
    range: std::ops::Range<usize>,
) {
    out.extend(range.map(|j| DiffElement::inserted(j, &seq2[j])));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::diff;
    use crate::compare::DefaultComparer;
    use crate::options::DiffOptions;

    // '-' match, 'I' insert, 'D' delete, 'R' replace.
    fn ops<A: Aligner<char>>(a: &str, b: &str, aligner: A) -> String {
        let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
        diff(&a, &b, &DiffOptions::default(), DefaultComparer, aligner)
            .unwrap()
            .iter()
            .map(|e| match e.operation {
                DiffOperation::Match => '-',
                DiffOperation::Insert => 'I',
                DiffOperation::Delete => 'D',
                DiffOperation::Replace => 'R',
                DiffOperation::Modify => 'M',
            })
            .collect()
    }

    #[test]
    fn insert_delete_cases() {
        let cases = [
            ("TEST123456XYZ", "TEST456123XYZ", "----III---DDD---"),
            ("ABC", "XbY", "DDDIII"),
            ("123", "124", "--DI"),
            ("123", "1123", "-I--"),
            ("123", "0123", "I---"),
            ("123", "1233", "---I"),
            ("ABCDEF", "ABxcyDEF", "--DIII---"),
            ("ABCDEFGH", "A1B2C3D4E5F6G7H", "-I-I-I-I-I-I-I-"),
            ("123", "13", "-D-"),
        ];
        for (a, b, expected) in cases {
            assert_eq!(ops(a, b, InsertDeleteAligner), expected, "{a} -> {b}");
        }
    }

    #[test]
    fn replace_insert_delete_cases() {
        let cases = [
            ("ABC", "XbY", "RRR"),
            ("123", "1245", "--RI"),
            ("123", "456789", "RRRIII"),
            ("ABCDEF", "ABxcyDEF", "--RII---"),
        ];
        for (a, b, expected) in cases {
            assert_eq!(ops(a, b, ReplaceInsertDeleteAligner), expected, "{a} -> {b}");
        }
    }

    #[test]
    fn replace_pairs_values_in_order() {
        let a = ['a', 'b', 'c'];
        let b = ['x'];
        let out = ReplaceInsertDeleteAligner.align(&a, 0, 3, &b, 0, 1).unwrap();
        assert_eq!(out[0].value1, Some(&'a'));
        assert_eq!(out[0].value2, Some(&'x'));
        assert_eq!(out[1], DiffElement::deleted(1, &'b'));
        assert_eq!(out[2], DiffElement::deleted(2, &'c'));
    }

    #[test]
    fn out_of_bounds_span_is_rejected() {
        let a = ['a'];
        assert!(matches!(
            InsertDeleteAligner.align(&a, 0, 2, &a, 0, 0),
            Err(DiffError::SpanOutOfBounds { .. })
        ));
    }
}
