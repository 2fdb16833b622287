// Text similarity and the string aligner built on it.
//
// Two strings are as similar as the share of characters the section planner
// matches between them: 2 * matched / (len1 + len2). An absent string counts
// as empty.

use crate::compare::DefaultComparer;
use crate::element::DiffElement;
use crate::error::DiffError;
use crate::options::DiffOptions;
use crate::sections;

use super::Aligner;
use super::similarity::{DEFAULT_THRESHOLD, SimilarityAligner};

/// Elements that may carry a piece of text.
pub trait Text {
    /// The text, or `None` when the element is absent.
    fn as_text(&self) -> Option<&str>;
}

impl Text for String {
    fn as_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Text for &str {
    fn as_text(&self) -> Option<&str> {
        Some(*self)
    }
}

impl Text for Box<str> {
    fn as_text(&self) -> Option<&str> {
        Some(&**self)
    }
}

impl<S: AsRef<str>> Text for Option<S> {
    fn as_text(&self) -> Option<&str> {
        self.as_ref().map(|s| s.as_ref())
    }
}

/// Similarity of two optional strings in `[0, 1]`.
///
/// Equal strings (including two empty or absent ones) score 1.0; an empty
/// string against a non-empty one scores 0.0.
pub fn string_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    let (a, b) = (a.unwrap_or(""), b.unwrap_or(""));
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let matched: usize = sections::plan(&a, &b, DiffOptions::default(), DefaultComparer)
        .filter(|s| s.is_match)
        .map(|s| s.length1)
        .sum();
    (matched * 2) as f64 / (a.len() + b.len()) as f64
}

/// Similarity aligner for text elements, scored by [`string_similarity`].
#[derive(Debug, Clone, Copy)]
pub struct StringSimilarityAligner {
    pub threshold: f64,
}

impl Default for StringSimilarityAligner {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl StringSimilarityAligner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

impl<T: Text> Aligner<T> for StringSimilarityAligner {
    fn align<'a>(
        &self,
        seq1: &'a [T],
        start1: usize,
        len1: usize,
        seq2: &'a [T],
        start2: usize,
        len2: usize,
    ) -> Result<Vec<DiffElement<'a, T>>, DiffError> {
        SimilarityAligner::new(|a: &T, b: &T| string_similarity(a.as_text(), b.as_text()))
            .with_threshold(self.threshold)
            .align(seq1, start1, len1, seq2, start2, len2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::DiffOperation;

    #[test]
    fn similarity_values() {
        assert_eq!(string_similarity(None, None), 1.0);
        assert_eq!(string_similarity(Some(""), None), 1.0);
        assert_eq!(string_similarity(Some("abc"), Some("abc")), 1.0);
        assert_eq!(string_similarity(Some("abc"), None), 0.0);
        assert_eq!(string_similarity(None, Some("abc")), 0.0);
        assert!((string_similarity(Some("Line 2"), Some("Line+2")) - 5.0 / 6.0).abs() < 1e-9);
        assert!((string_similarity(Some("Line 2"), Some("Something else")) - 0.3).abs() < 1e-9);
        assert_eq!(string_similarity(Some("abc"), Some("xyz")), 0.0);
    }

    #[test]
    fn identical_lines_are_modifications() {
        let lines = ["Line 1", "Line 2", "Line 3"];
        let out = StringSimilarityAligner::new()
            .align(&lines, 0, 3, &lines, 0, 3)
            .unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|e| e.operation == DiffOperation::Modify));
    }

    #[test]
    fn absent_lines_pair_up() {
        let a = [Some("Line 1"), Some("Line 2"), None, Some("Line 3")];
        let b = [Some("Line 1"), Some("Line+2"), None, Some("Line 3")];
        let out = StringSimilarityAligner::new().align(&a, 0, 4, &b, 0, 4).unwrap();
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|e| e.operation == DiffOperation::Modify));
        assert_eq!(out[2].value1, Some(&None));
    }

    #[test]
    fn dissimilar_line_is_deleted_and_inserted() {
        let a = ["Line 1", "Line 2", "Line 3"];
        let b = ["Line 1", "Something else", "Line 3"];
        let out = StringSimilarityAligner::new()
            .align(&a, 0, 3, &b, 0, 3)
            .unwrap();
        let got: Vec<_> = out
            .iter()
            .map(|e| (e.operation, e.index1, e.index2))
            .collect();
        use DiffOperation::*;
        assert_eq!(
            got,
            vec![
                (Modify, Some(0), Some(0)),
                (Delete, Some(1), None),
                (Insert, None, Some(1)),
                (Modify, Some(2), Some(2)),
            ]
        );
        assert_eq!(out[1].value1, Some(&"Line 2"));
        assert_eq!(out[2].value2, Some(&"Something else"));
    }

    #[test]
    fn owned_strings_are_text() {
        let a = vec!["abc".to_string()];
        let b = vec!["abd".to_string()];
        let out = StringSimilarityAligner::new().align(&a, 0, 1, &b, 0, 1).unwrap();
        assert_eq!(out[0].operation, DiffOperation::Modify);
    }
}
