// Element comparison for the diff engine.
//
// The matcher buckets candidates by hash and confirms them by equality, so a
// comparer has to provide both, and equal elements must hash equally.

use std::hash::{DefaultHasher, Hash, Hasher};

// ---------------------------------------------------------------------------
// Comparer trait
// ---------------------------------------------------------------------------

/// Equality and hashing used to decide whether two elements match.
///
/// Implementations must be consistent: `equals(a, b)` implies
/// `hash(a) == hash(b)`.
pub trait Comparer<T: ?Sized> {
    /// Whether `a` and `b` are considered the same element.
    fn equals(&self, a: &T, b: &T) -> bool;

    /// Bucket hash for `value`.
    fn hash(&self, value: &T) -> u64;
}

impl<T: ?Sized, C: Comparer<T> + ?Sized> Comparer<T> for &C {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        (**self).hash(value)
    }
}

// ---------------------------------------------------------------------------
// Built-in comparers
// ---------------------------------------------------------------------------

/// Compares with `Eq` and hashes with `Hash`.
///
/// Uses `DefaultHasher::new()`, whose keys are fixed, so hashes are stable
/// for the lifetime of the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultComparer;

impl<T: Eq + Hash + ?Sized> Comparer<T> for DefaultComparer {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        hash_one(value)
    }
}

/// Compares elements through a projected key.
///
/// ```
/// use seqdiff::compare::{Comparer, KeyComparer};
///
/// let cmp = KeyComparer::new(|c: &char| c.to_ascii_lowercase());
/// assert!(cmp.equals(&'A', &'a'));
/// assert_eq!(cmp.hash(&'A'), cmp.hash(&'a'));
/// ```
#[derive(Clone, Copy)]
pub struct KeyComparer<F> {
    key: F,
}

impl<F> KeyComparer<F> {
    pub fn new(key: F) -> Self {
        Self { key }
    }
}

impl<F> std::fmt::Debug for KeyComparer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyComparer").finish_non_exhaustive()
    }
}

impl<T: ?Sized, K: Eq + Hash, F: Fn(&T) -> K> Comparer<T> for KeyComparer<F> {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.key)(a) == (self.key)(b)
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        hash_one(&(self.key)(value))
    }
}

fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_comparer_is_consistent() {
        let cmp = DefaultComparer;
        assert!(cmp.equals("abc", "abc"));
        assert!(!cmp.equals("abc", "abd"));
        assert_eq!(cmp.hash("abc"), cmp.hash("abc"));
    }

    #[test]
    fn default_comparer_handles_absent_elements() {
        let cmp = DefaultComparer;
        let none: Option<&str> = None;
        assert!(cmp.equals(&none, &None));
        assert!(!cmp.equals(&none, &Some("x")));
    }

    #[test]
    fn key_comparer_case_insensitive() {
        let cmp = KeyComparer::new(|s: &String| s.to_lowercase());
        let a = "Hello".to_string();
        let b = "hELLO".to_string();
        assert!(cmp.equals(&a, &b));
        assert_eq!(cmp.hash(&a), cmp.hash(&b));
    }

    #[test]
    fn comparer_by_reference() {
        fn same<C: Comparer<u32>>(cmp: C) -> bool {
            cmp.equals(&7, &7)
        }
        let cmp = DefaultComparer;
        assert!(same(&cmp));
    }
}
