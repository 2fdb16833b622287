// Common-run matching between two sequences.
//
// This module provides:
// - A hash-bucketed candidate index over the second sequence
// - Longest common run search with quick rejection of short candidates

pub mod index;
pub mod longest;

pub use longest::{CommonRun, LongestRunMatcher};
