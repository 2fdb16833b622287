//! Seqdiff: sequence diff, element alignment and three-way merge.
//!
//! The crate provides:
//! - A section planner that splits two sequences into matched and unmatched
//!   runs (`sections`), built on a longest-common-run matcher (`matcher`)
//! - Pluggable aligners that classify unmatched runs element by element
//!   (`align`), including a similarity-driven one
//! - A three-way merge engine with pluggable conflict resolution (`merge`)
//! - In-place patching of a vector toward another sequence (`patch`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use seqdiff::align::InsertDeleteAligner;
//! use seqdiff::compare::DefaultComparer;
//! use seqdiff::merge::{merge_all, TakeLeft};
//! use seqdiff::options::DiffOptions;
//! use seqdiff::sections::compute_sections;
//!
//! let old: Vec<char> = "abcdef".chars().collect();
//! let new: Vec<char> = "abXdef".chars().collect();
//! let options = DiffOptions::default();
//! let sections: Vec<String> = compute_sections(&old, &new, &options, DefaultComparer)
//!     .unwrap()
//!     .map(|s| s.to_string())
//!     .collect();
//! assert_eq!(sections, ["2 matched", "1 did not match", "3 matched"]);
//!
//! let left: Vec<char> = "aXcdef".chars().collect();
//! let right: Vec<char> = "abcdYf".chars().collect();
//! let merged = merge_all(
//!     &old,
//!     &left,
//!     &right,
//!     &DiffOptions::default(),
//!     InsertDeleteAligner,
//!     TakeLeft,
//!     DefaultComparer,
//! )
//! .unwrap();
//! assert_eq!(merged.into_iter().collect::<String>(), "aXcdYf");
//! ```

pub mod align;
pub mod compare;
pub mod element;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod options;
pub mod patch;
pub mod sections;

#[cfg(feature = "cli")]
pub mod cli;

pub use element::{DiffElement, DiffOperation};
pub use error::{ConflictReason, DiffError, MergeConflict, MergeError};
pub use options::DiffOptions;
pub use sections::DiffSection;
