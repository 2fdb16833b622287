// In-place patching of a vector toward another sequence.

use crate::align::{Aligner, diff};
use crate::compare::Comparer;
use crate::element::DiffOperation;
use crate::error::DiffError;
use crate::options::DiffOptions;

/// Edit `target` in place until it equals `source`.
///
/// The edits are the aligned diff from `target` to `source`: matched
/// elements are kept, inserted ones are cloned in from `source`, deleted
/// ones are removed, and replaced or modified ones are overwritten. Kept
/// elements are never moved or cloned.
///
/// ```
/// use seqdiff::align::ReplaceInsertDeleteAligner;
/// use seqdiff::compare::DefaultComparer;
/// use seqdiff::options::DiffOptions;
/// use seqdiff::patch::mutate_to_match;
///
/// let mut target: Vec<char> = "123456789".chars().collect();
/// let source: Vec<char> = "1234x5a6789".chars().collect();
/// mutate_to_match(
///     &mut target,
///     &source,
///     &DiffOptions::default(),
///     DefaultComparer,
///     ReplaceInsertDeleteAligner,
/// )
/// .unwrap();
/// assert_eq!(target, source);
/// ```
pub fn mutate_to_match<T, C, A>(
    target: &mut Vec<T>,
    source: &[T],
    options: &DiffOptions,
    comparer: C,
    aligner: A,
) -> Result<(), DiffError>
where
    T: Clone,
    C: Comparer<T>,
    A: Aligner<T>,
{
    let edits: Vec<(DiffOperation, Option<usize>)> =
        diff(target.as_slice(), source, options, comparer, aligner)?
            .into_iter()
            .map(|e| (e.operation, e.index2))
            .collect();

    let value = |index2: Option<usize>| {
        index2
            .and_then(|j| source.get(j))
            .cloned()
            .ok_or_else(|| {
                DiffError::Invariant(format!("edit without a source element: {index2:?}"))
            })
    };

    let mut at = 0;
    let mut changed = 0usize;
    for (operation, index2) in edits {
        if operation != DiffOperation::Insert && at >= target.len() {
            return Err(DiffError::Invariant(format!(
                "{operation} past the end of the target at {at}"
            )));
        }
        match operation {
            DiffOperation::Match => at += 1,
            DiffOperation::Insert => {
                target.insert(at, value(index2)?);
                at += 1;
                changed += 1;
            }
            DiffOperation::Delete => {
                target.remove(at);
                changed += 1;
            }
            DiffOperation::Replace | DiffOperation::Modify => {
                target[at] = value(index2)?;
                at += 1;
                changed += 1;
            }
        }
    }

    log::debug!("patched target with {changed} edit(s), now {} element(s)", target.len());
    Ok(())
}
