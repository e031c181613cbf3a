//! Autocorrection engine.
//!
//! Fixes are plain byte-range replacements. [`resolve`] picks a
//! non-overlapping subset in source order and [`apply`] produces the corrected
//! text. Neither touches the filesystem.

use tracing::debug;

use crate::types::{Fix, Offense, TextRange};

/// A correction accepted for application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Byte range to replace.
    pub range: TextRange,
    /// Replacement text.
    pub replacement: String,
    /// Name of the rule that produced the fix.
    pub rule: String,
}

/// Errors raised when applying edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutocorrectError {
    /// An edit does not fit the source it is applied to.
    #[error("edit {start}..{end} from {rule} does not fit a source of {len} bytes")]
    OutOfBounds {
        /// Edit start.
        start: usize,
        /// Edit end.
        end: usize,
        /// Source length.
        len: usize,
        /// Rule that produced the edit.
        rule: String,
    },
}

/// Returns the correction an offense would apply, if any.
#[must_use]
pub fn compute_fix(offense: &Offense) -> Option<&Fix> {
    offense.fix.as_ref().filter(|_| !offense.fix_conflict)
}

/// Selects a non-overlapping set of fixes.
///
/// Fixes are considered by start offset (ties broken by report order). A fix
/// overlapping an already accepted one is dropped: its offense keeps
/// `fix = None` and gets `fix_conflict = true`.
pub fn resolve(offenses: &mut [Offense]) -> Vec<Edit> {
    let mut candidates: Vec<(TextRange, usize)> = offenses
        .iter()
        .enumerate()
        .filter_map(|(index, o)| o.fix.as_ref().map(|f| (f.range, index)))
        .collect();
    candidates.sort_by_key(|&(range, index)| (range.start, range.end, index));

    let mut edits: Vec<Edit> = Vec::new();
    for (range, index) in candidates {
        let offense = &mut offenses[index];
        if edits.last().is_some_and(|last| last.range.overlaps(&range)) {
            debug!(
                "Dropping fix from {} at line {}: overlaps another fix",
                offense.rule, offense.location.line
            );
            offense.fix = None;
            offense.fix_conflict = true;
            continue;
        }
        if let Some(fix) = &offense.fix {
            edits.push(Edit {
                range,
                replacement: fix.replacement.clone(),
                rule: offense.rule.clone(),
            });
        }
    }
    edits
}

/// Applies resolved edits to `source`.
///
/// # Errors
///
/// Returns an error if an edit lies outside the source or splits a
/// character.
pub fn apply(source: &str, edits: &[Edit]) -> Result<String, AutocorrectError> {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|e| (e.range.start, e.range.end));

    let mut output = source.to_string();
    for edit in ordered.into_iter().rev() {
        let TextRange { start, end } = edit.range;
        let fits = start <= end
            && end <= source.len()
            && source.is_char_boundary(start)
            && source.is_char_boundary(end);
        if !fits {
            return Err(AutocorrectError::OutOfBounds {
                start,
                end,
                len: source.len(),
                rule: edit.rule.clone(),
            });
        }
        output.replace_range(start..end, &edit.replacement);
    }
    Ok(output)
}
