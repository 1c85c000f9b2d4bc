//! Row and column labels.
//!
//! A label slot is either present text or absent, modelled as
//! `Option<String>`. For equality and ordering an absent label behaves like
//! the empty string; for the "fully labelled" predicates both count as
//! missing.
//!
//! Label search and replace goes through the [`LabelMatcher`] trait, with a
//! literal implementation and one backed by [`regex::Regex`].

use std::borrow::Cow;
use std::cmp::Ordering;

use regex::Regex;

use crate::error::{Result, TableError};

/// Glyph shown in place of an absent label when labels are rendered.
pub const ABSENT_PLACEHOLDER: &str = "?";

/// One label slot.
pub type Label = Option<String>;

/// Text of a label, with absent mapped to `""`.
pub fn text(label: &Label) -> &str {
    label.as_deref().unwrap_or("")
}

/// `true` when the label is present and non-empty.
pub fn is_present(label: &Label) -> bool {
    !text(label).is_empty()
}

/// Label equality with absent == `""`.
pub fn equal(a: &Label, b: &Label) -> bool {
    text(a) == text(b)
}

/// Code-point ordering of labels with absent sorting as `""`.
pub fn compare(a: &Label, b: &Label) -> Ordering {
    text(a).cmp(text(b))
}

/// Element-wise [`equal`] over two label sequences of the same length.
pub fn all_equal(a: &[Label], b: &[Label]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equal(x, y))
}

/// Labels rendered for display, absent ones as [`ABSENT_PLACEHOLDER`].
pub fn rendered(labels: &[Label]) -> Vec<String> {
    labels
        .iter()
        .map(|l| l.clone().unwrap_or_else(|| ABSENT_PLACEHOLDER.to_string()))
        .collect()
}

/// `prefix<number>`, `prefix<number + increment>`, ...
pub(crate) fn sequential(prefix: &str, number: i64, increment: i64, count: usize) -> Vec<Label> {
    (0..count as i64)
        .map(|k| Some(format!("{prefix}{}", number + k * increment)))
        .collect()
}

// ---------------------------------------------------------------------------
// Search and replace
// ---------------------------------------------------------------------------

/// Matching service used by label search and replace.
pub trait LabelMatcher {
    /// Whether the label as a whole counts as a match when counting.
    fn matches_label(&self, label: &str) -> bool;

    /// Replaces at most `limit` occurrences (`0` = all) inside `label`.
    ///
    /// Returns the new text and the number of occurrences replaced.
    fn replace_in<'a>(&self, label: &'a str, replacement: &str, limit: usize)
        -> (Cow<'a, str>, usize);
}

/// Plain text matcher: whole-label equality when counting, substring
/// occurrences when replacing.
#[derive(Debug, Clone, Copy)]
pub struct Literal<'s>(pub &'s str);

impl LabelMatcher for Literal<'_> {
    fn matches_label(&self, label: &str) -> bool {
        !self.0.is_empty() && label == self.0
    }

    fn replace_in<'a>(
        &self,
        label: &'a str,
        replacement: &str,
        limit: usize,
    ) -> (Cow<'a, str>, usize) {
        if self.0.is_empty() {
            return (Cow::Borrowed(label), 0);
        }
        let found = label.matches(self.0).count();
        let n = if limit == 0 { found } else { found.min(limit) };
        if n == 0 {
            return (Cow::Borrowed(label), 0);
        }
        (Cow::Owned(label.replacen(self.0, replacement, n)), n)
    }
}

impl LabelMatcher for Regex {
    fn matches_label(&self, label: &str) -> bool {
        self.is_match(label)
    }

    fn replace_in<'a>(
        &self,
        label: &'a str,
        replacement: &str,
        limit: usize,
    ) -> (Cow<'a, str>, usize) {
        let found = self.find_iter(label).count();
        let n = if limit == 0 { found } else { found.min(limit) };
        if n == 0 {
            return (Cow::Borrowed(label), 0);
        }
        (self.replacen(label, n, replacement), n)
    }
}

/// Builds a matcher for `search`, literal or regular expression.
///
/// # Errors
/// [`TableError::InvalidPattern`] if `use_regex` and the pattern is invalid.
pub fn matcher(search: &str, use_regex: bool) -> Result<Box<dyn LabelMatcher + '_>> {
    if use_regex {
        let re = Regex::new(search).map_err(|e| TableError::InvalidPattern(e.to_string()))?;
        Ok(Box::new(re))
    } else {
        Ok(Box::new(Literal(search)))
    }
}

/// Counts of a search-and-replace pass over a label sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelReplacement {
    /// Total occurrences replaced.
    pub matches: usize,
    /// Number of labels that changed.
    pub labels_changed: usize,
}

/// Applies `matcher` to every present label, returning the new labels.
pub fn search_and_replace(
    labels: &[Label],
    matcher: &dyn LabelMatcher,
    replacement: &str,
    limit: usize,
) -> (Vec<Label>, LabelReplacement) {
    let mut stats = LabelReplacement::default();
    let out = labels
        .iter()
        .map(|label| match label {
            None => None,
            Some(s) => {
                let (new, n) = matcher.replace_in(s, replacement, limit);
                if n > 0 {
                    stats.matches += n;
                    stats.labels_changed += 1;
                }
                Some(new.into_owned())
            }
        })
        .collect();
    (out, stats)
}

/// Number of present labels that match.
pub fn count_matches(labels: &[Label], matcher: &dyn LabelMatcher) -> usize {
    labels
        .iter()
        .flatten()
        .filter(|s| matcher.matches_label(s))
        .count()
}
