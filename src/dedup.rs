//! Collapse suggestions that describe the same edit.
//!
//! Independent rules routinely fire on the same span (a specific grammar
//! rule and the generic pronoun check, say). Applying both would edit one
//! location twice, so a later suggestion is dropped when it duplicates any
//! suggestion already kept. Used for local-only scans and for merging
//! remote suggestions into local ones.

use crate::suggestion::{normalize, Suggestion};

/// Drop no-ops and later duplicates, preserving first-seen order.
pub fn dedupe<I>(suggestions: I, tolerance: usize) -> Vec<Suggestion>
where
    I: IntoIterator<Item = Suggestion>,
{
    let mut kept: Vec<Suggestion> = Vec::new();
    for suggestion in suggestions {
        if suggestion.is_no_op() {
            continue;
        }
        if kept
            .iter()
            .any(|prev| is_duplicate(prev, &suggestion, tolerance))
        {
            continue;
        }
        kept.push(suggestion);
    }
    kept
}

/// Whether `later` repeats `earlier`. Symmetric in its two suggestions.
pub fn is_duplicate(earlier: &Suggestion, later: &Suggestion, tolerance: usize) -> bool {
    let near = earlier.span.is_near(&later.span, tolerance);
    if !near {
        return false;
    }

    let same_proposal = normalize(&earlier.proposed_text) == normalize(&later.proposed_text);
    let exact = same_proposal && normalize(&earlier.matched_text) == normalize(&later.matched_text);

    let similar_meaning = earlier.category == later.category
        && (mentions(&earlier.explanation, &later.matched_text)
            || mentions(&later.explanation, &earlier.matched_text));

    exact || similar_meaning || same_proposal
}

/// Shortest matched text that can count as mentioned in an explanation.
const MIN_MENTION_CHARS: usize = 3;

/// `haystack` contains `needle` as whole words, ignoring case.
fn mentions(haystack: &str, needle: &str) -> bool {
    let needle = normalize(needle);
    if needle.chars().count() < MIN_MENTION_CHARS {
        return false;
    }
    let haystack = normalize(haystack);
    let is_word = |c: char| c.is_alphanumeric() || c == '\'';
    haystack.match_indices(&needle).any(|(at, _)| {
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + needle.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}
