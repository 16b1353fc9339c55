//! Applying suggestions back to the text they were produced from.

use serde::Serialize;
use tracing::debug;

use crate::suggestion::{Span, Suggestion};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("span {start}..{end} is outside text of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("span {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },

    #[error("expected {expected:?} at span, found {found:?}")]
    TextMismatch { expected: String, found: String },

    #[error("overlaps an edit already applied")]
    Overlap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skipped {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Applied {
    pub text: String,
    /// Ids in the order they were applied.
    pub applied: Vec<String>,
    pub skipped: Vec<Skipped>,
}

/// Check that `suggestion` still describes `text`.
pub fn validate(text: &str, suggestion: &Suggestion) -> Result<(), ApplyError> {
    let Span { start, end } = suggestion.span;
    if start > end || end > text.len() {
        return Err(ApplyError::OutOfBounds {
            start,
            end,
            len: text.len(),
        });
    }
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return Err(ApplyError::NotCharBoundary { start, end });
    }
    let found = &text[start..end];
    if found.to_lowercase() != suggestion.matched_text.to_lowercase() {
        return Err(ApplyError::TextMismatch {
            expected: suggestion.matched_text.clone(),
            found: found.to_string(),
        });
    }
    Ok(())
}

/// Apply a single suggestion.
pub fn apply_one(text: &str, suggestion: &Suggestion) -> Result<String, ApplyError> {
    if suggestion.is_terminal_punctuation() {
        return Ok(suggestion.proposed_text.clone());
    }
    validate(text, suggestion)?;
    let Span { start, end } = suggestion.span;
    let mut out = String::with_capacity(text.len() + suggestion.proposed_text.len());
    out.push_str(&text[..start]);
    out.push_str(&suggestion.proposed_text);
    out.push_str(&text[end..]);
    Ok(out)
}

fn terminate(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.ends_with(['.', '!', '?']) {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

/// Apply every non-conflicting suggestion, rightmost first.
///
/// Spans refer to `text` as given. Edits that fail validation or overlap an
/// applied edit are reported in `skipped`.
pub fn apply_all(text: &str, suggestions: &[Suggestion]) -> Applied {
    let (terminal, mut edits): (Vec<&Suggestion>, Vec<&Suggestion>) = suggestions
        .iter()
        .partition(|s| s.is_terminal_punctuation());
    edits.sort_by(|a, b| {
        b.span
            .start
            .cmp(&a.span.start)
            .then(b.span.end.cmp(&a.span.end))
    });

    let mut result = Applied {
        text: text.to_string(),
        ..Applied::default()
    };
    let mut taken: Vec<Span> = Vec::new();

    for s in edits {
        let outcome = validate(text, s).and_then(|()| {
            if taken.iter().any(|t| t.overlaps(&s.span) || *t == s.span) {
                Err(ApplyError::Overlap)
            } else {
                Ok(())
            }
        });
        match outcome {
            Ok(()) => {
                result
                    .text
                    .replace_range(s.span.start..s.span.end, &s.proposed_text);
                taken.push(s.span);
                result.applied.push(s.id.clone());
            }
            Err(err) => {
                debug!(id = %s.id, %err, "skipping suggestion");
                result.skipped.push(Skipped {
                    id: s.id.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    if let Some((first, rest)) = terminal.split_first() {
        result.text = terminate(&result.text);
        result.applied.push(first.id.clone());
        for dup in rest {
            result.skipped.push(Skipped {
                id: dup.id.clone(),
                reason: ApplyError::Overlap.to_string(),
            });
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::{Category, Severity, ADD_PERIOD};

    fn edit(id: &str, matched: &str, proposed: &str, start: usize, end: usize) -> Suggestion {
        Suggestion {
            id: id.to_string(),
            category: Category::Grammar,
            matched_text: matched.to_string(),
            proposed_text: proposed.to_string(),
            explanation: String::new(),
            span: Span::new(start, end),
            severity: Severity::Warning,
            confidence: 0.9,
        }
    }

    fn period(id: &str, text: &str) -> Suggestion {
        let trimmed = text.trim();
        edit(id, ADD_PERIOD, &format!("{trimmed}."), trimmed.len(), trimmed.len())
    }

    #[test]
    fn apply_one_replaces_span() {
        let out = apply_one("I beleive it", &edit("a", "beleive", "believe", 2, 9)).unwrap();
        assert_eq!(out, "I believe it");
    }

    #[test]
    fn apply_one_matches_case_insensitively() {
        let out = apply_one("Teh end", &edit("a", "teh", "The", 0, 3)).unwrap();
        assert_eq!(out, "The end");
    }

    #[test]
    fn apply_one_rejects_stale_spans() {
        let text = "hello";
        assert!(matches!(
            apply_one(text, &edit("a", "x", "y", 3, 9)),
            Err(ApplyError::OutOfBounds { .. })
        ));
        assert!(matches!(
            apply_one(text, &edit("a", "xyz", "y", 0, 3)),
            Err(ApplyError::TextMismatch { .. })
        ));
        assert!(matches!(
            apply_one("é", &edit("a", "x", "y", 0, 1)),
            Err(ApplyError::NotCharBoundary { .. })
        ));
    }

    #[test]
    fn apply_one_terminal_replaces_whole_text() {
        let text = "This is a sentence";
        assert_eq!(
            apply_one(text, &period("p", text)).unwrap(),
            "This is a sentence."
        );
    }

    #[test]
    fn apply_all_keeps_earlier_offsets_valid() {
        let text = "i think i am right";
        let out = apply_all(
            text,
            &[
                edit("a", "i", "I", 0, 1),
                edit("b", "i", "I", 8, 9),
                period("p", text),
            ],
        );
        assert_eq!(out.text, "I think I am right.");
        assert_eq!(out.applied, vec!["b", "a", "p"]);
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn apply_all_skips_overlaps() {
        let text = "they was here";
        let out = apply_all(
            text,
            &[
                edit("a", "they was", "they were", 0, 8),
                edit("b", "was", "were", 5, 8),
            ],
        );
        assert_eq!(out.text, "they were here");
        assert_eq!(out.applied, vec!["b"]);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].id, "a");
    }

    #[test]
    fn terminal_period_is_not_doubled() {
        let out = apply_all("Done.", &[period("p", "Done")]);
        assert_eq!(out.text, "Done.");
    }

    #[test]
    fn empty_list_returns_text_unchanged() {
        let out = apply_all("as is", &[]);
        assert_eq!(out.text, "as is");
        assert!(out.applied.is_empty());
    }
}
