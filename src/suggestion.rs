use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Grammar,
    Spelling,
    Style,
    Clarity,
    Conciseness,
    Engagement,
    Tone,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Spelling => "spelling",
            Self::Style => "style",
            Self::Clarity => "clarity",
            Self::Conciseness => "conciseness",
            Self::Engagement => "engagement",
            Self::Tone => "tone",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Suggestion => "suggestion",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half-open byte range `[start, end)` into the analyzed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Both endpoints lie within `tolerance` of the other span's endpoints.
    pub fn is_near(&self, other: &Span, tolerance: usize) -> bool {
        self.start.abs_diff(other.start) <= tolerance && self.end.abs_diff(other.end) <= tolerance
    }

    /// Zero-width spans overlap nothing.
    pub fn overlaps(&self, other: &Span) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

/// One proposed correction. Created by a detector, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub category: Category,
    pub matched_text: String,
    pub proposed_text: String,
    pub explanation: String,
    pub span: Span,
    pub severity: Severity,
    pub confidence: f64,
}

/// Marker text of the end-of-text punctuation suggestion.
pub const ADD_PERIOD: &str = "Add period";

impl Suggestion {
    /// The "correction" leaves the text as it was. Case changes count as edits.
    pub fn is_no_op(&self) -> bool {
        collapse_whitespace(&self.matched_text) == collapse_whitespace(&self.proposed_text)
    }

    /// The proposed text replaces the whole document rather than the span.
    pub fn is_terminal_punctuation(&self) -> bool {
        self.matched_text == ADD_PERIOD
    }
}

/// A suggestion as a detector reports it, before the scanner gives it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub category: Category,
    pub matched_text: String,
    pub proposed_text: String,
    pub explanation: String,
    pub span: Span,
    pub severity: Severity,
    pub confidence: f64,
}

impl Finding {
    pub fn into_suggestion(self, id: String) -> Suggestion {
        Suggestion {
            id,
            category: self.category,
            matched_text: self.matched_text,
            proposed_text: self.proposed_text,
            explanation: self.explanation,
            span: self.span,
            severity: self.severity,
            confidence: self.confidence,
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase and collapse whitespace runs, for case/space-insensitive equality.
pub(crate) fn normalize(s: &str) -> String {
    collapse_whitespace(s).to_lowercase()
}
