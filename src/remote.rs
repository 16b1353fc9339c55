//! Intake of suggestions produced by a remote language service.
//!
//! The service returns free text for each issue, not offsets, so every item
//! has to be located in the analyzed text before it can be merged with the
//! local scan.

use regex::RegexBuilder;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::dedup::dedupe;
use crate::suggestion::{Category, Severity, Span, Suggestion};

pub const DEFAULT_REMOTE_CONFIDENCE: f64 = 0.9;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("malformed remote payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Wrapped { suggestions: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
}

#[derive(Debug, Deserialize)]
struct RemoteItem {
    #[serde(rename = "type")]
    category: Category,
    text: String,
    suggestion: String,
    #[serde(default)]
    explanation: String,
    #[serde(default = "default_severity")]
    severity: Severity,
    #[serde(default)]
    confidence: Option<f64>,
}

fn default_severity() -> Severity {
    Severity::Suggestion
}

/// Parse a payload into located suggestions with ids `ai-<index>`.
///
/// Items that do not fit the expected shape are skipped; `index` still
/// counts them so ids line up with the payload.
pub fn parse_suggestions(payload: &str, text: &str) -> Result<Vec<Suggestion>, RemoteError> {
    let items = match serde_json::from_str::<Payload>(payload)? {
        Payload::Wrapped { suggestions } => suggestions,
        Payload::Bare(items) => items,
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, value) in items.into_iter().enumerate() {
        let item: RemoteItem = match serde_json::from_value(value) {
            Ok(item) => item,
            Err(error) => {
                warn!(index, %error, "skipping malformed remote suggestion");
                continue;
            }
        };
        let span = locate(text, &item.text);
        out.push(Suggestion {
            id: format!("ai-{index}"),
            category: item.category,
            matched_text: item.text,
            proposed_text: item.suggestion,
            explanation: item.explanation,
            span,
            severity: item.severity,
            confidence: confidence(item.confidence),
        });
    }
    debug!(count = out.len(), "parsed remote suggestions");
    Ok(out)
}

fn confidence(raw: Option<f64>) -> f64 {
    match raw {
        Some(c) if c.is_finite() && c > 0.0 => c.min(1.0),
        _ => DEFAULT_REMOTE_CONFIDENCE,
    }
}

/// Byte span of `needle` in `text`.
///
/// Tries an exact match, then a case-insensitive one, then (for multi-word
/// needles longer than 3 chars) the first word. Falls back to the start of
/// the text.
pub fn locate(text: &str, needle: &str) -> Span {
    if needle.trim().is_empty() {
        return Span::new(0, clamp_end(text, needle.len()));
    }
    if let Some(start) = text.find(needle) {
        return Span::new(start, start + needle.len());
    }
    if let Some(span) = find_ci(text, needle) {
        return span;
    }
    if needle.chars().count() > 3 {
        let mut words = needle.split(' ').filter(|w| !w.is_empty());
        if let (Some(first), Some(_)) = (words.next(), words.next()) {
            if let Some(hit) = find_ci(text, first) {
                return Span::new(hit.start, clamp_end(text, hit.start + needle.len()));
            }
        }
    }
    warn!(needle, "could not locate remote suggestion in text");
    Span::new(0, clamp_end(text, needle.len()))
}

fn find_ci(text: &str, needle: &str) -> Option<Span> {
    let re = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .ok()?;
    re.find(text).map(|m| Span::new(m.start(), m.end()))
}

/// Largest char boundary at or below `end`, within the text.
fn clamp_end(text: &str, end: usize) -> usize {
    let mut end = end.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Remote suggestions first, then local ones, deduplicated as one list.
pub fn merge(remote: Vec<Suggestion>, local: Vec<Suggestion>, tolerance: usize) -> Vec<Suggestion> {
    dedupe(remote.into_iter().chain(local), tolerance)
}
