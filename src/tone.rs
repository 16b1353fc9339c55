//! Overall tone of a text, from counts of tone-marking words.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Informal,
    Confident,
    Friendly,
    Academic,
    Neutral,
}

impl Tone {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Informal => "informal",
            Self::Confident => "confident",
            Self::Friendly => "friendly",
            Self::Academic => "academic",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToneAnalysis {
    pub primary: Tone,
    /// In `0..=1`, two decimals.
    pub confidence: f64,
    pub suggestions: Vec<String>,
}

impl ToneAnalysis {
    pub fn neutral() -> Self {
        Self {
            primary: Tone::Neutral,
            confidence: 0.0,
            suggestions: Vec::new(),
        }
    }
}

/// Matches at which confidence saturates.
const SATURATION: f64 = 10.0;

/// Score every text starts with for `Neutral`.
const NEUTRAL_BASELINE: usize = 1;

// Ties go to the earlier entry; `Neutral` ranks last
static TONE_PATTERNS: Lazy<Vec<(Tone, Vec<Regex>)>> = Lazy::new(|| {
    let compile = |sources: &[&str]| -> Vec<Regex> {
        sources.iter().map(|s| Regex::new(s).unwrap()).collect()
    };
    vec![
        (
            Tone::Formal,
            compile(&[
                r"\b(therefore|furthermore|however|moreover|consequently|nevertheless)\b",
                r"\b(shall|ought|must)\b",
                r"\b(in conclusion|in summary|to summarize)\b",
            ]),
        ),
        (
            Tone::Informal,
            compile(&[
                r"\b(gonna|wanna|kinda|sorta|yeah|ok|okay)\b",
                r"\b(awesome|cool|great|amazing)\b",
                r"!{2,}",
            ]),
        ),
        (
            Tone::Confident,
            compile(&[
                r"\b(certainly|definitely|absolutely|undoubtedly|clearly)\b",
                r"\b(will|shall|must)\b",
                r"\b(proven|demonstrated|established)\b",
            ]),
        ),
        (
            Tone::Friendly,
            compile(&[
                r"\b(thanks|please|appreciate|welcome|glad)\b",
                r"\b(hope|wish|looking forward)\b",
                "\u{1F60A}|\u{1F604}|\u{1F603}|\u{1F642}",
            ]),
        ),
        (
            Tone::Academic,
            compile(&[
                r"\b(analyze|hypothesis|methodology|empirical|theoretical)\b",
                r"\b(research|study|investigation|examination)\b",
                r"\b(according to|as stated by|references indicate)\b",
            ]),
        ),
    ]
});

pub fn analyze_tone(text: &str) -> ToneAnalysis {
    if text.trim().is_empty() {
        return ToneAnalysis::neutral();
    }
    let lower = text.to_lowercase();

    let scores = TONE_PATTERNS
        .iter()
        .map(|(tone, patterns)| {
            let hits: usize = patterns.iter().map(|re| re.find_iter(&lower).count()).sum();
            (*tone, hits)
        })
        .chain(std::iter::once((Tone::Neutral, NEUTRAL_BASELINE)));
    let mut primary = Tone::Neutral;
    let mut best: Option<usize> = None;
    for (tone, hits) in scores {
        if best.map_or(true, |b| hits > b) {
            primary = tone;
            best = Some(hits);
        }
    }
    let best = best.unwrap_or(NEUTRAL_BASELINE);

    let confidence = ((best as f64 / SATURATION).min(1.0) * 100.0).round() / 100.0;

    let mut suggestions = Vec::new();
    if primary == Tone::Informal && confidence > 0.5 {
        suggestions.push("Consider using more formal language for professional writing".to_string());
    }
    if primary == Tone::Formal && confidence > 0.7 {
        suggestions.push(
            "Your writing has a formal tone, which is great for professional contexts".to_string(),
        );
    }
    if confidence < 0.3 {
        suggestions.push(
            "Try to establish a clearer tone that matches your audience and purpose".to_string(),
        );
    }

    ToneAnalysis {
        primary,
        confidence,
        suggestions,
    }
}
