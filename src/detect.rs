//! Scanning steps. Table rules and the ad hoc checks share one trait so the
//! scanner just runs every registered detector in order.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::rules::{Rule, RuleError};
use crate::suggestion::{Category, Finding, Severity, Span, ADD_PERIOD};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectorError {
    #[error("pattern matched the empty string at byte {at}")]
    EmptyMatch { at: usize },

    #[error("more than {limit} matches")]
    TooManyMatches { limit: usize },

    #[error("{0}")]
    Failed(String),
}

/// Trait that every scanning step implements.
pub trait Detector: Send + Sync {
    /// Stable name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Prefix of the ids given to this detector's suggestions.
    fn id_prefix(&self) -> &str;

    fn detect(&self, text: &str) -> Result<Vec<Finding>, DetectorError>;
}

// ---------------------------------------------------------------------------
// Table rules
// ---------------------------------------------------------------------------

/// One table rule. Each rule is its own detector so a misbehaving rule is
/// skipped alone.
pub struct RuleDetector {
    rule: Rule,
    id_prefix: &'static str,
    match_limit: Option<usize>,
}

impl RuleDetector {
    pub fn new(rule: Rule, id_prefix: &'static str, match_limit: Option<usize>) -> Self {
        Self {
            rule,
            id_prefix,
            match_limit,
        }
    }
}

impl Detector for RuleDetector {
    fn name(&self) -> &str {
        self.rule.name()
    }

    fn id_prefix(&self) -> &str {
        self.id_prefix
    }

    fn detect(&self, text: &str) -> Result<Vec<Finding>, DetectorError> {
        let mut findings = Vec::new();
        for caps in self.rule.pattern().captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            if m.is_empty() {
                return Err(DetectorError::EmptyMatch { at: m.start() });
            }
            if let Some(limit) = self.match_limit.filter(|l| findings.len() == *l) {
                return Err(DetectorError::TooManyMatches { limit });
            }
            findings.push(Finding {
                category: self.rule.category(),
                matched_text: m.as_str().to_string(),
                proposed_text: self.rule.propose(&caps),
                explanation: self.rule.explanation().to_string(),
                span: Span::new(m.start(), m.end()),
                severity: self.rule.severity(),
                confidence: self.rule.confidence(),
            });
        }
        Ok(findings)
    }
}

// ---------------------------------------------------------------------------
// Ad hoc checks
// ---------------------------------------------------------------------------

static PRONOUN_I_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bi\b").unwrap());

static CLAUSE_COMMA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w+)\s+(I)\s+(hope|think|believe|know|feel|wish)").unwrap()
});

static INFORMAL_GREETING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)hi my name is").unwrap());

pub const DEFAULT_PROPER_NAMES: &[&str] = &[
    "abdullah", "mirza", "ahmed", "ali", "mohammed", "hassan", "hussain", "khan", "shah", "malik",
];

/// Lowercase first letter of the trimmed text.
pub struct LeadingCapitalDetector;

impl Detector for LeadingCapitalDetector {
    fn name(&self) -> &str {
        "leading-capital"
    }

    fn id_prefix(&self) -> &str {
        "capitalization"
    }

    fn detect(&self, text: &str) -> Result<Vec<Finding>, DetectorError> {
        let trimmed = text.trim_start();
        let Some(first) = trimmed.chars().next() else {
            return Ok(vec![]);
        };
        if !first.is_lowercase() {
            return Ok(vec![]);
        }
        // Offset in the untrimmed text
        let start = text.len() - trimmed.len();
        Ok(vec![Finding {
            category: Category::Grammar,
            matched_text: first.to_string(),
            proposed_text: first.to_uppercase().collect(),
            explanation: "Sentences should start with a capital letter".to_string(),
            span: Span::new(start, start + first.len_utf8()),
            severity: Severity::Warning,
            confidence: 0.95,
        }])
    }
}

/// Known personal names written with a lowercase initial.
pub struct ProperNameDetector {
    pattern: Option<Regex>,
}

impl ProperNameDetector {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, RuleError> {
        if names.is_empty() {
            return Ok(Self { pattern: None });
        }
        let alt = names
            .iter()
            .map(|n| regex::escape(n.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let source = format!(r"\b({alt})\b");
        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| RuleError::InvalidPattern {
                pattern: source.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }
}

impl Detector for ProperNameDetector {
    fn name(&self) -> &str {
        "proper-name"
    }

    fn id_prefix(&self) -> &str {
        "name-cap"
    }

    fn detect(&self, text: &str) -> Result<Vec<Finding>, DetectorError> {
        let Some(pattern) = &self.pattern else {
            return Ok(vec![]);
        };
        let mut findings = Vec::new();
        for m in pattern.find_iter(text) {
            let word = m.as_str();
            let mut chars = word.chars();
            let Some(first) = chars.next() else { continue };
            if !first.is_lowercase() {
                continue;
            }
            let capitalized: String = first.to_uppercase().chain(chars).collect();
            findings.push(Finding {
                category: Category::Grammar,
                matched_text: word.to_string(),
                proposed_text: capitalized,
                explanation: "Names should be capitalized".to_string(),
                span: Span::new(m.start(), m.end()),
                severity: Severity::Warning,
                confidence: 0.9,
            });
        }
        Ok(findings)
    }
}

/// Standalone lowercase "i".
pub struct PronounDetector;

impl Detector for PronounDetector {
    fn name(&self) -> &str {
        "pronoun-i"
    }

    fn id_prefix(&self) -> &str {
        "i-cap"
    }

    fn detect(&self, text: &str) -> Result<Vec<Finding>, DetectorError> {
        Ok(PRONOUN_I_RE
            .find_iter(text)
            .map(|m| Finding {
                category: Category::Grammar,
                matched_text: "i".to_string(),
                proposed_text: "I".to_string(),
                explanation: "The pronoun \"I\" should always be capitalized".to_string(),
                span: Span::new(m.start(), m.end()),
                severity: Severity::Warning,
                confidence: 0.98,
            })
            .collect())
    }
}

/// Text that does not end in `.`, `!` or `?`.
pub struct TerminalPunctuationDetector;

impl Detector for TerminalPunctuationDetector {
    fn name(&self) -> &str {
        "terminal-punctuation"
    }

    fn id_prefix(&self) -> &str {
        "punctuation"
    }

    fn detect(&self, text: &str) -> Result<Vec<Finding>, DetectorError> {
        let trimmed = text.trim();
        match trimmed.chars().last() {
            None | Some('.' | '!' | '?') => Ok(vec![]),
            Some(_) => Ok(vec![Finding {
                category: Category::Grammar,
                matched_text: ADD_PERIOD.to_string(),
                proposed_text: format!("{trimmed}."),
                explanation: "Sentences should end with proper punctuation".to_string(),
                span: Span::new(trimmed.len(), trimmed.len()),
                severity: Severity::Suggestion,
                confidence: 0.85,
            }]),
        }
    }
}

/// "word I think" -> "word, I think".
pub struct ClauseCommaDetector;

impl Detector for ClauseCommaDetector {
    fn name(&self) -> &str {
        "clause-comma"
    }

    fn id_prefix(&self) -> &str {
        "comma"
    }

    fn detect(&self, text: &str) -> Result<Vec<Finding>, DetectorError> {
        let mut findings = Vec::new();
        for caps in CLAUSE_COMMA_RE.captures_iter(text) {
            let (Some(full), Some(word), Some(verb)) = (caps.get(0), caps.get(1), caps.get(3))
            else {
                continue;
            };
            findings.push(Finding {
                category: Category::Grammar,
                matched_text: full.as_str().to_string(),
                proposed_text: format!("{}, I {}", word.as_str(), verb.as_str()),
                explanation: "Add a comma before independent clauses starting with \"I\"".to_string(),
                span: Span::new(full.start(), full.end()),
                severity: Severity::Warning,
                confidence: 0.9,
            });
        }
        Ok(findings)
    }
}

/// Casual self-introduction.
pub struct InformalGreetingDetector;

impl Detector for InformalGreetingDetector {
    fn name(&self) -> &str {
        "informal-greeting"
    }

    fn id_prefix(&self) -> &str {
        "formality"
    }

    fn detect(&self, text: &str) -> Result<Vec<Finding>, DetectorError> {
        Ok(INFORMAL_GREETING_RE
            .find_iter(text)
            .map(|m| Finding {
                category: Category::Style,
                matched_text: m.as_str().to_string(),
                proposed_text: "Hello, my name is".to_string(),
                explanation: "Consider using \"Hello\" instead of \"hi\" for more formal writing"
                    .to_string(),
                span: Span::new(m.start(), m.end()),
                severity: Severity::Suggestion,
                confidence: 0.8,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleDef;

    #[test]
    fn leading_capital_points_into_untrimmed_text() {
        let found = LeadingCapitalDetector.detect("  \nhello").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Span::new(3, 4));
        assert_eq!(found[0].proposed_text, "H");
        assert!(LeadingCapitalDetector.detect("Hello").unwrap().is_empty());
        assert!(LeadingCapitalDetector.detect("   ").unwrap().is_empty());
    }

    #[test]
    fn proper_names_only_flag_lowercase() {
        let detector = ProperNameDetector::new(DEFAULT_PROPER_NAMES).unwrap();
        let found = detector.detect("ali met Hassan and khan").unwrap();
        let words: Vec<_> = found.iter().map(|f| f.proposed_text.as_str()).collect();
        assert_eq!(words, vec!["Ali", "Khan"]);
        assert_eq!(found[1].span, Span::new(19, 23));
    }

    #[test]
    fn empty_name_list_detects_nothing() {
        let detector = ProperNameDetector::new::<&str>(&[]).unwrap();
        assert!(detector.detect("ali").unwrap().is_empty());
    }

    #[test]
    fn pronoun_ignores_letters_inside_words() {
        let found = PronounDetector.detect("i think it is i").unwrap();
        let starts: Vec<_> = found.iter().map(|f| f.span.start).collect();
        assert_eq!(starts, vec![0, 14]);
    }

    #[test]
    fn terminal_punctuation_is_zero_width_at_trimmed_end() {
        let found = TerminalPunctuationDetector.detect("This is a sentence  ").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, ADD_PERIOD);
        assert_eq!(found[0].proposed_text, "This is a sentence.");
        assert_eq!(found[0].span, Span::new(18, 18));
        assert!(TerminalPunctuationDetector.detect("Done!").unwrap().is_empty());
        assert!(TerminalPunctuationDetector.detect("").unwrap().is_empty());
    }

    #[test]
    fn clause_comma_inserts_after_first_word() {
        let found = ClauseCommaDetector.detect("Honestly I think so").unwrap();
        assert_eq!(found[0].matched_text, "Honestly I think");
        assert_eq!(found[0].proposed_text, "Honestly, I think");
    }

    #[test]
    fn informal_greeting_is_case_insensitive() {
        let found = InformalGreetingDetector.detect("Hi my name is Sam").unwrap();
        assert_eq!(found[0].proposed_text, "Hello, my name is");
        assert_eq!(found[0].span, Span::new(0, 13));
    }

    fn rule(pattern: &'static str) -> Rule {
        Rule::compile(&RuleDef {
            pattern,
            replacement: "x",
            templated: false,
            case_insensitive: true,
            category: Category::Style,
            explanation: "test",
            severity: Severity::Suggestion,
            confidence: 0.5,
        })
        .unwrap()
    }

    #[test]
    fn rule_detector_reports_empty_matches() {
        let detector = RuleDetector::new(rule("z*"), "custom", None);
        assert_eq!(
            detector.detect("abc").unwrap_err(),
            DetectorError::EmptyMatch { at: 0 }
        );
    }

    #[test]
    fn rule_detector_is_unlimited_by_default() {
        let detector = RuleDetector::new(rule("a"), "custom", None);
        let text = "a ".repeat(20_000);
        assert_eq!(detector.detect(&text).unwrap().len(), 20_000);
    }

    #[test]
    fn rule_detector_enforces_match_limit() {
        let detector = RuleDetector::new(rule("a"), "custom", Some(2));
        assert!(detector.detect("aa").is_ok());
        assert_eq!(
            detector.detect("aaa").unwrap_err(),
            DetectorError::TooManyMatches { limit: 2 }
        );
    }
}
