//! Readability, surface statistics and the composite writing score.
//!
//! All three are pure functions of the text; the score additionally counts
//! the deduplicated suggestions. No NaN or infinite value escapes: each
//! metric falls back to its own default instead.

use std::collections::{HashMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::suggestion::{Category, Severity, Suggestion};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GradeLevel {
    Elementary,
    #[serde(rename = "Middle School")]
    MiddleSchool,
    #[serde(rename = "High School")]
    HighSchool,
    College,
    Graduate,
}

impl GradeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Elementary => "Elementary",
            Self::MiddleSchool => "Middle School",
            Self::HighSchool => "High School",
            Self::College => "College",
            Self::Graduate => "Graduate",
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityStats {
    pub flesch_score: f64,
    pub grade_level: GradeLevel,
    pub reading_time_minutes: u32,
    pub complexity: Complexity,
}

impl ReadabilityStats {
    /// Flesch score as shown to readers.
    pub fn display_score(&self) -> u32 {
        self.flesch_score.round() as u32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingStats {
    pub word_count: usize,
    pub character_count: usize,
    pub sentence_count: usize,
    pub average_words_per_sentence: f64,
    pub paragraph_count: usize,
    /// Words in the longest and shortest sentence.
    pub longest_sentence: usize,
    pub shortest_sentence: usize,
    pub vocabulary: VocabularyStats,
}

/// Word-frequency summary over words longer than `HP.vocabulary_min_chars`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VocabularyStats {
    pub unique: usize,
    /// Overused words, in order of first use.
    pub repeated: Vec<String>,
}

/// Aggregated sub-scores, each rounded and bounded by its ceiling in `HP`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub mechanics: u32,
    pub vocabulary: u32,
    pub structure: u32,
    pub content: u32,
    pub clarity: u32,
    pub engagement: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WritingScore {
    pub score: u32,
    pub factors: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    flesch_intercept: f64,
    flesch_sentence_weight: f64,
    flesch_syllable_weight: f64,
    syllables_per_word: f64,
    flesch_fallback: f64,
    words_per_minute: f64,
    base_floor: f64,
    base_flesch_weight: f64,
    variety_weight: f64,
    variety_cap: f64,
    long_word_chars: usize,
    sophistication_weight: f64,
    sophistication_cap: f64,
    structure_bands: [(f64, f64, f64); 3],
    length_bucket_words: usize,
    length_bucket_weight: f64,
    length_variety_cap: f64,
    depth_weight: f64,
    depth_cap: f64,
    paragraph_weight: f64,
    organization_cap: f64,
    mechanics_cap: f64,
    grammar_error_cost: f64,
    spelling_error_cost: f64,
    punctuation_cost: f64,
    clarity_cap: f64,
    style_issue_cost: f64,
    transition_weight: f64,
    coherence_cap: f64,
    question_weight: f64,
    exclamation_weight: f64,
    pronoun_weight: f64,
    engagement_cap: f64,
    score_fallback: f64,
    score_min: u32,
    score_max: u32,
    vocabulary_min_chars: usize,
    repeated_above: usize,
    repeated_limit: usize,
}

static HP: Hyperparameters = Hyperparameters {
    flesch_intercept: 206.835,
    flesch_sentence_weight: 1.015,
    flesch_syllable_weight: 84.6,
    syllables_per_word: 1.5,
    flesch_fallback: 70.0,
    words_per_minute: 200.0,
    base_floor: 40.0,
    base_flesch_weight: 0.6,
    variety_weight: 25.0,
    variety_cap: 15.0,
    long_word_chars: 6,
    sophistication_weight: 20.0,
    sophistication_cap: 8.0,
    // (min avg words, max avg words, points), first match wins
    structure_bands: [(12.0, 20.0, 10.0), (8.0, 25.0, 7.0), (6.0, 30.0, 4.0)],
    length_bucket_words: 5,
    length_bucket_weight: 1.5,
    length_variety_cap: 5.0,
    depth_weight: 3.0,
    depth_cap: 12.0,
    paragraph_weight: 1.5,
    organization_cap: 5.0,
    mechanics_cap: 20.0,
    grammar_error_cost: 2.5,
    spelling_error_cost: 2.0,
    punctuation_cost: 1.5,
    clarity_cap: 10.0,
    style_issue_cost: 1.5,
    transition_weight: 1.5,
    coherence_cap: 5.0,
    question_weight: 1.5,
    exclamation_weight: 1.0,
    pronoun_weight: 10.0,
    engagement_cap: 6.0,
    score_fallback: 70.0,
    score_min: 35,
    score_max: 100,
    vocabulary_min_chars: 3,
    repeated_above: 2,
    repeated_limit: 10,
};

static TRANSITION_WORDS: &[&str] = &[
    "however",
    "therefore",
    "furthermore",
    "moreover",
    "consequently",
    "meanwhile",
    "additionally",
    "nevertheless",
];

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static SENTENCE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

static PARAGRAPH_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

static PERSONAL_PRONOUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(i|we|you|my|our|your)\b").unwrap());

// ---------------------------------------------------------------------------
// Tokenization
// ---------------------------------------------------------------------------

/// Word and sentence split shared by every metric.
struct TextProfile<'a> {
    words: Vec<&'a str>,
    sentences: Vec<&'a str>,
    /// Floors at 1 so averages never divide by zero.
    sentence_count: usize,
    avg_words_per_sentence: f64,
}

impl<'a> TextProfile<'a> {
    fn new(text: &'a str) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        let sentences: Vec<&str> = SENTENCE_SPLIT_RE
            .split(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let sentence_count = sentences.len().max(1);
        Self {
            avg_words_per_sentence: words.len() as f64 / sentence_count as f64,
            words,
            sentences,
            sentence_count,
        }
    }

    fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Clamped to 0..=100, before rounding.
    fn flesch(&self) -> f64 {
        let raw = HP.flesch_intercept
            - HP.flesch_sentence_weight * self.avg_words_per_sentence
            - HP.flesch_syllable_weight * HP.syllables_per_word;
        let raw = if raw.is_finite() { raw } else { HP.flesch_fallback };
        raw.clamp(0.0, 100.0)
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

// ---------------------------------------------------------------------------
// Readability and stats
// ---------------------------------------------------------------------------

fn bucket(flesch: f64) -> (GradeLevel, Complexity) {
    if flesch >= 90.0 {
        (GradeLevel::Elementary, Complexity::Easy)
    } else if flesch >= 80.0 {
        (GradeLevel::MiddleSchool, Complexity::Easy)
    } else if flesch >= 70.0 {
        (GradeLevel::HighSchool, Complexity::Medium)
    } else if flesch >= 60.0 {
        (GradeLevel::College, Complexity::Medium)
    } else {
        (GradeLevel::Graduate, Complexity::Hard)
    }
}

fn reading_time(word_count: usize) -> u32 {
    if word_count == 0 {
        return 0;
    }
    let minutes = (word_count as f64 / HP.words_per_minute).round();
    (minutes as u32).max(1)
}

pub fn readability(text: &str) -> ReadabilityStats {
    if is_blank(text) {
        return ReadabilityStats {
            flesch_score: 100.0,
            grade_level: GradeLevel::Elementary,
            reading_time_minutes: 0,
            complexity: Complexity::Easy,
        };
    }
    let profile = TextProfile::new(text);
    readability_of(&profile)
}

fn readability_of(profile: &TextProfile<'_>) -> ReadabilityStats {
    let flesch = profile.flesch();
    let (grade_level, complexity) = bucket(flesch);
    ReadabilityStats {
        flesch_score: flesch,
        grade_level,
        reading_time_minutes: reading_time(profile.word_count()),
        complexity,
    }
}

pub fn writing_stats(text: &str) -> WritingStats {
    if is_blank(text) {
        return WritingStats::default();
    }
    stats_of(text, &TextProfile::new(text))
}

fn paragraph_count(text: &str) -> usize {
    PARAGRAPH_SPLIT_RE
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .count()
}

fn vocabulary(words: &[&str]) -> VocabularyStats {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for word in words {
        let clean: String = word
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if clean.chars().count() <= HP.vocabulary_min_chars {
            continue;
        }
        let count = counts.entry(clean.clone()).or_insert(0);
        if *count == 0 {
            order.push(clean);
        }
        *count += 1;
    }
    let repeated = order
        .iter()
        .filter(|w| counts.get(*w).is_some_and(|c| *c > HP.repeated_above))
        .take(HP.repeated_limit)
        .cloned()
        .collect();
    VocabularyStats {
        unique: order.len(),
        repeated,
    }
}

fn stats_of(text: &str, profile: &TextProfile<'_>) -> WritingStats {
    let avg = profile.avg_words_per_sentence;
    let lengths: Vec<usize> = profile
        .sentences
        .iter()
        .map(|s| s.split_whitespace().count())
        .collect();
    WritingStats {
        word_count: profile.word_count(),
        character_count: text.chars().count(),
        sentence_count: profile.sentence_count,
        average_words_per_sentence: if avg.is_finite() {
            (avg * 10.0).round() / 10.0
        } else {
            0.0
        },
        paragraph_count: paragraph_count(text),
        longest_sentence: lengths.iter().copied().max().unwrap_or(0),
        shortest_sentence: lengths.iter().copied().min().unwrap_or(0),
        vocabulary: vocabulary(&profile.words),
    }
}

// ---------------------------------------------------------------------------
// Writing score
// ---------------------------------------------------------------------------

/// Counts taken from the deduplicated suggestion list.
#[derive(Debug, Default)]
struct IssueCounts {
    grammar_errors: usize,
    spelling_errors: usize,
    punctuation: usize,
    style: usize,
}

impl IssueCounts {
    fn tally(suggestions: &[Suggestion]) -> Self {
        let mut counts = Self::default();
        for s in suggestions {
            match (s.category, s.severity) {
                (Category::Grammar, Severity::Error) => counts.grammar_errors += 1,
                (Category::Spelling, Severity::Error) => counts.spelling_errors += 1,
                (Category::Style | Category::Clarity, _) => counts.style += 1,
                _ => {}
            }
            if s.explanation.contains("punctuation") {
                counts.punctuation += 1;
            }
        }
        counts
    }
}

/// Every term of the composite, already capped.
#[derive(Debug)]
struct ScoreParts {
    base: f64,
    variety: f64,
    sophistication: f64,
    structure: f64,
    structure_variety: f64,
    depth: f64,
    organization: f64,
    mechanics: f64,
    clarity: f64,
    coherence: f64,
    engagement: f64,
}

impl ScoreParts {
    fn compute(text: &str, profile: &TextProfile<'_>, issues: &IssueCounts) -> Self {
        let word_count = profile.word_count() as f64;
        let avg = profile.avg_words_per_sentence;

        let unique: HashSet<String> = profile.words.iter().map(|w| w.to_lowercase()).collect();
        let variety = (unique.len() as f64 / word_count * HP.variety_weight).min(HP.variety_cap);

        let long_words = profile
            .words
            .iter()
            .filter(|w| w.chars().count() > HP.long_word_chars)
            .count();
        let sophistication =
            (long_words as f64 / word_count * HP.sophistication_weight).min(HP.sophistication_cap);

        let structure = HP
            .structure_bands
            .iter()
            .find(|(lo, hi, _)| (*lo..=*hi).contains(&avg))
            .map_or(0.0, |(_, _, points)| *points);

        let length_buckets: HashSet<usize> = profile
            .sentences
            .iter()
            .map(|s| s.split_whitespace().count() / HP.length_bucket_words)
            .collect();
        let structure_variety =
            (length_buckets.len() as f64 * HP.length_bucket_weight).min(HP.length_variety_cap);

        let depth = ((word_count + 1.0).ln() * HP.depth_weight).min(HP.depth_cap);
        let paragraphs = paragraph_count(text);
        let organization = if paragraphs > 1 {
            (paragraphs as f64 * HP.paragraph_weight).min(HP.organization_cap)
        } else {
            0.0
        };

        let mechanics = (HP.mechanics_cap
            - issues.grammar_errors as f64 * HP.grammar_error_cost
            - issues.spelling_errors as f64 * HP.spelling_error_cost
            - issues.punctuation as f64 * HP.punctuation_cost)
            .max(0.0);
        let clarity = (HP.clarity_cap - issues.style as f64 * HP.style_issue_cost).max(0.0);

        let lower = text.to_lowercase();
        let transitions = TRANSITION_WORDS
            .iter()
            .filter(|w| lower.contains(*w))
            .count();
        let coherence = (transitions as f64 * HP.transition_weight).min(HP.coherence_cap);

        let questions = text.matches('?').count() as f64;
        let exclamations = text.matches('!').count() as f64;
        let pronouns = PERSONAL_PRONOUN_RE.find_iter(&lower).count() as f64;
        let engagement = (questions * HP.question_weight
            + exclamations * HP.exclamation_weight
            + pronouns / word_count * HP.pronoun_weight)
            .min(HP.engagement_cap);

        Self {
            base: (profile.flesch() * HP.base_flesch_weight).max(HP.base_floor),
            variety,
            sophistication,
            structure,
            structure_variety,
            depth,
            organization,
            mechanics,
            clarity,
            coherence,
            engagement,
        }
    }

    fn total(&self) -> f64 {
        self.base
            + self.variety
            + self.sophistication
            + self.structure
            + self.structure_variety
            + self.depth
            + self.organization
            + self.mechanics
            + self.clarity
            + self.coherence
            + self.engagement
    }

    fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            mechanics: round_part(self.mechanics),
            vocabulary: round_part(self.variety + self.sophistication),
            structure: round_part(self.structure + self.structure_variety),
            content: round_part(self.depth + self.organization),
            clarity: round_part(self.clarity),
            engagement: round_part(self.coherence + self.engagement),
        }
    }
}

/// Non-finite parts report as zero.
fn round_part(value: f64) -> u32 {
    if value.is_finite() {
        value.round().max(0.0) as u32
    } else {
        0
    }
}

fn final_score(total: f64) -> u32 {
    let total = if total.is_finite() {
        total
    } else {
        HP.score_fallback
    };
    (total.round().max(0.0) as u32).clamp(HP.score_min, HP.score_max)
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn factors(
    parts: &ScoreParts,
    issues: &IssueCounts,
    profile: &TextProfile<'_>,
    score: u32,
) -> Vec<String> {
    let mut factors = Vec::new();
    let word_count = profile.word_count();
    let avg = profile.avg_words_per_sentence;

    let headline = match score {
        90.. => "🌟 Outstanding writing quality",
        80..=89 => "🎯 Strong writing with room for polish",
        70..=79 => "📈 Good foundation, focus on improvements",
        60..=69 => "🔨 Developing skills, keep practicing",
        _ => "🎓 Focus on fundamentals first",
    };
    factors.push(headline.to_string());

    // Strengths
    if parts.mechanics >= 15.0 {
        factors.push("✅ Excellent grammar and spelling".to_string());
    } else if parts.mechanics >= 10.0 {
        factors.push("✅ Good grammar with minor issues".to_string());
    }
    if parts.variety >= 10.0 {
        factors.push("✅ Rich vocabulary variety".to_string());
    } else if parts.variety >= 6.0 {
        factors.push("✅ Good word choice diversity".to_string());
    }
    if parts.structure >= 8.0 {
        factors.push("✅ Well-balanced sentence length".to_string());
    } else if parts.structure >= 5.0 {
        factors.push("✅ Clear sentence structure".to_string());
    }
    if parts.depth >= 8.0 {
        factors.push("✅ Substantial content development".to_string());
    } else if parts.depth >= 5.0 {
        factors.push("✅ Good content length".to_string());
    }
    if parts.organization >= 3.0 {
        factors.push("✅ Well-organized paragraphs".to_string());
    }
    if parts.coherence >= 3.0 {
        factors.push("✅ Good use of transitions".to_string());
    }
    if parts.sophistication >= 5.0 {
        factors.push("✅ Sophisticated vocabulary".to_string());
    }

    // Areas for improvement
    let n = issues.grammar_errors;
    if n > 0 {
        factors.push(format!("🔧 {n} grammar issue{} to address", plural(n)));
    }
    let n = issues.spelling_errors;
    if n > 0 {
        factors.push(format!("🔧 {n} spelling error{} to fix", plural(n)));
    }
    let n = issues.style;
    if n > 0 {
        factors.push(format!("💡 {n} style enhancement{} suggested", plural(n)));
    }
    if avg < 8.0 {
        factors.push("💡 Consider varying sentence length for better flow".to_string());
    } else if avg > 25.0 {
        factors.push("💡 Break up long sentences for clarity".to_string());
    }
    if parts.variety < 5.0 {
        factors.push("💡 Expand vocabulary variety".to_string());
    }
    if parts.coherence < 2.0 && word_count > 100 {
        factors.push("💡 Add transition words for better flow".to_string());
    }
    if parts.organization == 0.0 && word_count > 150 {
        factors.push("💡 Consider breaking into paragraphs".to_string());
    }
    if parts.sophistication < 3.0 && word_count > 50 {
        factors.push("💡 Use more varied vocabulary".to_string());
    }

    factors
}

/// Composite score in `35..=100`; `suggestions` should be deduplicated.
pub fn writing_score(text: &str, suggestions: &[Suggestion]) -> WritingScore {
    if is_blank(text) {
        return WritingScore {
            score: HP.score_max,
            factors: vec!["No text to analyze".to_string()],
            breakdown: ScoreBreakdown::default(),
        };
    }
    score_of(text, &TextProfile::new(text), suggestions)
}

fn score_of(text: &str, profile: &TextProfile<'_>, suggestions: &[Suggestion]) -> WritingScore {
    let issues = IssueCounts::tally(suggestions);
    let parts = ScoreParts::compute(text, profile, &issues);
    let score = final_score(parts.total());

    WritingScore {
        score,
        factors: factors(&parts, &issues, profile, score),
        breakdown: parts.breakdown(),
    }
}

/// Readability, stats and score from one tokenization pass.
pub(crate) fn measure(
    text: &str,
    suggestions: &[Suggestion],
) -> (ReadabilityStats, WritingStats, WritingScore) {
    if is_blank(text) {
        return (
            readability(text),
            writing_stats(text),
            writing_score(text, suggestions),
        );
    }
    let profile = TextProfile::new(text);
    (
        readability_of(&profile),
        stats_of(text, &profile),
        score_of(text, &profile, suggestions),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestion::Span;
    use approx::assert_relative_eq;

    fn issue(category: Category, severity: Severity, explanation: &str) -> Suggestion {
        Suggestion {
            id: "x-0".to_string(),
            category,
            matched_text: "a".to_string(),
            proposed_text: "b".to_string(),
            explanation: explanation.to_string(),
            span: Span::new(0, 1),
            severity,
            confidence: 0.9,
        }
    }

    #[test]
    fn empty_text_defaults() {
        let r = readability("");
        assert_relative_eq!(r.flesch_score, 100.0);
        assert_eq!(r.grade_level, GradeLevel::Elementary);
        assert_eq!(r.reading_time_minutes, 0);
        assert_eq!(r.complexity, Complexity::Easy);
        assert_eq!(writing_stats("   "), WritingStats::default());
        let s = writing_score("", &[]);
        assert_eq!(s.score, 100);
        assert_eq!(s.factors, vec!["No text to analyze"]);
    }

    #[test]
    fn flesch_uses_constant_syllable_term() {
        // 4 words, 1 sentence: 206.835 - 4.06 - 126.9
        let r = readability("The cat sat down.");
        assert_relative_eq!(r.flesch_score, 75.875, epsilon = 1e-9);
        assert_eq!(r.grade_level, GradeLevel::HighSchool);
        assert_eq!(r.complexity, Complexity::Medium);
        assert_eq!(r.display_score(), 76);
        assert_eq!(r.reading_time_minutes, 1);
    }

    #[test]
    fn long_sentences_clamp_to_zero() {
        let text = "word ".repeat(200);
        let r = readability(&text);
        assert_relative_eq!(r.flesch_score, 0.0);
        assert_eq!(r.grade_level, GradeLevel::Graduate);
        assert_eq!(r.complexity, Complexity::Hard);
    }

    #[test]
    fn grade_buckets() {
        assert_eq!(bucket(95.0), (GradeLevel::Elementary, Complexity::Easy));
        assert_eq!(bucket(80.0), (GradeLevel::MiddleSchool, Complexity::Easy));
        assert_eq!(bucket(70.0), (GradeLevel::HighSchool, Complexity::Medium));
        assert_eq!(bucket(60.0), (GradeLevel::College, Complexity::Medium));
        assert_eq!(bucket(59.9), (GradeLevel::Graduate, Complexity::Hard));
    }

    #[test]
    fn reading_time_rounds_with_one_minute_floor() {
        assert_eq!(reading_time(0), 0);
        assert_eq!(reading_time(1), 1);
        assert_eq!(reading_time(299), 1);
        assert_eq!(reading_time(300), 2);
        assert_eq!(reading_time(1000), 5);
    }

    #[test]
    fn stats_count_words_sentences_and_chars() {
        let stats = writing_stats("One two three. Four five! Six?");
        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.sentence_count, 3);
        assert_eq!(stats.character_count, 30);
        assert_relative_eq!(stats.average_words_per_sentence, 2.0);

        let stats = writing_stats("no punctuation here");
        assert_eq!(stats.sentence_count, 1);
        assert_eq!(writing_stats("naïve café").character_count, 10);
    }

    #[test]
    fn stats_cover_paragraphs_and_sentence_extremes() {
        let stats = writing_stats("One two three four. Five six.\n\nSeven eight nine!");
        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.longest_sentence, 4);
        assert_eq!(stats.shortest_sentence, 2);
    }

    #[test]
    fn vocabulary_reports_overused_long_words() {
        let text = "Essay essay, essay! The theme theme theme theme. Then text text text.";
        let stats = writing_stats(text);
        // "the" is too short to count; "then" appears once
        assert_eq!(stats.vocabulary.unique, 4);
        assert_eq!(stats.vocabulary.repeated, vec!["essay", "theme", "text"]);
    }

    #[test]
    fn tally_filters_by_category_severity_and_explanation() {
        let counts = IssueCounts::tally(&[
            issue(Category::Grammar, Severity::Error, "x"),
            issue(Category::Grammar, Severity::Warning, "x"),
            issue(Category::Spelling, Severity::Error, "x"),
            issue(Category::Grammar, Severity::Suggestion, "end with proper punctuation"),
            issue(Category::Style, Severity::Suggestion, "x"),
            issue(Category::Clarity, Severity::Suggestion, "x"),
            issue(Category::Conciseness, Severity::Suggestion, "x"),
        ]);
        assert_eq!(counts.grammar_errors, 1);
        assert_eq!(counts.spelling_errors, 1);
        assert_eq!(counts.punctuation, 1);
        assert_eq!(counts.style, 2);
    }

    #[test]
    fn mechanics_falls_with_errors_and_floors_at_zero() {
        let text = "This is a plain sentence.";
        let clean = writing_score(text, &[]);
        assert_eq!(clean.breakdown.mechanics, 20);

        let errors: Vec<_> = (0..10)
            .map(|_| issue(Category::Grammar, Severity::Error, "x"))
            .collect();
        let messy = writing_score(text, &errors);
        assert_eq!(messy.breakdown.mechanics, 0);
        assert!(messy.score < clean.score);
        assert!(messy
            .factors
            .contains(&"🔧 10 grammar issues to address".to_string()));
    }

    #[test]
    fn single_issue_factor_is_singular() {
        let score = writing_score(
            "Short text here.",
            &[issue(Category::Spelling, Severity::Error, "x")],
        );
        assert!(score.factors.contains(&"🔧 1 spelling error to fix".to_string()));
    }

    #[test]
    fn headline_comes_first() {
        let score = writing_score("A short line.", &[]);
        let first = &score.factors[0];
        assert!(
            ["🌟", "🎯", "📈", "🔨", "🎓"]
                .iter()
                .any(|p| first.starts_with(p)),
            "unexpected headline {first}"
        );
    }

    #[test]
    fn breakdown_stays_under_ceilings() {
        let text = "However, we think you should read this! Do you agree? \
                    Therefore my team and our partners, moreover, consequently met.\n\n\
                    Meanwhile, additionally, nevertheless, furthermore the extraordinary \
                    circumstances necessitated comprehensive reconsideration.\n\nShort one.";
        let score = writing_score(text, &[]);
        let b = score.breakdown;
        assert!(b.mechanics <= 20);
        assert!(b.vocabulary <= 23);
        assert!(b.structure <= 15);
        assert!(b.content <= 17);
        assert!(b.clarity <= 10);
        assert!(b.engagement <= 11);
        assert!((35..=100).contains(&score.score));
        assert!(score.factors.contains(&"✅ Good use of transitions".to_string()));
        assert!(score.factors.contains(&"✅ Well-organized paragraphs".to_string()));
    }

    #[test]
    fn non_finite_total_uses_fallback() {
        assert_eq!(final_score(f64::NAN), 70);
        assert_eq!(final_score(f64::INFINITY), 70);
        assert_eq!(final_score(10.0), 35);
        assert_eq!(final_score(250.0), 100);
        assert_eq!(round_part(f64::NAN), 0);
    }
}
