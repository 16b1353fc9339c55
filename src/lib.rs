//! Rule-based writing analysis: correction suggestions, readability, surface
//! statistics and a composite writing score, computed locally from text.
//!
//! ```
//! let result = wordwise::analyze("I beleive this.");
//! assert!(result.suggestions.iter().any(|s| s.proposed_text == "believe"));
//! ```

use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{debug, error};

pub mod apply;
pub mod config;
pub mod dedup;
pub mod detect;
pub mod metrics;
pub mod remote;
pub mod rules;
pub mod scan;
pub mod suggestion;
pub mod tone;

pub use apply::{apply_all, apply_one, Applied, ApplyError};
pub use config::{ConfigError, EngineConfig, RuleConfig};
pub use detect::{Detector, DetectorError};
pub use metrics::{
    Complexity, GradeLevel, ReadabilityStats, ScoreBreakdown, VocabularyStats, WritingScore,
    WritingStats,
};
pub use remote::RemoteError;
pub use rules::{Rule, RuleError, RuleSet};
pub use scan::{ScanReport, Scanner};
pub use suggestion::{Category, Severity, Span, Suggestion};
pub use tone::{Tone, ToneAnalysis};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub suggestions: Vec<Suggestion>,
    pub readability: ReadabilityStats,
    pub stats: WritingStats,
    pub score: WritingScore,
    pub tone: ToneAnalysis,
}

impl Analysis {
    /// Result for empty or whitespace-only text.
    pub fn empty() -> Self {
        let (readability, stats, score) = metrics::measure("", &[]);
        Self {
            suggestions: Vec::new(),
            readability,
            stats,
            score,
            tone: ToneAnalysis::neutral(),
        }
    }

    /// Safe defaults returned when the pipeline itself fails.
    pub fn fallback() -> Self {
        Self {
            suggestions: Vec::new(),
            readability: ReadabilityStats {
                flesch_score: 70.0,
                grade_level: GradeLevel::HighSchool,
                reading_time_minutes: 1,
                complexity: Complexity::Medium,
            },
            stats: WritingStats::default(),
            score: WritingScore {
                score: 70,
                factors: vec!["Analysis error - using safe defaults".to_string()],
                breakdown: ScoreBreakdown::default(),
            },
            tone: ToneAnalysis::neutral(),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns the detectors and dedup tolerance. Immutable once built, so one
/// engine can serve any number of threads.
pub struct Engine {
    scanner: Scanner,
    tolerance: usize,
}

impl Engine {
    /// Built-in tables adjusted by `config`, plus its extra rules.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let mut rules = if config.style_rules {
            RuleSet::standard()
        } else {
            RuleSet::without_style()
        };
        rules.grammar.extend(config.compile_rules()?);
        Self::with_rules(rules, config).map_err(ConfigError::ProperNames)
    }

    /// Explicit rule tables; `config` supplies tolerance, limits and names.
    pub fn with_rules(rules: RuleSet, config: &EngineConfig) -> Result<Self, RuleError> {
        Ok(Self::from_scanner(
            Scanner::standard(rules, config)?,
            config.position_tolerance,
        ))
    }

    pub fn from_scanner(scanner: Scanner, tolerance: usize) -> Self {
        Self { scanner, tolerance }
    }

    pub fn tolerance(&self) -> usize {
        self.tolerance
    }

    /// Raw detector output, before deduplication.
    pub fn scan(&self, text: &str) -> ScanReport {
        self.scanner.scan(text)
    }

    pub fn dedupe(&self, suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
        dedup::dedupe(suggestions, self.tolerance)
    }

    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn analyze(&self, text: &str) -> Analysis {
        self.guarded(text, Vec::new())
    }

    /// Like [`Engine::analyze`], with suggestions from a remote service
    /// merged ahead of the local ones.
    #[tracing::instrument(skip_all, fields(text_len = text.len(), remote = remote.len()))]
    pub fn analyze_with_remote(&self, text: &str, remote: Vec<Suggestion>) -> Analysis {
        self.guarded(text, remote)
    }

    fn guarded(&self, text: &str, remote: Vec<Suggestion>) -> Analysis {
        if text.trim().is_empty() {
            return Analysis::empty();
        }
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(text, remote))) {
            Ok(analysis) => analysis,
            Err(_) => {
                error!("analysis pipeline panicked, returning safe defaults");
                Analysis::fallback()
            }
        }
    }

    fn run(&self, text: &str, remote: Vec<Suggestion>) -> Analysis {
        let report = self.scan(text);
        let raw = report.suggestions.len();
        let suggestions = if remote.is_empty() {
            self.dedupe(report.suggestions)
        } else {
            remote::merge(remote, report.suggestions, self.tolerance)
        };
        let (readability, stats, score) = metrics::measure(text, &suggestions);
        debug!(
            raw,
            unique = suggestions.len(),
            failures = report.failures.len(),
            score = score.score,
            "analysis complete"
        );
        Analysis {
            suggestions,
            readability,
            stats,
            score,
            tone: tone::analyze_tone(text),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        // Built-in tables and default names always compile
        Self::with_rules(RuleSet::standard(), &EngineConfig::default())
            .expect("built-in rules are valid")
    }
}

static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::default);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze `text` with the built-in rules and default settings.
pub fn analyze(text: &str) -> Analysis {
    DEFAULT_ENGINE.analyze(text)
}
