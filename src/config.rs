use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detect::DEFAULT_PROPER_NAMES;
use crate::rules::{Rule, RuleDef, RuleError};
use crate::suggestion::{Category, Severity};

pub const DEFAULT_POSITION_TOLERANCE: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("rule #{index}: {source}")]
    Rule {
        index: usize,
        #[source]
        source: RuleError,
    },

    #[error("proper names: {0}")]
    ProperNames(#[source] RuleError),
}

/// Engine settings, loadable from TOML.
///
/// ```toml
/// position_tolerance = 3
/// style_rules = true
/// proper_names = ["ali", "khan"]
///
/// [[rules]]
/// pattern = '\bcould care less\b'
/// replacement = "couldn't care less"
/// explanation = "Idiom: the phrase is \"couldn't care less\""
/// severity = "warning"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Max distance, in bytes, between span endpoints for two suggestions
    /// to count as the same location.
    pub position_tolerance: usize,
    /// Names flagged when written lowercase.
    pub proper_names: Vec<String>,
    /// Enable the built-in style/conciseness/clarity table.
    pub style_rules: bool,
    /// When set, a table rule matching more often than this is skipped for
    /// the text. Unlimited by default.
    pub max_matches_per_rule: Option<usize>,
    /// Extra rules, scanned after the built-in grammar table.
    pub rules: Vec<RuleConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            position_tolerance: DEFAULT_POSITION_TOLERANCE,
            proper_names: DEFAULT_PROPER_NAMES.iter().map(|n| n.to_string()).collect(),
            style_rules: true,
            max_matches_per_rule: None,
            rules: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        // Surface bad rules at load time rather than at engine construction
        config.compile_rules()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn compile_rules(&self) -> Result<Vec<Rule>, ConfigError> {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                rule.compile()
                    .map_err(|source| ConfigError::Rule { index, source })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    pub replacement: String,
    #[serde(default = "default_category")]
    pub category: Category,
    /// Defaults to a generic "replace with" message.
    #[serde(default)]
    pub explanation: String,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
    /// Treat `$N` in the replacement as a capture-group reference.
    #[serde(default)]
    pub templated: bool,
}

fn default_category() -> Category {
    Category::Grammar
}

fn default_severity() -> Severity {
    Severity::Warning
}

fn default_confidence() -> f64 {
    0.9
}

fn default_true() -> bool {
    true
}

impl RuleConfig {
    pub fn explanation(&self) -> String {
        if self.explanation.trim().is_empty() {
            format!("Consider \"{}\" instead", self.replacement)
        } else {
            self.explanation.clone()
        }
    }

    pub fn compile(&self) -> Result<Rule, RuleError> {
        let explanation = self.explanation();
        Rule::compile(&RuleDef {
            pattern: &self.pattern,
            replacement: &self.replacement,
            templated: self.templated,
            case_insensitive: self.case_insensitive,
            category: self.category,
            explanation: &explanation,
            severity: self.severity,
            confidence: self.confidence,
        })
    }
}
