use serde::Serialize;
use tracing::warn;

use crate::config::EngineConfig;
use crate::detect::{
    ClauseCommaDetector, Detector, DetectorError, InformalGreetingDetector,
    LeadingCapitalDetector, PronounDetector, ProperNameDetector, RuleDetector,
    TerminalPunctuationDetector,
};
use crate::rules::{RuleError, RuleSet};
use crate::suggestion::Suggestion;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectorFailure {
    pub detector: String,
    #[serde(serialize_with = "display")]
    pub error: DetectorError,
}

fn display<S: serde::Serializer>(err: &DetectorError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

/// Raw scan output: suggestions in detector order, plus detectors that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub suggestions: Vec<Suggestion>,
    pub failures: Vec<DetectorFailure>,
}

pub struct Scanner {
    detectors: Vec<Box<dyn Detector>>,
}

impl Scanner {
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    /// Table rules (grammar, spelling, style) followed by the ad hoc checks.
    pub fn standard(rules: RuleSet, config: &EngineConfig) -> Result<Self, RuleError> {
        let limit = config.max_matches_per_rule;
        let mut detectors: Vec<Box<dyn Detector>> = Vec::with_capacity(rules.len() + 6);

        for rule in rules.grammar {
            detectors.push(Box::new(RuleDetector::new(rule, "grammar", limit)));
        }
        for rule in rules.spelling {
            detectors.push(Box::new(RuleDetector::new(rule, "spelling", limit)));
        }
        for rule in rules.style {
            detectors.push(Box::new(RuleDetector::new(rule, "style", limit)));
        }

        detectors.push(Box::new(LeadingCapitalDetector));
        detectors.push(Box::new(ProperNameDetector::new(&config.proper_names)?));
        detectors.push(Box::new(PronounDetector));
        detectors.push(Box::new(TerminalPunctuationDetector));
        detectors.push(Box::new(ClauseCommaDetector));
        detectors.push(Box::new(InformalGreetingDetector));

        Ok(Self::new(detectors))
    }

    pub fn push(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run every detector and concatenate. A failing detector contributes
    /// nothing and is recorded in `failures`.
    pub fn scan(&self, text: &str) -> ScanReport {
        let mut report = ScanReport::default();
        let mut next_id = 0usize;

        for detector in &self.detectors {
            match detector.detect(text) {
                Ok(findings) => {
                    for finding in findings {
                        let id = format!("{}-{next_id}", detector.id_prefix());
                        next_id += 1;
                        report.suggestions.push(finding.into_suggestion(id));
                    }
                }
                Err(error) => {
                    warn!(detector = detector.name(), %error, "detector failed, skipping");
                    report.failures.push(DetectorFailure {
                        detector: detector.name().to_string(),
                        error,
                    });
                }
            }
        }
        report
    }
}
