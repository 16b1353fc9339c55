//! Pattern -> correction rule tables.
//!
//! Three built-in tables ship with the engine: grammar, spelling, and
//! style (which also carries the conciseness, clarity and engagement
//! rewrites). A [`RuleSet`] owns compiled copies, so callers can hand an
//! engine a smaller or larger set without touching global state.

use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};

use crate::suggestion::{Category, Severity};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("template `{template}` references group ${group}, pattern `{pattern}` has {available}")]
    UnknownGroup {
        pattern: String,
        template: String,
        group: usize,
        available: usize,
    },

    #[error("confidence {0} outside 0..=1")]
    InvalidConfidence(f64),
}

// ---------------------------------------------------------------------------
// Replacement templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart {
    Text(String),
    Group(usize),
}

/// Replacement text with `$N` back-references; `$$` is a literal dollar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    parts: Vec<TemplatePart>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                text.push(c);
                continue;
            }
            if chars.peek() == Some(&'$') {
                chars.next();
                text.push('$');
                continue;
            }
            let mut digits = String::new();
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(d);
                chars.next();
            }
            match digits.parse::<usize>() {
                Ok(group) => {
                    if !text.is_empty() {
                        parts.push(TemplatePart::Text(std::mem::take(&mut text)));
                    }
                    parts.push(TemplatePart::Group(group));
                }
                // A lone `$` stays literal
                Err(_) => {
                    text.push('$');
                    text.push_str(&digits);
                }
            }
        }
        if !text.is_empty() {
            parts.push(TemplatePart::Text(text));
        }

        Self {
            source: source.to_string(),
            parts,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn highest_group(&self) -> Option<usize> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                TemplatePart::Group(g) => Some(*g),
                TemplatePart::Text(_) => None,
            })
            .max()
    }

    /// Groups that did not participate in the match expand to nothing.
    pub fn expand(&self, caps: &Captures<'_>) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                TemplatePart::Text(t) => out.push_str(t),
                TemplatePart::Group(g) => {
                    if let Some(m) = caps.get(*g) {
                        out.push_str(m.as_str());
                    }
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    Literal(String),
    Templated(Template),
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Uncompiled rule descriptor. Built-in tables are static slices of these.
#[derive(Debug, Clone, Copy)]
pub struct RuleDef<'a> {
    pub pattern: &'a str,
    pub replacement: &'a str,
    pub templated: bool,
    pub case_insensitive: bool,
    pub category: Category,
    pub explanation: &'a str,
    pub severity: Severity,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: Replacement,
    category: Category,
    explanation: String,
    severity: Severity,
    confidence: f64,
    /// Carry a leading capital from the match into the proposal.
    match_case: bool,
}

impl Rule {
    pub fn compile(def: &RuleDef<'_>) -> Result<Self, RuleError> {
        if !(0.0..=1.0).contains(&def.confidence) {
            return Err(RuleError::InvalidConfidence(def.confidence));
        }
        let pattern = RegexBuilder::new(def.pattern)
            .case_insensitive(def.case_insensitive)
            .build()
            .map_err(|e| RuleError::InvalidPattern {
                pattern: def.pattern.to_string(),
                reason: e.to_string(),
            })?;

        let replacement = if def.templated {
            let template = Template::parse(def.replacement);
            // captures_len counts the implicit whole-match group 0
            let available = pattern.captures_len() - 1;
            if let Some(group) = template.highest_group().filter(|g| *g > available) {
                return Err(RuleError::UnknownGroup {
                    pattern: def.pattern.to_string(),
                    template: def.replacement.to_string(),
                    group,
                    available,
                });
            }
            Replacement::Templated(template)
        } else {
            Replacement::Literal(def.replacement.to_string())
        };

        Ok(Self {
            pattern,
            replacement,
            category: def.category,
            explanation: def.explanation.to_string(),
            severity: def.severity,
            confidence: def.confidence,
            match_case: def.case_insensitive,
        })
    }

    /// Whole-word, case-insensitive misspelling with a literal correction.
    pub fn spelling(wrong: &str, right: &str, explanation: &str) -> Result<Self, RuleError> {
        let pattern = format!(r"\b{}\b", regex::escape(wrong));
        Self::compile(&RuleDef {
            pattern: &pattern,
            replacement: right,
            templated: false,
            case_insensitive: true,
            category: Category::Spelling,
            explanation,
            severity: Severity::Error,
            confidence: 0.99,
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn name(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Corrected text for one match of this rule's pattern.
    pub fn propose(&self, caps: &Captures<'_>) -> String {
        let proposed = match &self.replacement {
            Replacement::Literal(text) => text.clone(),
            Replacement::Templated(template) => template.expand(caps),
        };
        let starts_upper = caps
            .get(0)
            .and_then(|m| m.as_str().chars().next())
            .is_some_and(char::is_uppercase);
        if self.match_case && starts_upper {
            capitalize_first(&proposed)
        } else {
            proposed
        }
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => s.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Rule sets
// ---------------------------------------------------------------------------

/// Ordered rule tables owned by an engine. Scan order is grammar, spelling, style.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub grammar: Vec<Rule>,
    pub spelling: Vec<Rule>,
    pub style: Vec<Rule>,
}

static BUILTIN: Lazy<RuleSet> = Lazy::new(|| {
    let compile_table = |defs: &[RuleDef<'static>]| -> Vec<Rule> {
        defs.iter()
            .map(|d| Rule::compile(d).expect("built-in rule table is valid"))
            .collect()
    };
    RuleSet {
        grammar: compile_table(GRAMMAR_TABLE),
        spelling: SPELLING_TABLE
            .iter()
            .map(|&(wrong, right, why)| {
                let explanation = if why.is_empty() {
                    format!("Spelling correction: \"{wrong}\" should be \"{right}\"")
                } else {
                    why.to_string()
                };
                Rule::spelling(wrong, right, &explanation).expect("built-in spelling table is valid")
            })
            .collect(),
        style: compile_table(STYLE_TABLE),
    }
});

impl RuleSet {
    /// Every built-in table.
    pub fn standard() -> Self {
        BUILTIN.clone()
    }

    /// Built-in grammar and spelling tables only.
    pub fn without_style() -> Self {
        Self {
            style: Vec::new(),
            ..Self::standard()
        }
    }

    pub fn len(&self) -> usize {
        self.grammar.len() + self.spelling.len() + self.style.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

const fn grammar(
    pattern: &'static str,
    replacement: &'static str,
    explanation: &'static str,
    severity: Severity,
    confidence: f64,
) -> RuleDef<'static> {
    RuleDef {
        pattern,
        replacement,
        templated: false,
        case_insensitive: true,
        category: Category::Grammar,
        explanation,
        severity,
        confidence,
    }
}

const fn templated(def: RuleDef<'static>) -> RuleDef<'static> {
    RuleDef {
        templated: true,
        ..def
    }
}

const fn case_sensitive(def: RuleDef<'static>) -> RuleDef<'static> {
    RuleDef {
        case_insensitive: false,
        ..def
    }
}

const fn rewrite(
    category: Category,
    pattern: &'static str,
    replacement: &'static str,
    explanation: &'static str,
    confidence: f64,
) -> RuleDef<'static> {
    RuleDef {
        pattern,
        replacement,
        templated: false,
        case_insensitive: true,
        category,
        explanation,
        severity: Severity::Suggestion,
        confidence,
    }
}

static GRAMMAR_TABLE: &[RuleDef<'static>] = &[
    // Subject-verb agreement, common ESL errors
    templated(grammar(
        r"\btechnology have\b(\s+\w+)?",
        "technology has$1",
        "Subject-verb agreement: Singular subjects take singular verbs (\"technology has\")",
        Severity::Error,
        0.95,
    )),
    grammar(
        r"\bdidn't had\b",
        "didn't have",
        "Auxiliary verb error: Use base form \"have\" after \"didn't\"",
        Severity::Error,
        0.95,
    ),
    grammar(
        r"\bthey was\b",
        "they were",
        "Subject-verb agreement: Plural subjects take plural verbs (\"they were\")",
        Severity::Error,
        0.95,
    ),
    grammar(
        r"\bI am agree\b",
        "I agree",
        "Verb form error: Use \"I agree\" not \"I am agree\"",
        Severity::Error,
        0.95,
    ),
    grammar(
        r"\bthis also create\b",
        "this also creates",
        "Subject-verb agreement: Singular subjects take singular verbs (\"this creates\")",
        Severity::Error,
        0.95,
    ),
    grammar(
        r"\bprofessors is\b",
        "professors are",
        "Subject-verb agreement: Plural subjects take plural verbs (\"professors are\")",
        Severity::Error,
        0.95,
    ),
    grammar(
        r"\bSince I was child\b",
        "Since I was a child",
        "Article error: Add \"a\" before singular countable nouns (\"Since I was a child\")",
        Severity::Error,
        0.95,
    ),
    grammar(
        r"\bfeel embarrass\b",
        "feel embarrassed",
        "Adjective form: Use \"embarrassed\" (past participle) to describe feelings",
        Severity::Error,
        0.95,
    ),
    grammar(
        r"\bcan became\b",
        "can become",
        "Modal verb error: Use base form \"become\" after modal verbs like \"can\"",
        Severity::Error,
        0.95,
    ),
    grammar(
        r"\baccess to informations? very easy\b",
        "easily access information",
        "The correct phrase is 'access information' without 'to', and 'easily' should come before the verb 'access'",
        Severity::Error,
        0.95,
    ),
    RuleDef {
        category: Category::Style,
        ..grammar(
            r"\bthink about it carefully\b",
            "consider carefully",
            "Clarity: Remove redundant pronoun for clearer writing",
            Severity::Suggestion,
            0.95,
        )
    },
    templated(grammar(
        r"\bthere is (\w+s)\b",
        "there are $1",
        "Subject-verb disagreement: Use \"are\" with plural nouns",
        Severity::Error,
        0.95,
    )),
    grammar(
        r"\byour welcome\b",
        "you're welcome",
        "Use \"you're\" (you are) not \"your\" (possessive)",
        Severity::Error,
        0.95,
    ),
    grammar(
        r"\bshould of\b",
        "should have",
        "Use \"should have\" not \"should of\"",
        Severity::Error,
        0.99,
    ),
    grammar(
        r"\bcould of\b",
        "could have",
        "Use \"could have\" not \"could of\"",
        Severity::Error,
        0.99,
    ),
    grammar(
        r"\bwould of\b",
        "would have",
        "Use \"would have\" not \"would of\"",
        Severity::Error,
        0.99,
    ),
    case_sensitive(grammar(
        r"\b(i)\b",
        "I",
        "The pronoun \"I\" should always be capitalized",
        Severity::Warning,
        0.95,
    )),
];

/// `(wrong, right, explanation)`; an empty explanation gets a generic one.
/// Entries whose correction equals the misspelling are kept: the
/// deduplicator drops their no-op suggestions.
static SPELLING_TABLE: &[(&str, &str, &str)] = &[
    ("beleive", "believe", "Spelling: \"believe\" follows \"i before e except after c\""),
    ("lifes", "lives", "Spelling: Plural of \"life\" is \"lives\""),
    ("significent", "significant", "Spelling: \"significant\" ends with \"-ant\""),
    ("informations", "information", "Grammar: \"Information\" is uncountable in English"),
    ("carrier", "career", "Spelling: \"career\" (profession) vs \"carrier\" (transport)"),
    ("recieve", "receive", "Spelling: \"receive\" follows \"i before e except after c\""),
    ("acheive", "achieve", "Spelling: \"achieve\" follows \"i before e except after c\""),
    ("conceive", "conceive", "Spelling: \"conceive\" follows \"i before e except after c\""),
    ("concieve", "conceive", ""),
    ("decieve", "deceive", ""),
    ("seperate", "separate", "Spelling: \"separate\" has \"a\" in the middle"),
    ("definately", "definitely", "Spelling: \"definitely\" ends with \"-itely\""),
    ("occured", "occurred", "Spelling: \"occurred\" has double \"r\""),
    ("occurence", "occurrence", "Spelling: \"occurrence\" has double \"r\" and \"c\""),
    ("accomodate", "accommodate", "Spelling: \"accommodate\" has double \"m\""),
    ("neccessary", "necessary", "Spelling: \"necessary\" has one \"c\" and two \"s\""),
    ("possesion", "possession", "Spelling: \"possession\" has double \"s\""),
    ("profesional", "professional", "Spelling: \"professional\" has double \"s\""),
    ("achievment", "achievement", "Spelling: \"achievement\" has \"e\" before \"ment\""),
    ("judgement", "judgment", "Spelling: American English uses \"judgment\" without \"e\""),
    ("acknowledgement", "acknowledgment", "Spelling: American English uses \"acknowledgment\" without \"e\""),
    ("enviroment", "environment", "Spelling: \"environment\" has \"n\" before \"ment\""),
    ("government", "government", "Spelling: \"government\" has \"n\" before \"ment\""),
    ("developement", "development", "Spelling: \"development\" has no \"e\" before \"ment\""),
    ("existance", "existence", ""),
    ("independant", "independent", ""),
    ("persistance", "persistence", ""),
    ("preperation", "preparation", ""),
    ("recomend", "recommend", ""),
    ("resistence", "resistance", ""),
    ("responsability", "responsibility", ""),
    ("temperture", "temperature", ""),
    ("tommorow", "tomorrow", "Spelling: \"tomorrow\" has one \"m\""),
    ("tommorrow", "tomorrow", "Spelling: \"tomorrow\" has one \"m\""),
    ("untill", "until", "Spelling: \"until\" has one \"l\""),
    ("wierd", "weird", "Spelling: \"weird\" is an exception to \"i before e\""),
    ("freinds", "friends", "Spelling: \"friends\" follows \"i before e except after c\""),
    ("beginning", "beginning", "Spelling: \"beginning\" has double \"n\""),
    ("committee", "committee", "Spelling: \"committee\" has double \"m\" and \"t\""),
    ("mispell", "misspell", "Spelling: \"misspell\" has double \"s\""),
    ("mispelled", "misspelled", "Spelling: \"misspelled\" has double \"s\""),
    ("there own", "their own", "Spelling: Use \"their\" (possessive) not \"there\" (location)"),
    ("thier", "their", "Spelling: \"their\" has \"e\" before \"i\""),
    ("website", "website", "Spelling: \"website\" is one word"),
    ("email", "email", "Spelling: \"email\" is typically one word"),
    ("alot", "a lot", "Spelling: \"a lot\" is two words"),
    ("allot", "a lot", "Spelling: \"a lot\" is two words (unless you mean voting ballot)"),
    ("thru", "through", "Spelling: Use \"through\" in formal writing, not \"thru\""),
    ("rite", "right", "Spelling: Use \"right\" not \"rite\" (unless referring to a ceremony)"),
    ("interupt", "interrupt", "Spelling: \"interrupt\" has double \"r\""),
    ("similiar", "similar", "Spelling: \"similar\" ends with \"-ar\""),
    ("writting", "writing", "Spelling: \"writing\" has one \"t\""),
    ("comming", "coming", "Spelling: \"coming\" has one \"m\""),
    ("runing", "running", "Spelling: \"running\" has double \"n\""),
    ("stoping", "stopping", "Spelling: \"stopping\" has double \"p\""),
    ("geting", "getting", "Spelling: \"getting\" has double \"t\""),
    ("puting", "putting", "Spelling: \"putting\" has double \"t\""),
    ("siting", "sitting", "Spelling: \"sitting\" has double \"t\""),
    ("fiting", "fitting", "Spelling: \"fitting\" has double \"t\""),
    ("cuting", "cutting", "Spelling: \"cutting\" has double \"t\""),
    ("hiting", "hitting", "Spelling: \"hitting\" has double \"t\""),
    ("begining", "beginning", "Spelling: \"beginning\" has double \"n\""),
    ("wining", "winning", "Spelling: \"winning\" has double \"n\""),
    ("planing", "planning", "Spelling: \"planning\" has double \"n\""),
    ("sining", "singing", "Spelling: \"singing\" has \"g\""),
    ("teh", "the", "Spelling: \"the\" - common typo"),
    ("adn", "and", "Spelling: \"and\" - common typo"),
    ("speling", "spelling", "Spelling: \"spelling\" has double \"l\""),
    ("embarrasseded", "embarrassed", "The correct form is 'embarrassed', the past participle of 'embarrass'; there is no extra 'ed'"),
];

static STYLE_TABLE: &[RuleDef<'static>] = &[
    // Intensifiers and hedges
    rewrite(
        Category::Style,
        r"\bvery\s+very\b",
        "extremely",
        "Repetitive intensifier: Replace \"very very\" with a stronger alternative",
        0.9,
    ),
    rewrite(
        Category::Style,
        r"\breally\s+really\b",
        "truly",
        "Repetitive intensifier: Use a stronger alternative to repeated \"really\"",
        0.9,
    ),
    rewrite(
        Category::Style,
        r"\bso\s+so\b",
        "extremely",
        "Repetitive intensifier: Use a more precise alternative",
        0.85,
    ),
    rewrite(
        Category::Style,
        r"\bkind\s+of\b",
        "somewhat",
        "Informal language: Consider \"somewhat\" or \"rather\" for formal writing",
        0.7,
    ),
    rewrite(
        Category::Style,
        r"\bsort\s+of\b",
        "somewhat",
        "Informal language: Consider \"somewhat\" or \"rather\" for formal writing",
        0.7,
    ),
    // Wordiness
    rewrite(
        Category::Conciseness,
        r"\bin\s+order\s+to\b",
        "to",
        "Wordiness: \"to\" is more concise than \"in order to\"",
        0.9,
    ),
    rewrite(
        Category::Conciseness,
        r"\bdue\s+to\s+the\s+fact\s+that\b",
        "because",
        "Wordiness: \"because\" is more direct than \"due to the fact that\"",
        0.95,
    ),
    rewrite(
        Category::Conciseness,
        r"\bin\s+spite\s+of\s+the\s+fact\s+that\b",
        "although",
        "Wordiness: \"although\" is more concise than \"in spite of the fact that\"",
        0.9,
    ),
    rewrite(
        Category::Conciseness,
        r"\bby\s+means\s+of\b",
        "by",
        "Wordiness: \"by\" is more direct than \"by means of\"",
        0.85,
    ),
    rewrite(
        Category::Conciseness,
        r"\bfor\s+the\s+purpose\s+of\b",
        "to",
        "Wordiness: \"to\" is more concise than \"for the purpose of\"",
        0.9,
    ),
    // Clarity
    RuleDef {
        templated: true,
        ..rewrite(
            Category::Clarity,
            r"\bwhich\s+is\s+(\w+)\b",
            "$1",
            "Clarity: Consider removing \"which is\" for more direct writing",
            0.75,
        )
    },
    rewrite(
        Category::Clarity,
        r"\bthat\s+is\s+to\s+say\b",
        "namely",
        "Clarity: \"namely\" is more direct than \"that is to say\"",
        0.8,
    ),
    rewrite(
        Category::Clarity,
        r"\bin\s+other\s+words\b",
        "specifically",
        "Clarity: Consider \"specifically\" or \"namely\" for clearer expression",
        0.7,
    ),
    // Engagement
    rewrite(
        Category::Engagement,
        r"\bI\s+think\s+that\b",
        "I believe",
        "Confidence: \"I believe\" sounds more confident than \"I think that\"",
        0.6,
    ),
    rewrite(
        Category::Engagement,
        r"\bmaybe\s+we\s+should\b",
        "we should consider",
        "Confidence: More assertive phrasing engages readers better",
        0.65,
    ),
];
