use wordwise::detect::{Detector, DetectorError};
use wordwise::suggestion::{Finding, ADD_PERIOD};
use wordwise::{
    analyze, apply_all, remote, Category, Complexity, Engine, EngineConfig, GradeLevel, Scanner,
    Severity, Span,
};

const ESSAY: &str = "Since I was child, i always wanted to study abroad. \
                     technology have changed how students learn, and access to information very easy now. \
                     They was happy when professors is helpful. \
                     I beleive that you should of visited the enviroment center tommorow.";

#[test]
fn spelling_scenario() {
    let result = analyze("I beleive this.");
    let hit = result
        .suggestions
        .iter()
        .find(|s| s.matched_text == "beleive")
        .expect("misspelling should be flagged");
    assert_eq!(hit.proposed_text, "believe");
    assert_eq!(hit.category, Category::Spelling);
    assert_eq!(hit.severity, Severity::Error);
    assert_eq!(hit.span, Span::new(2, 9));
}

#[test]
fn subject_verb_scenario() {
    let result = analyze("technology have changed");
    assert!(
        result
            .suggestions
            .iter()
            .any(|s| s.category == Category::Grammar && s.proposed_text == "technology has changed"),
        "expected agreement fix, got {:?}",
        result.suggestions
    );
}

#[test]
fn capitalization_scenario() {
    let result = analyze("hello world");
    let hit = result
        .suggestions
        .iter()
        .find(|s| s.span == Span::new(0, 1))
        .expect("leading capital should be flagged");
    assert_eq!(hit.matched_text, "h");
    assert_eq!(hit.proposed_text, "H");
    assert_eq!(hit.severity, Severity::Warning);
}

#[test]
fn terminal_punctuation_scenario() {
    let text = "This is a sentence";
    let result = analyze(text);
    let hit = result
        .suggestions
        .iter()
        .find(|s| s.matched_text == ADD_PERIOD)
        .expect("missing period should be flagged");
    assert_eq!(hit.proposed_text, "This is a sentence.");
    assert_eq!(hit.span, Span::new(text.len(), text.len()));
    assert!(hit.span.is_empty());
}

#[test]
fn duplicate_collapse_scenario() {
    let text = "i think i am right";
    let result = analyze(text);
    let pronoun_fixes: Vec<_> = result
        .suggestions
        .iter()
        .filter(|s| s.proposed_text == "I")
        .collect();
    assert_eq!(
        pronoun_fixes.len(),
        2,
        "one fix per occurrence, got {pronoun_fixes:?}"
    );
    assert_eq!(pronoun_fixes[0].span, Span::new(0, 1));
    assert_eq!(pronoun_fixes[1].span, Span::new(8, 9));
}

#[test]
fn empty_input_returns_defaults() {
    for text in ["", "   ", "\n\t"] {
        let result = analyze(text);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.readability.flesch_score, 100.0);
        assert_eq!(result.readability.grade_level, GradeLevel::Elementary);
        assert_eq!(result.readability.reading_time_minutes, 0);
        assert_eq!(result.readability.complexity, Complexity::Easy);
        assert_eq!(result.stats.word_count, 0);
        assert_eq!(result.score.score, 100);
    }
}

#[test]
fn no_op_corrections_never_surface() {
    let result = analyze("The government website lists every committee.");
    for word in ["government", "website", "committee"] {
        assert!(
            !result
                .suggestions
                .iter()
                .any(|s| s.matched_text.eq_ignore_ascii_case(word)),
            "{word} should not be flagged"
        );
    }
}

#[test]
fn spans_point_at_matched_text() {
    let result = analyze(ESSAY);
    assert!(!result.suggestions.is_empty());
    for s in &result.suggestions {
        if s.matched_text == ADD_PERIOD {
            continue;
        }
        assert_eq!(
            &ESSAY[s.span.start..s.span.end],
            s.matched_text,
            "span of {} is off",
            s.id
        );
    }
}

#[test]
fn essay_reports_expected_categories() {
    let result = analyze(ESSAY);
    let proposed: Vec<&str> = result
        .suggestions
        .iter()
        .map(|s| s.proposed_text.as_str())
        .collect();
    for expected in [
        "Since I was a child",
        "they were",
        "professors are",
        "should have",
        "environment",
        "tomorrow",
    ] {
        assert!(
            proposed.iter().any(|p| p.eq_ignore_ascii_case(expected)),
            "missing {expected:?} in {proposed:?}"
        );
    }
    assert!(result
        .score
        .factors
        .iter()
        .any(|f| f.contains("spelling error")));
}

#[test]
fn analysis_is_deterministic() {
    let first = serde_json::to_string(&analyze(ESSAY)).unwrap();
    let second = serde_json::to_string(&analyze(ESSAY)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn json_uses_camel_case_fields() {
    let value = serde_json::to_value(analyze("I beleive this.")).unwrap();
    assert!(value["readability"]["fleschScore"].is_number());
    assert!(value["readability"]["readingTimeMinutes"].is_number());
    assert!(value["stats"]["wordCount"].is_number());
    assert!(value["stats"]["averageWordsPerSentence"].is_number());
    assert!(value["score"]["breakdown"]["mechanics"].is_number());

    let first = &value["suggestions"][0];
    assert_eq!(first["matchedText"], "beleive");
    assert_eq!(first["proposedText"], "believe");
    assert_eq!(first["category"], "spelling");
    assert_eq!(first["severity"], "error");
    assert_eq!(first["span"]["start"], 2);
}

#[test]
fn grade_level_serializes_with_spaces() {
    let json = serde_json::to_string(&GradeLevel::MiddleSchool).unwrap();
    assert_eq!(json, "\"Middle School\"");
}

#[test]
fn clean_text_scores_higher_than_error_laden_text() {
    let clean = "The committee met on Tuesday. They reviewed three proposals and selected \
                 the second one after a long discussion. Implementation begins next month.";
    let clean_score = analyze(clean).score.score;
    let messy_score = analyze(ESSAY).score.score;
    assert!(
        clean_score > messy_score,
        "clean {clean_score} should beat messy {messy_score}"
    );
}

struct AlwaysFails;

impl Detector for AlwaysFails {
    fn name(&self) -> &str {
        "always-fails"
    }
    fn id_prefix(&self) -> &str {
        "fails"
    }
    fn detect(&self, _text: &str) -> Result<Vec<Finding>, DetectorError> {
        Err(DetectorError::Failed("unavailable".to_string()))
    }
}

#[test]
fn failing_detector_does_not_abort_analysis() {
    let mut scanner =
        Scanner::standard(wordwise::RuleSet::standard(), &EngineConfig::default()).unwrap();
    scanner.push(Box::new(AlwaysFails));
    let engine = Engine::from_scanner(scanner, 3);

    let report = engine.scan("I beleive this.");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].detector, "always-fails");

    let result = engine.analyze("I beleive this.");
    assert!(result.suggestions.iter().any(|s| s.proposed_text == "believe"));
}

#[test]
fn custom_rule_set_replaces_builtin_tables() {
    let config = EngineConfig {
        proper_names: Vec::new(),
        ..EngineConfig::default()
    };
    let engine = Engine::with_rules(wordwise::RuleSet::default(), &config).unwrap();
    let result = engine.analyze("I beleive this.");
    assert!(
        result.suggestions.is_empty(),
        "no tables, no suggestions: {:?}",
        result.suggestions
    );
}

#[test]
fn config_file_adds_rules() {
    let config = EngineConfig::from_toml_str(
        r#"
        position_tolerance = 2

        [[rules]]
        pattern = '\bthe (\w+) of the\b'
        replacement = "the $1"
        category = "conciseness"
        severity = "suggestion"
        templated = true
        explanation = "Tighten the phrase"
        "#,
    )
    .unwrap();
    let engine = Engine::new(&config).unwrap();
    assert_eq!(engine.tolerance(), 2);

    let result = engine.analyze("We met the members of the board.");
    let hit = result
        .suggestions
        .iter()
        .find(|s| s.category == Category::Conciseness && s.proposed_text == "the members")
        .expect("config rule should fire");
    assert_eq!(hit.matched_text, "the members of the");
}

#[test]
fn remote_suggestions_merge_ahead_of_local() {
    let text = "I beleive this is rite.";
    let payload = r#"{"suggestions":[
        {"type":"spelling","text":"beleive","suggestion":"believe","explanation":"ie","severity":"error"},
        {"type":"spelling","text":"rite","suggestion":"right","explanation":"homophone","severity":"error","confidence":0.8}
    ]}"#;
    let remote = remote::parse_suggestions(payload, text).unwrap();
    let result = Engine::default().analyze_with_remote(text, remote);

    let believe: Vec<_> = result
        .suggestions
        .iter()
        .filter(|s| s.proposed_text == "believe")
        .collect();
    assert_eq!(believe.len(), 1);
    assert_eq!(believe[0].id, "ai-0");

    let right = result
        .suggestions
        .iter()
        .find(|s| s.proposed_text == "right")
        .unwrap();
    assert_eq!(right.span, Span::new(18, 22));
    assert_eq!(right.confidence, 0.8);
}

#[test]
fn applying_all_suggestions_corrects_text() {
    let text = "i think i am right";
    let result = analyze(text);
    let applied = apply_all(text, &result.suggestions);
    assert_eq!(applied.text, "I think I am right.");
    assert!(applied.skipped.is_empty());
}

#[test]
fn applying_overlapping_suggestions_skips_the_conflict() {
    let text = "hello world";
    let result = analyze(text);
    let applied = apply_all(text, &result.suggestions);
    assert_eq!(applied.text, "Hello world.");
}

#[test]
fn lowercase_names_are_capitalized() {
    let result = analyze("I met ali today.");
    let hit = result
        .suggestions
        .iter()
        .find(|s| s.proposed_text == "Ali")
        .expect("lowercase name should be flagged");
    assert_eq!(hit.span, Span::new(6, 9));
}

#[test]
fn case_only_fixes_survive_and_case_only_matches_do_not() {
    let result = analyze("ali went home.");
    let proposals: Vec<_> = result
        .suggestions
        .iter()
        .map(|s| s.proposed_text.as_str())
        .collect();
    assert!(proposals.contains(&"A"), "{proposals:?}");
    assert!(proposals.contains(&"Ali"), "{proposals:?}");

    let result = analyze("Government acts fast.");
    assert!(result.suggestions.is_empty(), "{:?}", result.suggestions);
}

#[test]
fn capitalized_misspelling_keeps_its_capital() {
    let result = analyze("Teh end.");
    assert!(result.suggestions.iter().any(|s| s.proposed_text == "The"));
}

#[test]
fn every_match_of_a_frequent_rule_is_reported() {
    let text = "teh ".repeat(10_001);
    let result = analyze(&text);
    let fixes = result
        .suggestions
        .iter()
        .filter(|s| s.proposed_text == "the")
        .count();
    assert_eq!(fixes, 10_001);
}

#[test]
fn match_cap_applies_only_when_configured() {
    let config = EngineConfig {
        max_matches_per_rule: Some(3),
        ..EngineConfig::default()
    };
    let engine = Engine::new(&config).unwrap();
    let report = engine.scan("teh teh teh teh");
    assert!(report
        .failures
        .iter()
        .any(|f| f.error == DetectorError::TooManyMatches { limit: 3 }));
}

#[test]
fn analysis_reports_tone_and_extended_stats() {
    let text = "Thanks so much, I hope this helps! Please let me know.\n\n\
                We appreciate your help and are glad to be here.";
    let result = analyze(text);
    assert_eq!(result.tone.primary, wordwise::Tone::Friendly);
    assert_eq!(result.stats.paragraph_count, 2);

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["tone"]["primary"], "friendly");
    assert!(value["stats"]["longestSentence"].is_number());
    assert!(value["stats"]["vocabulary"]["repeated"].is_array());
}
