// tests/context_rules.rs
use symbios_rewrite::{ContextIndex, ContextRule, Expander, LSystem, tokenize};

#[test]
fn window_fires_only_when_fully_inside_bounds() {
    let rule = ContextRule::new(tokenize("a B c"), 1, vec![tokenize("Z")]).unwrap();
    let host = tokenize("a B c");

    assert!(rule.matches(&host, 1).is_some());
    // Position 0 has no left neighbor, position 2 no right neighbor; a
    // partial overlap must not fire.
    assert!(rule.matches(&host, 0).is_none());
    assert!(rule.matches(&host, 2).is_none());
    assert!(rule.matches(&tokenize("B c"), 0).is_none());
}

#[test]
fn center_outside_the_pattern_is_rejected() {
    assert!(ContextRule::new(tokenize("a B"), 2, vec![tokenize("Z")]).is_none());
    assert!(ContextRule::new(tokenize("a B"), -2, vec![tokenize("Z")]).is_none());
    assert!(ContextRule::new(tokenize(""), -1, vec![tokenize("Z")]).is_none());
    // Center on the last pattern symbol is legal: all context to the left.
    assert!(ContextRule::new(tokenize("a B"), 1, vec![tokenize("Z")]).is_some());
    // Center -1 is legal too: all context to the right.
    assert!(ContextRule::new(tokenize("a B"), -1, vec![tokenize("Z")]).is_some());
}

#[test]
fn negative_center_anchors_the_window_to_the_right() {
    let rule = ContextRule::new(tokenize("a b"), -1, vec![tokenize("R")]).unwrap();
    let host = tokenize("Q a b");

    // The window starts one past the rewritten position: Q is rewritten on
    // the strength of the "a b" that follows it.
    assert!(rule.matches(&host, 0).is_some());
    assert!(rule.matches(&host, 1).is_none());
    assert!(rule.matches(&host, 2).is_none());
}

#[test]
fn right_context_key_rewrites_via_following_symbols() {
    let mut grammar = LSystem::with_axiom("Q a b");
    grammar.push_replacement_str("-1 a b", "R");
    let mut expander = Expander::with_seed(grammar, 3);

    assert!(expander.is_windowed());
    assert_eq!(expander.expansion_for_level(1).unwrap(), &tokenize("R a b"));
}

#[test]
fn deserialized_rules_go_through_center_validation() {
    let bad = r#"{"pattern":["a","B"],"center":5,"alternatives":[["Z"]]}"#;
    assert!(serde_json::from_str::<ContextRule>(bad).is_err());

    let good = r#"{"pattern":["a","b"],"center":-1,"alternatives":[["R"]]}"#;
    let rule: ContextRule = serde_json::from_str(good).unwrap();
    assert!(rule.matches(&tokenize("Q a b"), 0).is_some());
}

#[test]
fn windowed_rewrite_replaces_the_center_symbol_only() {
    let mut grammar = LSystem::with_axiom("X Y X");
    grammar.push_replacement_str("1 X Y X", "Z");
    let mut expander = Expander::with_seed(grammar, 5);

    assert!(expander.is_windowed());
    assert_eq!(expander.expansion_for_level(1).unwrap(), &tokenize("X Z X"));
    assert_eq!(expander.draws(), 0, "a single candidate never draws");
}

#[test]
fn malformed_context_key_loses_its_alternatives() {
    // "q B c" has a non-numeric offset: the whole key is dropped, so in
    // windowed mode B's productions are unreachable and B copies through.
    let mut grammar = LSystem::with_axiom("B X Y X");
    grammar.push_replacement_str("q B c", "W");
    grammar.push_replacement_str("1 X Y X", "Z");
    let mut expander = Expander::with_seed(grammar, 5);

    assert!(expander.is_windowed());
    assert_eq!(
        expander.expansion_for_level(1).unwrap(),
        &tokenize("B X Z X")
    );
}

#[test]
fn out_of_range_offset_is_dropped() {
    let mut grammar = LSystem::with_axiom("a B");
    grammar.push_replacement_str("5 a B", "Z");
    let index = ContextIndex::from_grammar(&grammar);

    assert!(index.rules().is_empty());
    assert!(!index.is_windowed());
}

#[test]
fn degenerate_rules_coexist_with_windowed_rules() {
    let mut grammar = LSystem::with_axiom("B X Y X");
    grammar.push_replacement_str("B", "B B");
    grammar.push_replacement_str("1 X Y X", "Z");
    let mut expander = Expander::with_seed(grammar, 5);

    assert!(expander.is_windowed());
    assert_eq!(
        expander.expansion_for_level(1).unwrap(),
        &tokenize("B B X Z X")
    );
}

#[test]
fn single_symbol_keys_alone_keep_the_flat_path() {
    let mut grammar = LSystem::with_axiom("F");
    grammar.push_replacement_str("F", "F F");
    let index = ContextIndex::from_grammar(&grammar);

    // A degenerate rule registers, but without any windowed key the driver
    // stays on exact-key lookup.
    assert_eq!(index.rules().len(), 1);
    assert!(!index.is_windowed());
    assert!(!Expander::with_seed(LSystem::with_axiom("F"), 0).is_windowed());
}

#[test]
fn blank_keys_are_discarded() {
    let mut grammar = LSystem::with_axiom("F");
    grammar.push_replacement_str("   ", "Z");
    let index = ContextIndex::from_grammar(&grammar);

    assert!(index.rules().is_empty());
    assert!(!index.is_windowed());
}

#[test]
fn overlapping_rules_pool_their_candidates() {
    // Both rules fire at position 1 of "W X Y": the right-context rule
    // "0 X Y" and the left-context rule "1 W X". The rewrite draws once
    // between the pooled candidates.
    let mut grammar = LSystem::with_axiom("W X Y");
    grammar.push_replacement_str("0 X Y", "P");
    grammar.push_replacement_str("1 W X", "Q");
    let mut expander = Expander::with_seed(grammar, 11);

    let level1 = expander.expansion_for_level(1).unwrap().clone();
    assert!(
        level1 == tokenize("W P Y") || level1 == tokenize("W Q Y"),
        "expected one pooled candidate at the center, got {level1:?}"
    );
    assert_eq!(expander.draws(), 1);
}

#[test]
fn context_rule_display_names_pattern_and_center() {
    let rule = ContextRule::new(tokenize("a B c"), 1, vec![tokenize("Z")]).unwrap();
    assert_eq!(rule.to_string(), "[a B c] at 1 with 1 alternative(s)");
}
