//! Property-based tests for custom command response matching
//!
//! Tests invariants:
//! - Literal patterns match themselves, any case, with or without a slash,
//!   followed by any number of arguments
//! - Each wildcard accepts exactly one argument
//! - A longer matching pattern always beats a one-token prefix
//! - Regex metacharacters in patterns only match themselves
//! - Results do not depend on configuration order
//! - The reserved `enabled` key never matches

use proptest::prelude::*;
use proptest::sample::Index;

use crate::core::responses::PatternStore;

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// A literal pattern token
fn arb_word() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}".prop_filter("reserved key", |w| w != "enabled")
}

/// A command argument as a player might type it
fn arb_arg() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._:-]{1,12}"
}

/// (literal word, is wildcard, argument substituted for the wildcard)
fn arb_tokens(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<(String, bool, String)>> {
    prop::collection::vec((arb_word(), any::<bool>(), arb_arg()), len)
}

/// Text made mostly of regex metacharacters
fn arb_special_text() -> impl Strategy<Value = String> {
    r"[a-z.()+?\[\]^$|{}\\]{1,12}"
}

fn arb_pattern() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![arb_word(), Just("*".to_string())], 1..4)
        .prop_map(|tokens| tokens.join(" "))
}

fn arb_command() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![arb_word(), arb_arg()], 1..5)
        .prop_map(|tokens| format!("/{}", tokens.join(" ")))
}

fn pattern_and_command(tokens: &[(String, bool, String)]) -> (String, String) {
    let pattern = tokens
        .iter()
        .map(|(word, wild, _)| if *wild { "*" } else { word.as_str() })
        .collect::<Vec<_>>()
        .join(" ");
    let command = tokens
        .iter()
        .map(|(word, wild, arg)| if *wild { arg.as_str() } else { word.as_str() })
        .collect::<Vec<_>>()
        .join(" ");
    (pattern, command)
}

fn mutate_at(text: &str, index: usize) -> String {
    text.char_indices()
        .map(|(i, c)| match (i == index, c) {
            (true, 'x') => 'y',
            (true, _) => 'x',
            (false, c) => c,
        })
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn literal_pattern_matches_with_trailing_args(
        words in prop::collection::vec(arb_word(), 1..5),
        extra in prop::collection::vec(arb_arg(), 0..4),
        slash in any::<bool>(),
    ) {
        let pattern = words.join(" ");
        let mut command = pattern.to_uppercase();
        for arg in &extra {
            command.push(' ');
            command.push_str(arg);
        }
        if slash {
            command.insert(0, '/');
        }

        let store = PatternStore::new(true, [(pattern.clone(), "hit".to_string())]);
        let found = store.find_match(&command).map(|m| m.pattern);
        prop_assert_eq!(found, Some(pattern));
    }

    #[test]
    fn literal_pattern_rejects_glued_suffix(
        words in prop::collection::vec(arb_word(), 1..4),
        suffix in "[a-z0-9]{1,4}",
    ) {
        let pattern = words.join(" ");
        let command = format!("{pattern}{suffix}");

        let store = PatternStore::new(true, [(pattern, "hit".to_string())]);
        prop_assert!(store.find_match(&command).is_none());
    }

    #[test]
    fn wildcard_accepts_any_single_argument(
        tokens in arb_tokens(1..6),
        extra in prop::collection::vec(arb_arg(), 0..3),
    ) {
        prop_assume!(tokens.iter().any(|(_, wild, _)| *wild));
        let (pattern, mut command) = pattern_and_command(&tokens);
        for arg in &extra {
            command.push(' ');
            command.push_str(arg);
        }

        let store = PatternStore::new(true, [(pattern.clone(), "hit".to_string())]);
        let found = store.find_match(&command).map(|m| m.pattern);
        prop_assert_eq!(found, Some(pattern));
    }

    #[test]
    fn wildcard_requires_an_argument(tokens in arb_tokens(2..6)) {
        let last_wild = tokens.last().map(|(_, wild, _)| *wild).unwrap_or(false);
        prop_assume!(last_wild);
        let (pattern, command) = pattern_and_command(&tokens[..tokens.len() - 1]);
        let pattern = format!("{pattern} *");

        let store = PatternStore::new(true, [(pattern, "hit".to_string())]);
        prop_assert!(store.find_match(&command).is_none());
    }

    #[test]
    fn longer_pattern_beats_one_token_prefix(tokens in arb_tokens(2..6)) {
        let (pattern, command) = pattern_and_command(&tokens);
        let short = pattern.split(' ').next().unwrap_or_default().to_string();

        let store = PatternStore::new(
            true,
            [(short, "short".to_string()), (pattern.clone(), "long".to_string())],
        );
        let found = store.find_match(&command);
        prop_assert_eq!(found.map(|m| m.response), Some("long".to_string()));
    }

    #[test]
    fn metacharacters_are_literal(text in arb_special_text(), index in any::<Index>()) {
        let mutated = mutate_at(&text, index.index(text.len()));

        let literal = PatternStore::new(true, [(text.clone(), "hit".to_string())]);
        prop_assert!(literal.find_match(&text).is_some());
        prop_assert!(literal.find_match(&mutated).is_none());

        let wildcard = PatternStore::new(true, [(format!("{text} *"), "hit".to_string())]);
        let text_steve = format!("{text} steve");
        let mutated_steve = format!("{mutated} steve");
        prop_assert!(wildcard.find_match(&text_steve).is_some());
        prop_assert!(wildcard.find_match(&mutated_steve).is_none());
    }

    #[test]
    fn lookup_is_idempotent_and_order_independent(
        rules in prop::collection::hash_map(arb_pattern(), "[a-z ]{0,8}", 0..8),
        command in arb_command(),
    ) {
        let entries: Vec<(String, String)> = rules.into_iter().collect();
        let mut reversed = entries.clone();
        reversed.reverse();

        let store = PatternStore::new(true, entries);
        let first = store.find_match(&command);
        let second = store.find_match(&command);
        prop_assert_eq!(&first, &second);

        let other = PatternStore::new(true, reversed);
        prop_assert_eq!(first, other.find_match(&command));
    }

    #[test]
    fn reserved_key_never_matches(key in "[eE][nN][aA][bB][lL][eE][dD]", response in "[a-z]{1,8}") {
        let store = PatternStore::new(true, [(key.clone(), response)]);
        prop_assert!(store.is_empty());
        prop_assert!(store.find_match(&key).is_none());
        let key_now = format!("/{key} now");
        prop_assert!(store.find_match(&key_now).is_none());
    }
}
