//! Property-based tests for completion and the composition state machine.
//!
//! Completion is checked against a straightforward reference (linear filter,
//! linear case-folded merge). The engine is driven with random key sequences
//! and structural invariants are checked after every key.

use proptest::prelude::*;

use libfox_core::{
    Candidate, CandidateMatcher, CompositionState, Config, ImeEngine, KeyDescriptor, NamedKey,
    PhraseEntry, PhraseTable, TableCatalog, CANDIDATES_PER_PAGE,
};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_phrase_char() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['a', 'a', 'b', 'n', 'A', 'B', '’', ' '])
}

fn arb_phrase() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_phrase_char(), 1..5).prop_map(|cs| cs.into_iter().collect())
}

fn arb_table() -> impl Strategy<Value = Vec<PhraseEntry>> {
    prop::collection::vec(
        (arb_phrase(), 0u8..4).prop_map(|(p, d)| PhraseEntry::new(p, format!("d{}", d))),
        0..40,
    )
}

#[derive(Debug, Clone)]
enum Action {
    Type(char),
    Named(NamedKey),
    Punctuation(char),
    SelectCandidate(usize),
    Reset,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        40 => prop::sample::select(vec!['a', 'b', 'n', 'A', '\'', '^']).prop_map(Action::Type),
        4 => prop::sample::select(vec!['1', '2', '3', '9', '0']).prop_map(Action::Type),
        3 => prop::sample::select(vec!['.', ',', '-']).prop_map(Action::Punctuation),
        30 => prop::sample::select(vec![
            NamedKey::Tab,
            NamedKey::Return,
            NamedKey::Space,
            NamedKey::Escape,
            NamedKey::Backspace,
            NamedKey::Delete,
            NamedKey::Left,
            NamedKey::Right,
            NamedKey::Up,
            NamedKey::Down,
            NamedKey::PageUp,
            NamedKey::PageDown,
            NamedKey::Home,
            NamedKey::End,
            NamedKey::Other,
        ])
        .prop_map(Action::Named),
        2 => (0usize..10).prop_map(Action::SelectCandidate),
        1 => Just(Action::Reset),
    ]
}

// ---------------------------------------------------------------------------
// Reference completion
// ---------------------------------------------------------------------------

fn reference_literal(entries: &[PhraseEntry], prefix: &str) -> Vec<Candidate> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.phrase.cmp(&b.phrase));

    let mut out: Vec<Candidate> = Vec::new();
    for e in sorted.iter().filter(|e| e.phrase.starts_with(prefix)) {
        let folded = e.phrase.to_lowercase();
        match out.iter_mut().find(|c| c.display_text.to_lowercase() == folded) {
            Some(c) => {
                c.description.push('/');
                c.description.push_str(&e.description);
            }
            None => out.push(Candidate::new(e.phrase.clone(), e.description.clone())),
        }
    }
    out
}

fn reference_complete(entries: &[PhraseEntry], prefix: &str) -> Vec<Candidate> {
    if prefix.is_empty() {
        return Vec::new();
    }
    let mut out = reference_literal(entries, prefix);
    if prefix.chars().next().is_some_and(char::is_uppercase) {
        for c in reference_literal(entries, &prefix.to_lowercase()) {
            let mut chars = c.display_text.chars();
            let capitalized: String = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
            out.push(Candidate::new(capitalized, c.description));
        }
    }
    out.sort_by_key(|c| c.display_text.chars().count());
    out
}

// ---------------------------------------------------------------------------
// Engine invariants
// ---------------------------------------------------------------------------

fn execute(engine: &mut ImeEngine, action: &Action) {
    match action {
        Action::Type(ch) | Action::Punctuation(ch) => {
            engine.process_key(&KeyDescriptor::char(*ch));
        }
        Action::Named(NamedKey::Space) => {
            engine.process_key(&KeyDescriptor::char(' '));
        }
        Action::Named(name) => {
            engine.process_key(&KeyDescriptor::named(*name));
        }
        Action::SelectCandidate(i) => {
            engine.select_candidate(*i);
        }
        Action::Reset => engine.reset(),
    }
}

fn assert_invariants(engine: &ImeEngine, action: &Action) {
    let ctx = engine.context();
    match engine.state() {
        CompositionState::Committing { .. } => {
            panic!("Committing must be folded away, after {:?}", action)
        }
        CompositionState::Idle => {
            assert!(
                !ctx.has_visible_state(),
                "Idle must clear preedit and candidates, after {:?}",
                action
            );
        }
        CompositionState::Composing(c) => {
            assert!(!c.buffer().is_empty(), "empty composing buffer after {:?}", action);
            assert!(
                c.cursor() <= c.buffer().chars().count(),
                "cursor {} beyond buffer {:?} after {:?}",
                c.cursor(),
                c.buffer(),
                action
            );
            match c.selected_index() {
                Some(i) => assert!(i < c.candidates().len(), "selection out of bounds after {:?}", action),
                None => assert!(c.candidates().is_empty(), "candidates without selection after {:?}", action),
            }
            assert!(c.page_candidates().len() <= CANDIDATES_PER_PAGE);
            assert_eq!(ctx.preedit_text, c.buffer());
            assert_eq!(ctx.preedit_cursor, c.cursor());
            assert_eq!(ctx.candidates.len(), c.page_candidates().len());
            assert!(!c.buffer().contains('\''), "raw apostrophe in buffer {:?}", c.buffer());
        }
    }
}

// ---------------------------------------------------------------------------
// proptest entry points
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn completion_matches_reference(entries in arb_table(), prefix in arb_phrase()) {
        let matcher = CandidateMatcher::new(Arc::new(PhraseTable::from_entries("p", entries.clone())));
        prop_assert_eq!(matcher.complete(&prefix), reference_complete(&entries, &prefix));
        // Second call comes from the cache
        prop_assert_eq!(matcher.complete(&prefix), reference_complete(&entries, &prefix));
    }

    #[test]
    fn empty_prefix_never_completes(entries in arb_table()) {
        let matcher = CandidateMatcher::new(Arc::new(PhraseTable::from_entries("p", entries)));
        prop_assert!(matcher.complete("").is_empty());
    }

    #[test]
    fn engine_invariants_hold(
        entries in arb_table(),
        actions in prop::collection::vec(arb_action(), 1..100),
    ) {
        let catalog = TableCatalog::from_table(PhraseTable::from_entries("p", entries));
        let mut engine = ImeEngine::new(catalog, &Config::default());
        for action in &actions {
            execute(&mut engine, action);
            assert_invariants(&engine, action);
        }
    }
}
