//! Property-based tests for the invariants in spec §8, mirroring the
//! teacher crate's habit of generating random patterns and cross-checking
//! independent code paths against each other rather than against a fixed
//! oracle. The pattern generator here only ever emits syntactically valid
//! patterns (it builds the concatenation/alternation/star/group/class
//! shapes directly, rather than generating arbitrary byte soup and hoping it
//! parses), since malformed-input coverage is handled by the hand-written
//! unit tests in `parser.rs` instead.

use proptest::prelude::*;

use crate::dfa;
use crate::nfa;
use crate::parser;
use crate::pattern::{self, Regex};

fn arb_pattern() -> impl Strategy<Value = Vec<u8>> {
    let leaf = prop_oneof![
        (b'a'..=b'e').prop_map(|b| vec![b]),
        Just(b".".to_vec()),
        Just(b"[a-e]".to_vec()),
        Just(b"[^a-e]".to_vec()),
    ];
    leaf.prop_recursive(5, 64, 6, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(mut a, b)| {
                a.extend(b);
                a
            }),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| {
                let mut v = vec![b'('];
                v.extend(a);
                v.push(b'|');
                v.extend(b);
                v.push(b')');
                v
            }),
            inner.prop_map(|a| {
                let mut v = vec![b'('];
                v.extend(a);
                v.push(b')');
                v.push(b'*');
                v
            }),
        ]
    })
}

fn arb_text() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(b'a'..=b'f', 0..8)
}

proptest! {
    // Property 1: match(P, "") agrees with whether epsilon is in L(P).
    #[test]
    fn empty_string_match_agrees_with_nfa(pat in arb_pattern()) {
        let ast = parser::parse(&pat).unwrap();
        let n = nfa::compile(&ast);
        let via_dfa = Regex::compile(&pat).unwrap().is_match(b"");
        prop_assert_eq!(via_dfa, n.accepts(b""));
    }

    // Property 2: the compiled DFA path agrees with brute-force NFA
    // simulation on arbitrary text.
    #[test]
    fn dfa_agrees_with_nfa_reference(pat in arb_pattern(), text in arb_text()) {
        let ast = parser::parse(&pat).unwrap();
        let n = nfa::compile(&ast);
        let re = Regex::compile(&pat).unwrap();
        prop_assert_eq!(re.is_match(&text), n.accepts(&text));
    }

    // Property 3: minimization never increases the state count.
    #[test]
    fn minimize_never_grows(pat in arb_pattern()) {
        let ast = parser::parse(&pat).unwrap();
        let n = nfa::compile(&ast);
        let unminimized = dfa::from_nfa(&n);
        let mut minimized = unminimized.clone();
        minimized.minimize();
        prop_assert!(minimized.states.len() <= unminimized.states.len());
    }

    // Property 4: minimized and unminimized DFAs agree on every input.
    #[test]
    fn minimize_preserves_language(pat in arb_pattern(), text in arb_text()) {
        let ast = parser::parse(&pat).unwrap();
        let n = nfa::compile(&ast);
        let unminimized = dfa::from_nfa(&n);
        let mut minimized = unminimized.clone();
        minimized.minimize();
        prop_assert_eq!(unminimized.accepts(&text), minimized.accepts(&text));
    }

    // Property 5: compiling the same pattern twice agrees on verdicts.
    #[test]
    fn compilation_is_idempotent(pat in arb_pattern(), text in arb_text()) {
        let first = Regex::compile(&pat).unwrap().is_match(&text);
        let second = Regex::compile(&pat).unwrap().is_match(&text);
        prop_assert_eq!(first, second);
    }

    // Property 6: search is equivalent to match on a wildcard-wrapped
    // pattern, modulo anchor stripping at the absolute ends.
    #[test]
    fn search_matches_wildcard_wrapped_pattern(pat in arb_pattern(), text in arb_text()) {
        let mut wrapped = b"(".to_vec();
        wrapped.extend(&pat);
        wrapped.push(b')');

        let mut both_wild = wild_prefix();
        both_wild.extend(&wrapped);
        both_wild.extend(wild_prefix());

        let expected = Regex::compile(&both_wild).unwrap().is_match(&text);
        let actual = pattern::is_match_anywhere(&pat, &text).unwrap();
        prop_assert_eq!(actual, expected);
    }

    // Property 7: every NFA the builder produces has exactly one accepting
    // state, and it has no outgoing transitions.
    #[test]
    fn nfa_single_accept_invariant(pat in arb_pattern()) {
        let ast = parser::parse(&pat).unwrap();
        let n = nfa::compile(&ast);
        let accepting: Vec<_> = n.states.iter().filter(|s| s.accepting).collect();
        prop_assert_eq!(accepting.len(), 1);
        let a = accepting[0];
        prop_assert!(a.epsilon.is_empty() && a.byte_transitions.is_empty() && a.class.is_none());
    }

    // Property 8: every DFA state (minimized or not) has all 256 byte
    // transitions defined.
    #[test]
    fn dfa_is_total(pat in arb_pattern()) {
        let ast = parser::parse(&pat).unwrap();
        let n = nfa::compile(&ast);
        let mut d = dfa::from_nfa(&n);
        prop_assert!(d.states.iter().all(|s| s.transitions.len() == 256));
        d.minimize();
        prop_assert!(d.states.iter().all(|s| s.transitions.len() == 256));
    }
}

// `.` doesn't match every byte (it excludes newline), so the wildcard used
// to cross-check `search` against a hand-wrapped pattern uses an explicit
// full-range class instead, matching what `pattern::build_search_ast` does
// internally.
fn wild_prefix() -> Vec<u8> {
    b"[\x00-\xff]*".to_vec()
}
