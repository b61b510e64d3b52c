//! Orchestration façade (spec §4.F): compiles a pattern through the full
//! A→B→C→D pipeline and exposes entire-match (`is_match`) and
//! contains-match (`is_match_anywhere`) semantics, one-shot or compiled-once.
//!
//! The spec calls these `match`/`search`; `match` is a Rust keyword, so the
//! free functions are named the way the `regex` crate names its own
//! equivalent, `is_match`.

use crate::ast::{Ast, ClassSpec};
use crate::dfa::{self, Dfa};
use crate::error::ParseError;
use crate::nfa;
use crate::parser;

/// A pattern compiled down to a minimized DFA, ready to be matched against
/// any number of inputs. Immutable after construction: `Regex` holds no
/// interior mutability, so it is `Send + Sync` and safely shared across
/// threads without coordination.
#[derive(Debug, Clone)]
pub struct Regex {
    dfa: Dfa,
}

impl Regex {
    /// Compiles `pattern` for entire-string matching (the spec's
    /// `compile_match`).
    pub fn compile(pattern: &[u8]) -> Result<Self, ParseError> {
        let ast = parser::parse(pattern)?;
        Ok(Self::from_ast(ast))
    }

    /// Compiles `pattern` for contains-matching, anchoring as described in
    /// spec §4.F (the spec's `compile_search`).
    pub fn compile_search(pattern: &[u8]) -> Result<Self, ParseError> {
        let ast = build_search_ast(pattern)?;
        Ok(Self::from_ast(ast))
    }

    fn from_ast(ast: Ast) -> Self {
        let built_nfa = nfa::compile(&ast);
        let mut built_dfa = dfa::from_nfa(&built_nfa);
        built_dfa.minimize();
        Regex { dfa: built_dfa }
    }

    /// Reports whether `text` is accepted. For a `Regex` built with
    /// [`Regex::compile`] this means the whole of `text` must match; for one
    /// built with [`Regex::compile_search`], anchoring was already baked
    /// into the compiled automaton, so this single method serves both.
    pub fn is_match(&self, text: &[u8]) -> bool {
        self.dfa.accepts(text)
    }
}

/// One-shot entire-string match (the spec's `match`).
pub fn is_match(pattern: &[u8], text: &[u8]) -> Result<bool, ParseError> {
    Ok(Regex::compile(pattern)?.is_match(text))
}

/// One-shot contains-match (the spec's `search`).
pub fn is_match_anywhere(pattern: &[u8], text: &[u8]) -> Result<bool, ParseError> {
    Ok(Regex::compile_search(pattern)?.is_match(text))
}

/// Strips a leading `^`/trailing `$` from the raw pattern bytes (not from
/// the parsed AST; `^`/`$` are plain literal bytes to the parser and this
/// stripping only ever happens here, before parsing), parses the remainder,
/// wraps it in a capturing group, and pads with a `(0x00..0xFF)*` wildcard on
/// whichever end had no anchor.
fn build_search_ast(pattern: &[u8]) -> Result<Ast, ParseError> {
    let has_caret = pattern.first() == Some(&b'^');
    let caret_len = usize::from(has_caret);
    let has_dollar = pattern.len() > caret_len && pattern.last() == Some(&b'$');
    let dollar_len = usize::from(has_dollar);

    let body_bytes = &pattern[caret_len..pattern.len() - dollar_len];
    let (body, next_group) = parser::parse_tracked(body_bytes)?;
    let wrapped = Ast::Group(next_group, Box::new(body));

    let with_prefix = if has_caret {
        wrapped
    } else {
        Ast::Concat(Box::new(wildcard_star()), Box::new(wrapped))
    };
    let with_suffix = if has_dollar {
        with_prefix
    } else {
        Ast::Concat(Box::new(with_prefix), Box::new(wildcard_star()))
    };
    Ok(with_suffix)
}

fn wildcard_star() -> Ast {
    Ast::Star(Box::new(Ast::Class(ClassSpec::full())))
}
