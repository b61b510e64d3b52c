//! Recursive-descent parser for the pattern grammar (spec §4.A):
//!
//! ```text
//! dsjn   := ccat ('|' ccat)*
//! ccat   := star*
//! star   := base '*'?
//! base   := '(' dsjn ')' | '[' class_body ']' | '/' <any byte> | '.' | <non-reserved byte>
//! class_body := '^'? element+
//! element := atom ('-' atom)?
//! atom    := '/' <any byte> | <non-reserved-within-class byte>
//! ```
//!
//! The reserved bytes are `. [ ] ( ) | * /`; everything else (including `^`
//! and `$`, which only matter to [`crate::pattern`]'s anchor stripping) is an
//! ordinary literal byte.
//!
//! This is a hand-written cursor-based parser rather than a combinator
//! pipeline: several productions need to distinguish "no atom here, stop
//! repeating" from "this is a hard syntax error" (a bare `*`, a stray `]`, an
//! empty alternation operand), and threading that distinction through a
//! combinator library's backtracking model is more trouble than it is worth
//! here. See `DESIGN.md` for the full rationale.

use crate::ast::{Ast, ClassSpec};
use crate::error::ParseError;

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    next_group: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a [u8]) -> Self {
        Cursor {
            input,
            pos: 0,
            next_group: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Reads a single "atom byte": `/x` yields literal `x`, anything else is
    /// itself. Used both for plain literals and for class elements.
    fn read_escaped_or_literal(&mut self) -> Result<u8, ParseError> {
        let start = self.pos;
        match self.bump() {
            None => Err(ParseError::TrailingEscape { pos: start }),
            Some(b'/') => self
                .bump()
                .ok_or(ParseError::TrailingEscape { pos: start }),
            Some(b) => Ok(b),
        }
    }

    fn parse_dsjn(&mut self) -> Result<Ast, ParseError> {
        let dsjn_start = self.pos;
        let first = self.parse_ccat()?;
        let mut branches = vec![first];
        let mut saw_pipe = false;
        while self.peek() == Some(b'|') {
            self.bump();
            saw_pipe = true;
            let next = self.parse_ccat()?;
            if next.is_empty_match() {
                return Err(ParseError::AlternationMissingOperand { pos: self.pos });
            }
            branches.push(next);
        }
        if saw_pipe && branches[0].is_empty_match() {
            return Err(ParseError::AlternationMissingOperand { pos: dsjn_start });
        }
        Ok(fold_alt(branches))
    }

    fn parse_ccat(&mut self) -> Result<Ast, ParseError> {
        let mut atoms = Vec::new();
        while let Some(atom) = self.parse_star()? {
            atoms.push(atom);
        }
        Ok(fold_concat(atoms))
    }

    fn parse_star(&mut self) -> Result<Option<Ast>, ParseError> {
        let base = match self.parse_base()? {
            Some(b) => b,
            None => return Ok(None),
        };
        if self.peek() == Some(b'*') {
            self.bump();
            Ok(Some(Ast::Star(Box::new(base))))
        } else {
            Ok(Some(base))
        }
    }

    /// Returns `Ok(None)` when the current position does not start a `base`
    /// production (end of input, or a reserved byte that terminates the
    /// enclosing repetition/alternation instead (`|`, `)`, `]`, a bare `*`).
    /// Any of those left unconsumed will surface as a leftover-input error
    /// once the caller at the appropriate level fails to find what it
    /// expected.
    fn parse_base(&mut self) -> Result<Option<Ast>, ParseError> {
        match self.peek() {
            None => Ok(None),
            Some(b'|') | Some(b')') | Some(b']') | Some(b'*') => Ok(None),
            Some(b'/') => {
                let start = self.pos;
                self.bump();
                let b = self
                    .bump()
                    .ok_or(ParseError::TrailingEscape { pos: start })?;
                Ok(Some(Ast::Literal(b)))
            }
            Some(b'.') => {
                self.bump();
                Ok(Some(Ast::Dot))
            }
            Some(b'(') => {
                self.bump();
                let idx = self.next_group;
                self.next_group += 1;
                let inner = self.parse_dsjn()?;
                match self.peek() {
                    Some(b')') => {
                        self.bump();
                        Ok(Some(Ast::Group(idx, Box::new(inner))))
                    }
                    _ => Err(ParseError::UnclosedParen {
                        pos: self.pos.min(self.input.len()),
                    }),
                }
            }
            Some(b'[') => {
                let open = self.pos;
                self.bump();
                let (negate, spec) = self.parse_class_body(open)?;
                match self.peek() {
                    Some(b']') => {
                        self.bump();
                        Ok(Some(if negate {
                            Ast::NegClass(spec)
                        } else {
                            Ast::Class(spec)
                        }))
                    }
                    _ => Err(ParseError::UnclosedClass { pos: open }),
                }
            }
            Some(b) => {
                self.bump();
                Ok(Some(Ast::Literal(b)))
            }
        }
    }

    fn parse_class_body(&mut self, open: usize) -> Result<(bool, ClassSpec), ParseError> {
        let negate = if self.peek() == Some(b'^') {
            self.bump();
            true
        } else {
            false
        };
        let mut spec = ClassSpec::default();
        loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedClass { pos: open }),
                Some(b']') => break,
                _ => self.parse_class_element(&mut spec)?,
            }
        }
        if spec.is_empty() {
            return Err(ParseError::EmptyClass { pos: open });
        }
        Ok((negate, spec))
    }

    fn parse_class_element(&mut self, spec: &mut ClassSpec) -> Result<(), ParseError> {
        let range_pos = self.pos;
        let lo = self.read_escaped_or_literal()?;
        // `-` only introduces a range when it is neither the first nor the
        // last element: i.e. it must be followed by another class atom, not
        // immediately by the closing `]`.
        let is_range = self.peek() == Some(b'-') && !matches!(self.peek_at(1), None | Some(b']'));
        if is_range {
            self.bump(); // consume '-'
            let hi = self.read_escaped_or_literal()?;
            if lo > hi {
                return Err(ParseError::ReversedRange {
                    pos: range_pos,
                    lo,
                    hi,
                });
            }
            spec.push_range(lo, hi);
        } else {
            spec.push_single(lo);
        }
        Ok(())
    }
}

fn fold_concat(mut atoms: Vec<Ast>) -> Ast {
    match atoms.len() {
        0 => Ast::Empty,
        1 => atoms.pop().unwrap(),
        _ => {
            let mut iter = atoms.into_iter().rev();
            let mut acc = iter.next().unwrap();
            for a in iter {
                acc = Ast::Concat(Box::new(a), Box::new(acc));
            }
            acc
        }
    }
}

fn fold_alt(mut branches: Vec<Ast>) -> Ast {
    match branches.len() {
        0 => unreachable!("parse_dsjn always pushes at least one branch"),
        1 => branches.pop().unwrap(),
        _ => {
            let mut iter = branches.into_iter().rev();
            let mut acc = iter.next().unwrap();
            for b in iter {
                acc = Ast::Alt(Box::new(b), Box::new(acc));
            }
            acc
        }
    }
}

/// Parses `pattern` into an AST. The whole input must be consumed: a
/// trailing unconsumed byte (a stray `)`, `]`, or `*`) is reported at its own
/// position.
pub fn parse(pattern: &[u8]) -> Result<Ast, ParseError> {
    parse_tracked(pattern).map(|(ast, _)| ast)
}

/// Like [`parse`], but also returns the next free capturing-group index,
/// used by [`crate::pattern`] to number the synthetic wrapping group it adds
/// for `search`.
pub(crate) fn parse_tracked(pattern: &[u8]) -> Result<(Ast, usize), ParseError> {
    let mut cur = Cursor::new(pattern);
    let ast = cur.parse_dsjn()?;
    if cur.pos != cur.input.len() {
        let byte = cur.input[cur.pos];
        return Err(ParseError::unexpected(cur.pos, byte));
    }
    Ok((ast, cur.next_group))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(b: u8) -> Ast {
        Ast::Literal(b)
    }

    #[test]
    fn empty_pattern_is_empty() {
        assert_eq!(parse(b"").unwrap(), Ast::Empty);
    }

    #[test]
    fn single_literal_has_no_wrapper() {
        assert_eq!(parse(b"a").unwrap(), lit(b'a'));
    }

    #[test]
    fn concatenation() {
        assert_eq!(
            parse(b"ab").unwrap(),
            Ast::Concat(Box::new(lit(b'a')), Box::new(lit(b'b')))
        );
    }

    #[test]
    fn alternation_and_group() {
        let ast = parse(b"a(b|c)*d").unwrap();
        match ast {
            Ast::Concat(_, _) => {}
            other => panic!("expected Concat at the top, got {other:?}"),
        }
    }

    #[test]
    fn star_binds_tighter_than_concat() {
        let ast = parse(b"ab*").unwrap();
        assert_eq!(
            ast,
            Ast::Concat(Box::new(lit(b'a')), Box::new(Ast::Star(Box::new(lit(b'b')))))
        );
    }

    #[test]
    fn escape_yields_literal_reserved_byte() {
        assert_eq!(parse(b"/(").unwrap(), lit(b'('));
    }

    #[test]
    fn dot_is_its_own_node() {
        assert_eq!(parse(b".").unwrap(), Ast::Dot);
    }

    #[test]
    fn class_with_range_and_singles() {
        let ast = parse(b"[a-z0-9_]").unwrap();
        match ast {
            Ast::Class(spec) => {
                assert!(spec.ranges.contains(&(b'a', b'z')));
                assert!(spec.ranges.contains(&(b'0', b'9')));
                assert!(spec.singles.contains(&b'_'));
            }
            other => panic!("expected Class, got {other:?}"),
        }
    }

    #[test]
    fn negated_class() {
        assert!(matches!(parse(b"[^0-9]").unwrap(), Ast::NegClass(_)));
    }

    #[test]
    fn leading_and_trailing_dash_are_literal() {
        let ast = parse(b"[-az-]").unwrap();
        match ast {
            Ast::Class(spec) => {
                assert!(spec.singles.contains(&b'-'));
                assert!(spec.singles.contains(&b'a'));
                assert!(spec.singles.contains(&b'z'));
                assert!(spec.ranges.is_empty());
            }
            other => panic!("expected Class, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_paren_is_an_error() {
        assert_eq!(parse(b"(ab"), Err(ParseError::UnclosedParen { pos: 3 }));
    }

    #[test]
    fn unbalanced_close_paren_is_an_error() {
        assert_eq!(parse(b"ab)"), Err(ParseError::UnbalancedParen { pos: 2 }));
    }

    #[test]
    fn unclosed_class_is_an_error() {
        assert_eq!(parse(b"[abc"), Err(ParseError::UnclosedClass { pos: 0 }));
    }

    #[test]
    fn empty_class_is_an_error() {
        assert_eq!(parse(b"[]"), Err(ParseError::EmptyClass { pos: 0 }));
    }

    #[test]
    fn reversed_range_is_an_error() {
        assert_eq!(
            parse(b"[z-a]"),
            Err(ParseError::ReversedRange {
                pos: 1,
                lo: b'z',
                hi: b'a'
            })
        );
    }

    #[test]
    fn trailing_escape_is_an_error() {
        assert_eq!(parse(b"ab/"), Err(ParseError::TrailingEscape { pos: 2 }));
    }

    #[test]
    fn leading_pipe_is_an_error() {
        assert_eq!(
            parse(b"|ab"),
            Err(ParseError::AlternationMissingOperand { pos: 0 })
        );
    }

    #[test]
    fn trailing_pipe_is_an_error() {
        assert_eq!(
            parse(b"ab|"),
            Err(ParseError::AlternationMissingOperand { pos: 3 })
        );
    }

    #[test]
    fn double_pipe_is_an_error() {
        assert!(matches!(
            parse(b"a||b"),
            Err(ParseError::AlternationMissingOperand { .. })
        ));
    }

    #[test]
    fn bare_star_is_an_error() {
        assert!(parse(b"*ab").is_err());
    }

    #[test]
    fn group_indices_assigned_lexically() {
        let ast = parse(b"(a)(b(c))").unwrap();
        let Ast::Concat(l, r) = ast else {
            panic!("expected Concat")
        };
        assert!(matches!(*l, Ast::Group(1, _)));
        let Ast::Group(2, inner) = *r else {
            panic!("expected Group(2, _)")
        };
        let Ast::Concat(b_lit, c_group) = *inner else {
            panic!("expected Concat inside group 2")
        };
        assert_eq!(*b_lit, lit(b'b'));
        assert!(matches!(*c_group, Ast::Group(3, _)));
    }
}
