//! The abstract syntax tree produced by [`crate::parser`].

/// A parsed pattern.
///
/// `Ast` is a tagged tree; every variant of arity one or more owns its
/// children outright (no shared/cyclic structure, that only appears once a
/// pattern is lowered to an [`Nfa`](crate::nfa::Nfa)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// The empty pattern: matches only the zero-length string.
    Empty,
    /// Matches exactly the byte `b`.
    Literal(u8),
    /// Matches any byte except `0x0A`.
    Dot,
    /// A positive character class: matches any byte described by `spec`.
    Class(ClassSpec),
    /// A negated character class: matches any byte *not* described by `spec`.
    NegClass(ClassSpec),
    /// Zero or more repetitions of the child.
    Star(Box<Ast>),
    /// `left` followed by `right`.
    Concat(Box<Ast>, Box<Ast>),
    /// `left` or `right`.
    Alt(Box<Ast>, Box<Ast>),
    /// A parenthesized subexpression with a 1-based, lexically assigned
    /// group index. The index is carried for forward compatibility but
    /// ignored everywhere downstream of parsing.
    Group(usize, Box<Ast>),
}

impl Ast {
    /// True for the node the parser emits when a production matched zero
    /// atoms (an empty `ccat`, or the pattern `""`).
    pub(crate) fn is_empty_match(&self) -> bool {
        matches!(self, Ast::Empty)
    }
}

/// The data behind a character class: an explicit set of single bytes plus a
/// list of inclusive ranges. Matching is `byte ∈ singles ∨ ∃ range: lo ≤ byte ≤ hi`,
/// evaluated by [`ClassSpec::contains`]; there is no boxed predicate anywhere
/// in this crate (see the class-predicate note in the design docs).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassSpec {
    pub(crate) singles: Vec<u8>,
    pub(crate) ranges: Vec<(u8, u8)>,
}

impl ClassSpec {
    pub(crate) fn push_single(&mut self, b: u8) {
        self.singles.push(b);
    }

    pub(crate) fn push_range(&mut self, lo: u8, hi: u8) {
        self.ranges.push((lo, hi));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.singles.is_empty() && self.ranges.is_empty()
    }

    pub(crate) fn contains(&self, b: u8) -> bool {
        self.singles.contains(&b) || self.ranges.iter().any(|&(lo, hi)| lo <= b && b <= hi)
    }

    /// A class matching every byte value, used by the search façade to build
    /// the `(0x00..0xFF)*` wildcard prefix/suffix.
    pub(crate) fn full() -> Self {
        ClassSpec {
            singles: Vec::new(),
            ranges: vec![(0x00, 0xFF)],
        }
    }

    /// The class matched by `.`: any byte except newline.
    pub(crate) fn newline() -> Self {
        ClassSpec {
            singles: vec![0x0A],
            ranges: Vec::new(),
        }
    }
}
