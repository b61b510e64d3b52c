//! Errors produced while parsing a pattern.

use std::fmt;

/// A byte rendered for display: printable ASCII as a character, everything
/// else as `0xHH`.
struct ByteLit(u8);

impl fmt::Display for ByteLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_ascii_graphic() || self.0 == b' ' {
            write!(f, "'{}'", self.0 as char)
        } else {
            write!(f, "0x{:02X}", self.0)
        }
    }
}

/// Everything that can go wrong while turning a pattern into an AST.
///
/// Every variant carries the byte offset into the pattern at which the
/// problem was detected. Matching itself never fails, only compilation can.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("unclosed '(' starting at byte {pos}")]
    UnclosedParen { pos: usize },

    #[error("unbalanced ')' at byte {pos}")]
    UnbalancedParen { pos: usize },

    #[error("unclosed '[' starting at byte {pos}")]
    UnclosedClass { pos: usize },

    #[error("empty character class at byte {pos}")]
    EmptyClass { pos: usize },

    #[error("reversed range {} - {} in character class at byte {pos}", ByteLit(*lo), ByteLit(*hi))]
    ReversedRange { pos: usize, lo: u8, hi: u8 },

    #[error("trailing escape '/' at byte {pos} has no following byte")]
    TrailingEscape { pos: usize },

    #[error("'|' at byte {pos} is missing an operand")]
    AlternationMissingOperand { pos: usize },

    #[error("unexpected {} at byte {pos}", ByteLit(*byte))]
    UnexpectedByte { pos: usize, byte: u8 },
}

impl ParseError {
    pub(crate) fn unexpected(pos: usize, byte: u8) -> Self {
        match byte {
            b')' => ParseError::UnbalancedParen { pos },
            b']' => ParseError::UnclosedClass { pos },
            _ => ParseError::UnexpectedByte { pos, byte },
        }
    }
}
