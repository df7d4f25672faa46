//! Syntax module for the Pie language
//!
//! Raw text flows one way through this module: the lexer classifies characters
//! into tokens, the parser assembles those tokens into a concrete syntax tree.
//! Everything produced here carries byte spans into the original source.

use std::ops::Range;

use serde::Serialize;

pub mod cst;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use cst::{CstNode, Field, NodeKind, SyntaxTree};
pub use error::{LexError, ParseError, SyntaxError};
pub use lexer::{LexMode, Lexer};
pub use parser::{parse, parse_with_config};
pub use token::{Keyword, Token, TokenKind, Trivia, TriviaKind};

/// Represents a half-open byte range `[start, end)` in the source code.
///
/// # Examples
///
/// ```rust
/// use pie::syntax::Span;
/// let span = Span::new(1, 6);
/// assert_eq!(span.len(), 5);
/// assert_eq!(span.join(Span::new(8, 9)), Span::new(1, 9));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span sitting at `offset`, used for end-of-input positions.
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the text this span covers, if it lies on char boundaries of `source`.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.as_range())
    }

    /// 1-based `(line, column)` of the span start, counting columns in chars.
    pub fn line_col(&self, source: &str) -> Option<(usize, usize)> {
        let prefix = source.get(..self.start)?;
        let line = prefix.matches('\n').count() + 1;
        let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
        let column = prefix[line_start..].chars().count() + 1;
        Some((line, column))
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::from(span.start..span.end)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
