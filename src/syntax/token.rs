//! Classified lexemes and the trivia that sits between them.

use std::fmt;

use serde::Serialize;

use super::Span;

/// Head-position keywords. Their spellings are ordinary identifiers anywhere
/// the parser does not ask for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Claim,
    Define,
    /// `\`, `λ` or `lambda`
    Lambda,
    /// `->` or `→`
    Arrow,
}

impl Keyword {
    pub const fn spellings(self) -> &'static [&'static str] {
        match self {
            Keyword::Claim => &["claim"],
            Keyword::Define => &["define"],
            Keyword::Lambda => &["\\", "λ", "lambda"],
            Keyword::Arrow => &["->", "→"],
        }
    }

    pub fn from_spelling(text: &str) -> Option<Keyword> {
        [
            Keyword::Claim,
            Keyword::Define,
            Keyword::Lambda,
            Keyword::Arrow,
        ]
        .into_iter()
        .find(|keyword| keyword.spellings().contains(&text))
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keyword::Claim => write!(f, "claim"),
            Keyword::Define => write!(f, "define"),
            Keyword::Lambda => write!(f, "lambda"),
            Keyword::Arrow => write!(f, "->"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Starts with a lowercase letter, a symbol or a decimal digit.
    Variable,
    /// Starts with an uppercase letter.
    TypeIdentifier,
    /// `'` followed by one or more identifier-body characters.
    Atom,
    Keyword(Keyword),
    LeftParen,
    RightParen,
    /// Only surfaced by [`Lexer::tokenize_with_comments`](super::Lexer::tokenize_with_comments).
    Comment,
    Eof,
}

impl TokenKind {
    /// Human-readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Variable => "identifier".into(),
            TokenKind::TypeIdentifier => "type identifier".into(),
            TokenKind::Atom => "atom".into(),
            TokenKind::Keyword(keyword) => format!("keyword `{keyword}'"),
            TokenKind::LeftParen => "`('".into(),
            TokenKind::RightParen => "`)'".into(),
            TokenKind::Comment => "comment".into(),
            TokenKind::Eof => "end of input".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TriviaKind {
    Whitespace,
    Comment,
}

/// Source text that no grammar rule consumes but a round-trip must keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    /// Whitespace and comments between the previous token and this one.
    pub leading_trivia: Vec<Trivia>,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "{}", self.text),
        }
    }
}
