//! Lexical classifier for Pie source text.
//!
//! Characters are classified by Unicode general category:
//!
//! - variables start with `Ll`, a symbol (`Pc`, `Pd`, `Pf`, `Pi`, `S*`) or `Nd`
//! - type identifiers start with `Lu`
//! - both continue with any letter, `Nd` or symbol
//! - atoms are a quote followed by one or more continuation characters
//! - `;` starts a comment running to the end of the line
//!
//! Keywords are not a lexical class of their own. The parser requests each
//! token under a [`LexMode`] and only head positions turn a matching spelling
//! into a [`TokenKind::Keyword`].

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::LexError;
use super::token::{Keyword, Token, TokenKind, Trivia, TriviaKind};
use super::Span;

const SYMBOL: &str = r"\p{Pc}\p{Pd}\p{Pf}\p{Pi}\p{S}";

static VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[\p{{Ll}}{SYMBOL}\p{{Nd}}][\p{{L}}\p{{Nd}}{SYMBOL}]*"))
        .expect("variable pattern is a valid regex")
});

static TYPE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\p{{Lu}}[\p{{L}}\p{{Nd}}{SYMBOL}]*"))
        .expect("type identifier pattern is a valid regex")
});

static ATOM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^'[\p{{L}}\p{{Nd}}{SYMBOL}]+")).expect("atom pattern is a valid regex")
});

/// What the parser is prepared to accept at the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// No keywords; every identifier-shaped run is a variable or type identifier.
    Plain,
    /// Right after a nested `(`: lambda heads and, if enabled, arrows.
    Head,
    /// Right after a top-level `(`: additionally `claim` and `define`.
    TopLevelHead,
}

impl LexMode {
    fn allows(self, keyword: Keyword, arrow_keywords: bool) -> bool {
        match (self, keyword) {
            (LexMode::Plain, _) => false,
            (_, Keyword::Lambda) => true,
            (_, Keyword::Arrow) => arrow_keywords,
            (LexMode::TopLevelHead, Keyword::Claim | Keyword::Define) => true,
            (LexMode::Head, Keyword::Claim | Keyword::Define) => false,
        }
    }
}

/// Turns a cursor position into the next token, advancing past it.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    position: usize,
    arrow_keywords: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
            arrow_keywords: false,
        }
    }

    /// Treat `->` and `→` as keywords in head position.
    pub fn with_arrow_keywords(mut self, enabled: bool) -> Self {
        self.arrow_keywords = enabled;
        self
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn rest(&self) -> &'src str {
        &self.source[self.position..]
    }

    fn text(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Consumes whitespace and comments.
    fn skip_trivia(&mut self) -> Vec<Trivia> {
        let mut trivia = Vec::new();
        loop {
            let rest = self.rest();
            let (kind, len) = match rest.chars().next() {
                Some(c) if c.is_whitespace() => {
                    let len = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
                    (TriviaKind::Whitespace, len)
                }
                Some(';') => {
                    let len = rest.find(|c: char| c == '\n' || c == '\r').unwrap_or(rest.len());
                    (TriviaKind::Comment, len)
                }
                _ => return trivia,
            };
            let span = Span::new(self.position, self.position + len);
            self.position = span.end;
            trivia.push(Trivia {
                kind,
                text: self.text(span).to_string(),
                span,
            });
        }
    }

    /// Lexes the next token under `mode`. At end of input this returns an
    /// [`TokenKind::Eof`] token carrying the trailing trivia.
    pub fn next_token(&mut self, mode: LexMode) -> Result<Token, LexError> {
        let leading_trivia = self.skip_trivia();
        let start = self.position;
        let rest = self.rest();

        let Some(c) = rest.chars().next() else {
            return Ok(self.finish(TokenKind::Eof, start, leading_trivia));
        };

        let (kind, len) = match c {
            '(' => (TokenKind::LeftParen, 1),
            ')' => (TokenKind::RightParen, 1),
            '\'' => match ATOM.find(rest) {
                Some(m) => (TokenKind::Atom, m.end()),
                None => {
                    return Err(LexError::IncompleteAtom {
                        span: Span::new(start, start + 1),
                    })
                }
            },
            '\\' if mode.allows(Keyword::Lambda, self.arrow_keywords) => {
                (TokenKind::Keyword(Keyword::Lambda), 1)
            }
            _ => {
                if let Some(m) = VARIABLE.find(rest) {
                    let kind = Keyword::from_spelling(m.as_str())
                        .filter(|keyword| mode.allows(*keyword, self.arrow_keywords))
                        .map_or(TokenKind::Variable, TokenKind::Keyword);
                    (kind, m.end())
                } else if let Some(m) = TYPE_IDENTIFIER.find(rest) {
                    (TokenKind::TypeIdentifier, m.end())
                } else {
                    return Err(LexError::UnrecognizedCharacter {
                        character: c,
                        span: Span::new(start, start + c.len_utf8()),
                    });
                }
            }
        };

        self.position += len;
        Ok(self.finish(kind, start, leading_trivia))
    }

    fn finish(&self, kind: TokenKind, start: usize, leading_trivia: Vec<Trivia>) -> Token {
        let span = Span::new(start, self.position);
        Token {
            kind,
            text: self.text(span).to_string(),
            span,
            leading_trivia,
        }
    }

    /// Lexes the whole input, choosing the mode for each token the way the
    /// parser would for a well-formed program. The last token is always
    /// [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        let mut mode = LexMode::Plain;
        let mut after_lambda = false;
        loop {
            let token = self.next_token(mode)?;
            mode = match token.kind {
                TokenKind::LeftParen if after_lambda => LexMode::Plain,
                TokenKind::LeftParen if depth == 0 => LexMode::TopLevelHead,
                TokenKind::LeftParen => LexMode::Head,
                _ => LexMode::Plain,
            };
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            after_lambda = token.kind == TokenKind::Keyword(Keyword::Lambda);
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Like [`tokenize`](Self::tokenize), but comments become
    /// [`TokenKind::Comment`] tokens and the end-of-input token is dropped.
    pub fn tokenize_with_comments(self) -> Result<Vec<Token>, LexError> {
        let mut listing = Vec::new();
        for mut token in self.tokenize()? {
            for trivia in std::mem::take(&mut token.leading_trivia) {
                if trivia.kind == TriviaKind::Comment {
                    listing.push(Token {
                        kind: TokenKind::Comment,
                        text: trivia.text,
                        span: trivia.span,
                        leading_trivia: Vec::new(),
                    });
                }
            }
            if !token.is_eof() {
                listing.push(token);
            }
        }
        Ok(listing)
    }
}
