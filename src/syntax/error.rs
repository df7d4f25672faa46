//! Lexing and parsing failures.
//!
//! Both kinds are terminal for a parse call: nothing is recovered and no
//! partial tree is returned. Every error carries the span it refers to so
//! miette can render the offending source.

use std::fmt;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use super::cst::NodeKind;
use super::Span;

// ============================================================================
// CONTEXT
// ============================================================================

/// The production that was being attempted when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Production {
    Source,
    Claim,
    Define,
    Lambda,
    LambdaArguments,
    Application,
    FunctionType,
    Expression,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Production::Source => "top-level form",
            Production::Claim => "`claim'",
            Production::Define => "`define'",
            Production::Lambda => "`lambda'",
            Production::LambdaArguments => "`lambda' argument list",
            Production::Application => "application",
            Production::FunctionType => "function type",
            Production::Expression => "expression",
        };
        f.write_str(name)
    }
}

/// Something the parser would have accepted at the failing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Expected {
    Expression,
    Identifier,
    LeftParen,
    RightParen,
    TopLevelForm,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Expected::Expression => "expression",
            Expected::Identifier => "identifier",
            Expected::LeftParen => "(",
            Expected::RightParen => ")",
            Expected::TopLevelForm => "claim, define or expression",
        };
        write!(f, "`{name}'")
    }
}

/// The set of alternatives legal at an error position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedSet(pub Vec<Expected>);

impl ExpectedSet {
    pub fn one(expected: Expected) -> Self {
        Self(vec![expected])
    }

    pub fn contains(&self, expected: Expected) -> bool {
        self.0.contains(&expected)
    }
}

impl fmt::Display for ExpectedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("nothing"),
            [single] => write!(f, "{single}"),
            many => {
                f.write_str("one of:")?;
                for (i, expected) in many.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{expected}")?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
pub enum LexError {
    #[error("Unrecognized character `{character}'")]
    #[diagnostic(
        code(pie::lex::unrecognized_character),
        help("identifiers start with a letter, a digit or a symbol; `\\' is only valid right after `('")
    )]
    UnrecognizedCharacter {
        character: char,
        #[label("cannot start a token")]
        span: Span,
    },

    #[error("Incomplete atom")]
    #[diagnostic(
        code(pie::lex::incomplete_atom),
        help("a quote must be immediately followed by a name, as in 'nil")
    )]
    IncompleteAtom {
        #[label("quote without a name")]
        span: Span,
    },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnrecognizedCharacter { span, .. } | LexError::IncompleteAtom { span } => {
                *span
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
pub enum ParseError {
    #[error("Unexpected {found} in {context}")]
    #[diagnostic(code(pie::parse::unexpected_token), help("expected {expected}"))]
    UnexpectedToken {
        found: String,
        expected: ExpectedSet,
        context: Production,
        #[label("here")]
        span: Span,
    },

    #[error("Missing `)' closing {context}")]
    #[diagnostic(
        code(pie::parse::missing_close_paren),
        help("input ended while {expected} was expected")
    )]
    MissingCloseParen {
        context: Production,
        expected: ExpectedSet,
        #[label("this form is never closed")]
        open: Span,
        #[label("input ends here")]
        span: Span,
    },

    #[error("Too many expressions in {context}")]
    #[diagnostic(
        code(pie::parse::extra_expression),
        help("claim, define and lambda take exactly one expression after their name or argument list")
    )]
    ExtraExpression {
        context: Production,
        #[label("unexpected extra expression")]
        span: Span,
    },

    #[error("{context} is missing its expression")]
    #[diagnostic(code(pie::parse::missing_expression))]
    MissingExpression {
        context: Production,
        #[label("expected an expression before this")]
        span: Span,
    },

    #[error("Lambda arguments must be identifiers, found {found}")]
    #[diagnostic(
        code(pie::parse::non_identifier_argument),
        help("argument names start with a lowercase letter, a digit or a symbol")
    )]
    NonIdentifierArgument {
        found: NodeKind,
        #[label("not an identifier")]
        span: Span,
    },

    #[error("Nesting deeper than {limit} forms")]
    #[diagnostic(
        code(pie::parse::depth_exceeded),
        help("raise the limit with --max-depth or `max_depth' in the configuration")
    )]
    DepthExceeded {
        limit: usize,
        #[label("too deeply nested")]
        span: Span,
    },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::MissingCloseParen { span, .. }
            | ParseError::ExtraExpression { span, .. }
            | ParseError::MissingExpression { span, .. }
            | ParseError::NonIdentifierArgument { span, .. }
            | ParseError::DepthExceeded { span, .. } => *span,
        }
    }

    pub fn context(&self) -> Production {
        match self {
            ParseError::UnexpectedToken { context, .. }
            | ParseError::MissingCloseParen { context, .. }
            | ParseError::ExtraExpression { context, .. }
            | ParseError::MissingExpression { context, .. } => *context,
            ParseError::NonIdentifierArgument { .. } => Production::LambdaArguments,
            ParseError::DepthExceeded { .. } => Production::Expression,
        }
    }
}

/// Either failure a parse call can end with.
#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(err) => err.span(),
            SyntaxError::Parse(err) => err.span(),
        }
    }

    /// True when the input ended inside an open form, i.e. more text could
    /// still make it parse.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, SyntaxError::Parse(ParseError::MissingCloseParen { .. }))
    }
}
