//! Pie Parser - recursive descent over grammar-directed tokens
//!
//! Each production is uniquely prefixed by its next token, so the parser never
//! backtracks. It asks the lexer for every token under an explicit
//! [`LexMode`]; only the token right after an opening parenthesis may be a
//! keyword. The parser fails fast: the first error in source order aborts the
//! whole call and no partial tree is returned.
//!
//! ```text
//! Source      := (Claim | Define | Expression)*
//! Claim       := "(" "claim" Identifier Expression ")"
//! Define      := "(" "define" Identifier Expression ")"
//! Lambda      := "(" LambdaHead "(" Identifier* ")" Expression ")"
//! Application := "(" Expression Expression* ")"
//! Expression  := Atom | Lambda | Application | TypeIdentifier | Identifier
//! ```
//!
//! With [`FunctionTypeMode::Production`] the arrow spellings also head
//! `FunctionType := "(" Arrow Expression Expression+ ")"`.

use std::mem;

use tracing::{debug, trace};

use super::cst::{CstNode, Field, NodeBuilder, NodeKind, SyntaxTree};
use super::error::{Expected, ExpectedSet, ParseError, Production, SyntaxError};
use super::lexer::{LexMode, Lexer};
use super::token::{Keyword, Token, TokenKind};
use super::Span;
use crate::config::{FunctionTypeMode, ParserConfig};

pub type Result<T> = std::result::Result<T, SyntaxError>;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses Pie source text with the default configuration.
pub fn parse(source: &str) -> Result<SyntaxTree> {
    parse_with_config(source, &ParserConfig::default())
}

pub fn parse_with_config(source: &str, config: &ParserConfig) -> Result<SyntaxTree> {
    debug!(bytes = source.len(), function_types = %config.function_types, "parsing");
    let tree = Parser::new(source, config).parse_source()?;
    debug!(
        forms = tree.forms().len(),
        tokens = tree.tokens().len(),
        "parsed"
    );
    Ok(tree)
}

// ============================================================================
// PARSER STATE
// ============================================================================

/// An open parenthesis the parser has not yet matched.
#[derive(Debug, Clone, Copy)]
struct Frame {
    production: Production,
    open: Span,
}

struct Parser<'src, 'cfg> {
    source: &'src str,
    lexer: Lexer<'src>,
    config: &'cfg ParserConfig,
    /// The lookahead token, lexed on first inspection.
    current: Option<Token>,
    /// Mode the lookahead is lexed under once it is needed.
    mode: LexMode,
    consumed: Vec<Token>,
    frames: Vec<Frame>,
}

impl<'src, 'cfg> Parser<'src, 'cfg> {
    fn new(source: &'src str, config: &'cfg ParserConfig) -> Self {
        let lexer = Lexer::new(source)
            .with_arrow_keywords(config.function_types == FunctionTypeMode::Production);
        Self {
            source,
            lexer,
            config,
            current: None,
            mode: LexMode::Plain,
            consumed: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// The lookahead token. A lex error surfaces here, where the grammar
    /// first needs the token, so errors come out in source order.
    fn current(&mut self) -> Result<&Token> {
        let token = self.take_current()?;
        Ok(self.current.insert(token))
    }

    fn take_current(&mut self) -> Result<Token> {
        match self.current.take() {
            Some(token) => Ok(token),
            None => Ok(self.lexer.next_token(self.mode)?),
        }
    }

    fn kind(&mut self) -> Result<TokenKind> {
        Ok(self.current()?.kind)
    }

    /// Consumes the current token. The following one is lexed under `next`
    /// when it is first inspected.
    fn bump(&mut self, next: LexMode) -> Result<Span> {
        let token = self.take_current()?;
        self.mode = next;
        let span = token.span;
        self.consumed.push(token);
        Ok(span)
    }

    fn bump_leaf(&mut self, kind: NodeKind) -> Result<CstNode> {
        let node = CstNode::leaf(kind, self.current()?);
        self.bump(LexMode::Plain)?;
        Ok(node)
    }

    fn at(&mut self, kind: TokenKind) -> Result<bool> {
        Ok(self.kind()? == kind)
    }

    fn at_expression_start(&mut self) -> Result<bool> {
        Ok(matches!(
            self.kind()?,
            TokenKind::Atom | TokenKind::Variable | TokenKind::TypeIdentifier | TokenKind::LeftParen
        ))
    }

    fn enter(&mut self, production: Production, open: Span) -> Result<()> {
        if self.frames.len() >= self.config.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: self.config.max_depth,
                span: open,
            }
            .into());
        }
        trace!(?production, offset = open.start, "enter");
        self.frames.push(Frame { production, open });
        Ok(())
    }

    fn leave(&mut self) {
        self.frames.pop();
    }

    /// Builds the error for a current token that no alternative accepts.
    /// Running out of input inside an open form is always reported as a
    /// missing close paren for the innermost form.
    fn unexpected(&mut self, expected: ExpectedSet, context: Production) -> SyntaxError {
        let (kind, span, found) = match self.current() {
            Ok(token) => (token.kind, token.span, format!("`{}'", token.text)),
            Err(error) => return error,
        };
        match (kind, self.frames.last()) {
            (TokenKind::Eof, Some(frame)) => ParseError::MissingCloseParen {
                context: frame.production,
                expected,
                open: frame.open,
                span,
            },
            (TokenKind::Eof, None) => ParseError::UnexpectedToken {
                found: "end of input".into(),
                expected,
                context,
                span,
            },
            _ => ParseError::UnexpectedToken {
                found,
                expected,
                context,
                span,
            },
        }
        .into()
    }

    // ========================================================================
    // PRODUCTIONS
    // ========================================================================

    fn parse_source(mut self) -> Result<SyntaxTree> {
        let mut source = CstNode::builder(NodeKind::Source);
        loop {
            let form = match self.kind()? {
                TokenKind::Eof => break,
                TokenKind::LeftParen => self.parse_form(true)?,
                _ if self.at_expression_start()? => self.parse_expression(Production::Source)?,
                _ => {
                    return Err(self.unexpected(
                        ExpectedSet::one(Expected::TopLevelForm),
                        Production::Source,
                    ))
                }
            };
            source.push_unnamed(form);
        }

        let root = source.finish(Span::new(0, self.source.len()));
        let mut eof = self.take_current()?;
        let trailing_trivia = mem::take(&mut eof.leading_trivia);
        Ok(SyntaxTree::new(root, self.consumed, trailing_trivia))
    }

    fn parse_expression(&mut self, context: Production) -> Result<CstNode> {
        match self.kind()? {
            TokenKind::Atom => self.bump_leaf(NodeKind::Atom),
            TokenKind::Variable => self.bump_leaf(NodeKind::Identifier),
            TokenKind::TypeIdentifier => self.bump_leaf(NodeKind::TypeIdentifier),
            TokenKind::LeftParen => self.parse_form(false),
            _ => Err(self.unexpected(ExpectedSet::one(Expected::Expression), context)),
        }
    }

    /// Dispatches on the token after `(`. Claim and define are only
    /// recognized for top-level forms.
    fn parse_form(&mut self, top_level: bool) -> Result<CstNode> {
        let open = self.current()?.span;
        let head_mode = if top_level {
            LexMode::TopLevelHead
        } else {
            LexMode::Head
        };
        self.bump(head_mode)?;

        let production = match self.kind()? {
            TokenKind::Keyword(Keyword::Claim) => Production::Claim,
            TokenKind::Keyword(Keyword::Define) => Production::Define,
            TokenKind::Keyword(Keyword::Lambda) => Production::Lambda,
            TokenKind::Keyword(Keyword::Arrow) => Production::FunctionType,
            _ => Production::Application,
        };
        self.enter(production, open)?;
        let node = match production {
            Production::Claim => self.parse_binding(open, NodeKind::Claim, Field::Type, production),
            Production::Define => {
                self.parse_binding(open, NodeKind::Define, Field::Body, production)
            }
            Production::Lambda => self.parse_lambda(open),
            Production::FunctionType => self.parse_function_type(open),
            _ => self.parse_application(open),
        }?;
        self.leave();
        Ok(node)
    }

    /// `claim` and `define`: an identifier followed by exactly one expression.
    fn parse_binding(
        &mut self,
        open: Span,
        kind: NodeKind,
        value_field: Field,
        production: Production,
    ) -> Result<CstNode> {
        self.bump(LexMode::Plain)?;
        let mut node = CstNode::builder(kind);

        if !self.at(TokenKind::Variable)? {
            return Err(self.unexpected(ExpectedSet::one(Expected::Identifier), production));
        }
        node.push(Field::Identifier, self.bump_leaf(NodeKind::Identifier)?);

        node.push(value_field, self.parse_required_expression(production)?);

        let close = self.expect_close(production)?;
        Ok(node.finish(open.join(close)))
    }

    fn parse_lambda(&mut self, open: Span) -> Result<CstNode> {
        self.bump(LexMode::Plain)?;
        let mut node = CstNode::builder(NodeKind::Lambda);

        if !self.at(TokenKind::LeftParen)? {
            return Err(self.unexpected(ExpectedSet::one(Expected::LeftParen), Production::Lambda));
        }
        let arguments_open = self.bump(LexMode::Plain)?;
        self.enter(Production::LambdaArguments, arguments_open)?;
        while !self.at(TokenKind::RightParen)? {
            if !self.at_expression_start()? {
                return Err(self.unexpected(
                    ExpectedSet(vec![Expected::Identifier, Expected::RightParen]),
                    Production::LambdaArguments,
                ));
            }
            let argument = self.parse_expression(Production::LambdaArguments)?;
            if argument.kind() != NodeKind::Identifier {
                return Err(ParseError::NonIdentifierArgument {
                    found: argument.kind(),
                    span: argument.span(),
                }
                .into());
            }
            node.push(Field::Arguments, argument);
        }
        self.bump(LexMode::Plain)?;
        self.leave();

        node.push(Field::Body, self.parse_required_expression(Production::Lambda)?);

        let close = self.expect_close(Production::Lambda)?;
        Ok(node.finish(open.join(close)))
    }

    fn parse_application(&mut self, open: Span) -> Result<CstNode> {
        let mut node = CstNode::builder(NodeKind::Application);
        node.push(Field::Function, self.parse_expression(Production::Application)?);
        self.parse_rest(&mut node, Field::Arguments, Production::Application)?;
        let close = self.bump(LexMode::Plain)?;
        Ok(node.finish(open.join(close)))
    }

    fn parse_function_type(&mut self, open: Span) -> Result<CstNode> {
        self.bump(LexMode::Plain)?;
        let mut node = CstNode::builder(NodeKind::FunctionType);
        node.push(
            Field::Domain,
            self.parse_required_expression(Production::FunctionType)?,
        );
        node.push(
            Field::Codomain,
            self.parse_required_expression(Production::FunctionType)?,
        );
        self.parse_rest(&mut node, Field::Codomain, Production::FunctionType)?;
        let close = self.bump(LexMode::Plain)?;
        Ok(node.finish(open.join(close)))
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    /// Parses expressions into `field` until the current token is `)`,
    /// leaving the `)` unconsumed.
    fn parse_rest(
        &mut self,
        node: &mut NodeBuilder,
        field: Field,
        production: Production,
    ) -> Result<()> {
        while !self.at(TokenKind::RightParen)? {
            if !self.at_expression_start()? {
                return Err(self.unexpected(
                    ExpectedSet(vec![Expected::Expression, Expected::RightParen]),
                    production,
                ));
            }
            node.push(field, self.parse_expression(production)?);
        }
        Ok(())
    }

    /// An expression that must be present; `)` in its place is reported as
    /// a missing expression rather than an unexpected token.
    fn parse_required_expression(&mut self, production: Production) -> Result<CstNode> {
        if self.at(TokenKind::RightParen)? {
            return Err(ParseError::MissingExpression {
                context: production,
                span: self.current()?.span,
            }
            .into());
        }
        self.parse_expression(production)
    }

    /// Closes a form that takes exactly one expression. Another expression
    /// in place of the `)` is an arity error.
    fn expect_close(&mut self, production: Production) -> Result<Span> {
        if self.at(TokenKind::RightParen)? {
            return self.bump(LexMode::Plain);
        }
        if self.at_expression_start()? {
            return Err(ParseError::ExtraExpression {
                context: production,
                span: self.current()?.span,
            }
            .into());
        }
        Err(self.unexpected(ExpectedSet::one(Expected::RightParen), production))
    }
}
