//! Handles all user-facing output for the CLI.
//!
//! Trees and token listings are written to any [`WriteColor`], so the same
//! code serves the terminal and the tests.

use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use unicode_width::UnicodeWidthStr;

use crate::syntax::{CstNode, Token, TokenKind};

/// Colors only when stdout is a terminal.
pub fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice())
}

// ============================================================================
// TREES
// ============================================================================

/// Writes `node` as an indented tree, one node per line:
///
/// ```text
/// source 0..9
///   application 0..9
///     function: identifier "f" 1..2
/// ```
pub fn write_tree<W: WriteColor>(out: &mut W, node: &CstNode) -> io::Result<()> {
    write_node(out, node, None, 0)
}

fn write_node<W: WriteColor>(
    out: &mut W,
    node: &CstNode,
    field: Option<&str>,
    depth: usize,
) -> io::Result<()> {
    write!(out, "{:indent$}", "", indent = depth * 2)?;
    if let Some(field) = field {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "{field}: ")?;
    }
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "{}", node.kind())?;
    out.reset()?;
    if let Some(text) = node.text() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, " {text:?}")?;
        out.reset()?;
    }
    out.set_color(ColorSpec::new().set_dimmed(true))?;
    write!(out, " {}", node.span())?;
    out.reset()?;
    writeln!(out)?;

    for (index, child) in node.children().iter().enumerate() {
        let field = node.field_of_child(index).map(|field| field.name());
        write_node(out, child, field, depth + 1)?;
    }
    Ok(())
}

/// Renders a tree without color.
pub fn tree_to_string(node: &CstNode) -> String {
    let mut buffer = Buffer::no_color();
    // Writing to an in-memory buffer cannot fail.
    let _ = write_tree(&mut buffer, node);
    String::from_utf8_lossy(buffer.as_slice()).into_owned()
}

// ============================================================================
// TOKENS
// ============================================================================

/// Writes one token per line as `span  text  kind`, with columns padded to
/// their display width.
pub fn write_tokens<W: WriteColor>(out: &mut W, tokens: &[Token]) -> io::Result<()> {
    let spans: Vec<String> = tokens.iter().map(|token| token.span.to_string()).collect();
    let span_width = spans.iter().map(|span| span.width()).max().unwrap_or(0);
    let text_width = tokens.iter().map(|token| token.text.width()).max().unwrap_or(0);

    for (token, span) in tokens.iter().zip(&spans) {
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        write!(out, "{span}{:pad$}", "", pad = span_width - span.width() + 2)?;
        out.reset()?;
        let text = &token.text;
        write!(out, "{text}{:pad$}", "", pad = text_width - text.width() + 2)?;
        out.set_color(&token_color(token.kind))?;
        write!(out, "{}", token_kind_name(token.kind))?;
        out.reset()?;
        writeln!(out)?;
    }
    Ok(())
}

fn token_kind_name(kind: TokenKind) -> String {
    match kind {
        TokenKind::Variable => "variable".into(),
        TokenKind::TypeIdentifier => "type-identifier".into(),
        TokenKind::Atom => "atom".into(),
        TokenKind::Keyword(keyword) => format!("keyword:{keyword}"),
        TokenKind::LeftParen => "(".into(),
        TokenKind::RightParen => ")".into(),
        TokenKind::Comment => "comment".into(),
        TokenKind::Eof => "eof".into(),
    }
}

fn token_color(kind: TokenKind) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match kind {
        TokenKind::Keyword(_) => spec.set_fg(Some(Color::Magenta)).set_bold(true),
        TokenKind::TypeIdentifier => spec.set_fg(Some(Color::Yellow)),
        TokenKind::Atom => spec.set_fg(Some(Color::Green)),
        TokenKind::Comment => spec.set_dimmed(true),
        _ => &mut spec,
    };
    spec
}

// ============================================================================
// STATUS LINES
// ============================================================================

pub fn print_status<W: WriteColor>(stream: &mut W, ok: bool, message: &str) -> io::Result<()> {
    let (mark, color) = if ok {
        ("✓", Color::Green)
    } else {
        ("✗", Color::Red)
    };
    stream.set_color(ColorSpec::new().set_fg(Some(color)))?;
    write!(stream, "{mark}")?;
    stream.reset()?;
    writeln!(stream, " {message}")
}
