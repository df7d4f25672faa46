//! Concrete syntax tree for Pie programs.
//!
//! A [`SyntaxTree`] exclusively owns its root [`CstNode`] plus every token and
//! piece of trivia it was built from, so the original text can be rebuilt
//! byte for byte. Trees are immutable once built; re-parsing makes a new one.
//!
//! Named fields are a view over `children`: each field entry is an index into
//! the child list, never a second owner.

use std::fmt::{self, Write as _};

use serde::Serialize;

use super::token::{Token, Trivia, TriviaKind};
use super::Span;

// ============================================================================
// KINDS AND FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Source,
    Claim,
    Define,
    Lambda,
    Application,
    FunctionType,
    Atom,
    Identifier,
    TypeIdentifier,
}

impl NodeKind {
    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Source => "source",
            NodeKind::Claim => "claim",
            NodeKind::Define => "define",
            NodeKind::Lambda => "lambda",
            NodeKind::Application => "application",
            NodeKind::FunctionType => "function_type",
            NodeKind::Atom => "atom",
            NodeKind::Identifier => "identifier",
            NodeKind::TypeIdentifier => "type_identifier",
        }
    }

    /// Whether nodes of this kind can appear in expression position.
    pub const fn is_expression(self) -> bool {
        !matches!(self, NodeKind::Source | NodeKind::Claim | NodeKind::Define)
    }

    pub const fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::Atom | NodeKind::Identifier | NodeKind::TypeIdentifier
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Identifier,
    Type,
    Body,
    Arguments,
    Function,
    Domain,
    Codomain,
}

impl Field {
    pub const fn name(self) -> &'static str {
        match self {
            Field::Identifier => "identifier",
            Field::Type => "type",
            Field::Body => "body",
            Field::Arguments => "arguments",
            Field::Function => "function",
            Field::Domain => "domain",
            Field::Codomain => "codomain",
        }
    }
}

// ============================================================================
// NODES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CstNode {
    kind: NodeKind,
    span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<CstNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<(Field, usize)>,
}

impl CstNode {
    pub(crate) fn leaf(kind: NodeKind, token: &Token) -> Self {
        Self {
            kind,
            span: token.span,
            text: Some(token.text.clone()),
            children: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub(crate) fn builder(kind: NodeKind) -> NodeBuilder {
        NodeBuilder {
            kind,
            children: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Source text of a leaf; `None` for interior nodes.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[CstNode] {
        &self.children
    }

    /// First child stored under `field`.
    pub fn field(&self, field: Field) -> Option<&CstNode> {
        self.fields_of(field).next()
    }

    /// All children stored under `field`, in source order.
    pub fn fields_of(&self, field: Field) -> impl Iterator<Item = &CstNode> + '_ {
        self.fields
            .iter()
            .filter(move |(name, _)| *name == field)
            .filter_map(|(_, index)| self.children.get(*index))
    }

    /// The field the child at `index` is stored under, if any.
    pub fn field_of_child(&self, index: usize) -> Option<Field> {
        self.fields
            .iter()
            .find(|(_, i)| *i == index)
            .map(|(field, _)| *field)
    }

    /// Name of an atom without its leading quote.
    pub fn atom_name(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Atom => self.text().and_then(|text| text.strip_prefix('\'')),
            _ => None,
        }
    }

    /// Pre-order traversal starting with `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Tree-sitter style S-expression with field labels and leaf text.
    ///
    /// ```rust
    /// let tree = pie::parse("(f 'a)").unwrap();
    /// assert_eq!(
    ///     tree.root().to_sexp(),
    ///     r#"(source (application function: (identifier "f") arguments: (atom "'a")))"#
    /// );
    /// ```
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(self.kind.name());
        if let Some(text) = &self.text {
            let _ = write!(out, " {text:?}");
        }
        for (index, child) in self.children.iter().enumerate() {
            out.push(' ');
            if let Some(field) = self.field_of_child(index) {
                out.push_str(field.name());
                out.push_str(": ");
            }
            child.write_sexp(out);
        }
        out.push(')');
    }
}

pub(crate) struct NodeBuilder {
    kind: NodeKind,
    children: Vec<CstNode>,
    fields: Vec<(Field, usize)>,
}

impl NodeBuilder {
    pub(crate) fn push(&mut self, field: Field, child: CstNode) {
        self.fields.push((field, self.children.len()));
        self.children.push(child);
    }

    pub(crate) fn push_unnamed(&mut self, child: CstNode) {
        self.children.push(child);
    }

    pub(crate) fn finish(self, span: Span) -> CstNode {
        CstNode {
            kind: self.kind,
            span,
            text: None,
            children: self.children,
            fields: self.fields,
        }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a CstNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a CstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

// ============================================================================
// TYPED VIEWS
// ============================================================================

/// `(claim identifier type)`
#[derive(Debug, Clone, Copy)]
pub struct Claim<'a> {
    pub node: &'a CstNode,
    pub identifier: &'a CstNode,
    pub ty: &'a CstNode,
}

impl<'a> Claim<'a> {
    pub fn cast(node: &'a CstNode) -> Option<Self> {
        if node.kind != NodeKind::Claim {
            return None;
        }
        Some(Self {
            node,
            identifier: node.field(Field::Identifier)?,
            ty: node.field(Field::Type)?,
        })
    }

    pub fn name(&self) -> &'a str {
        self.identifier.text().unwrap_or_default()
    }
}

/// `(define identifier body)`
#[derive(Debug, Clone, Copy)]
pub struct Define<'a> {
    pub node: &'a CstNode,
    pub identifier: &'a CstNode,
    pub body: &'a CstNode,
}

impl<'a> Define<'a> {
    pub fn cast(node: &'a CstNode) -> Option<Self> {
        if node.kind != NodeKind::Define {
            return None;
        }
        Some(Self {
            node,
            identifier: node.field(Field::Identifier)?,
            body: node.field(Field::Body)?,
        })
    }

    pub fn name(&self) -> &'a str {
        self.identifier.text().unwrap_or_default()
    }
}

/// `(lambda (argument ...) body)`
#[derive(Debug, Clone)]
pub struct Lambda<'a> {
    pub node: &'a CstNode,
    pub arguments: Vec<&'a CstNode>,
    pub body: &'a CstNode,
}

impl<'a> Lambda<'a> {
    pub fn cast(node: &'a CstNode) -> Option<Self> {
        if node.kind != NodeKind::Lambda {
            return None;
        }
        Some(Self {
            node,
            arguments: node.fields_of(Field::Arguments).collect(),
            body: node.field(Field::Body)?,
        })
    }

    pub fn argument_names(&self) -> Vec<&'a str> {
        self.arguments
            .iter()
            .filter_map(|argument| argument.text())
            .collect()
    }
}

/// `(function argument ...)`
#[derive(Debug, Clone)]
pub struct Application<'a> {
    pub node: &'a CstNode,
    pub function: &'a CstNode,
    pub arguments: Vec<&'a CstNode>,
}

impl<'a> Application<'a> {
    pub fn cast(node: &'a CstNode) -> Option<Self> {
        if node.kind != NodeKind::Application {
            return None;
        }
        Some(Self {
            node,
            function: node.field(Field::Function)?,
            arguments: node.fields_of(Field::Arguments).collect(),
        })
    }
}

/// `(-> domain codomain ...)`, only built when function types are a production.
#[derive(Debug, Clone)]
pub struct FunctionType<'a> {
    pub node: &'a CstNode,
    pub domain: &'a CstNode,
    pub codomain: Vec<&'a CstNode>,
}

impl<'a> FunctionType<'a> {
    pub fn cast(node: &'a CstNode) -> Option<Self> {
        if node.kind != NodeKind::FunctionType {
            return None;
        }
        Some(Self {
            node,
            domain: node.field(Field::Domain)?,
            codomain: node.fields_of(Field::Codomain).collect(),
        })
    }
}

// ============================================================================
// TREE
// ============================================================================

/// The result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxTree {
    root: CstNode,
    tokens: Vec<Token>,
    trailing_trivia: Vec<Trivia>,
}

impl SyntaxTree {
    pub(crate) fn new(root: CstNode, tokens: Vec<Token>, trailing_trivia: Vec<Trivia>) -> Self {
        Self {
            root,
            tokens,
            trailing_trivia,
        }
    }

    /// The `Source` node.
    pub fn root(&self) -> &CstNode {
        &self.root
    }

    /// Top-level claims, definitions and expressions.
    pub fn forms(&self) -> &[CstNode] {
        self.root.children()
    }

    /// Every grammar token in source order, each with its leading trivia.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Trivia after the last token.
    pub fn trailing_trivia(&self) -> &[Trivia] {
        &self.trailing_trivia
    }

    pub fn comments(&self) -> impl Iterator<Item = &Trivia> + '_ {
        self.tokens
            .iter()
            .flat_map(|token| token.leading_trivia.iter())
            .chain(self.trailing_trivia.iter())
            .filter(|trivia| trivia.kind == TriviaKind::Comment)
    }

    /// Concatenates all tokens and trivia in document order. For any tree
    /// produced by [`parse`](super::parse) this equals the parsed input.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            for trivia in &token.leading_trivia {
                out.push_str(&trivia.text);
            }
            out.push_str(&token.text);
        }
        for trivia in &self.trailing_trivia {
            out.push_str(&trivia.text);
        }
        out
    }
}
