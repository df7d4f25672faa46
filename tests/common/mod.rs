//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use pie::syntax::{CstNode, Field, NodeKind, ParseError, SyntaxError};
use pie::SyntaxTree;

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Every fixture as `(file name, contents)`, sorted by name.
pub fn fixtures() -> Vec<(String, String)> {
    let mut fixtures: Vec<_> = fs::read_dir(fixtures_dir())
        .expect("fixtures directory exists")
        .map(|entry| entry.expect("readable entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "pie"))
        .map(|path| {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            let text = fs::read_to_string(&path).expect("readable fixture");
            (name, text)
        })
        .collect();
    fixtures.sort();
    fixtures
}

pub fn parse_ok(source: &str) -> SyntaxTree {
    match pie::parse(source) {
        Ok(tree) => tree,
        Err(err) => panic!("failed to parse {source:?}: {err}"),
    }
}

pub fn parse_err(source: &str) -> ParseError {
    match pie::parse(source) {
        Err(SyntaxError::Parse(err)) => err,
        other => panic!("expected a parse error for {source:?}, got {other:?}"),
    }
}

/// The single top-level form of `source`.
pub fn only_form(source: &str) -> CstNode {
    let tree = parse_ok(source);
    assert_eq!(tree.forms().len(), 1, "expected one form in {source:?}");
    tree.forms()[0].clone()
}

pub fn field_text(node: &CstNode, field: Field) -> Option<String> {
    node.field(field).and_then(|child| child.text().map(str::to_string))
}

pub fn kinds_of(node: &CstNode, field: Field) -> Vec<NodeKind> {
    node.fields_of(field).map(CstNode::kind).collect()
}
