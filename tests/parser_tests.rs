// tests/parser_tests.rs

mod common;

use common::{field_text, fixtures, kinds_of, only_form, parse_ok};
use pie::syntax::cst::{Application, Claim, Define, FunctionType, Lambda};
use pie::syntax::{Field, NodeKind};
use pie::{parse_with_config, FunctionTypeMode, ParserConfig, Span};
use pretty_assertions::assert_eq;

// ---
// Worked examples
// ---

#[test]
fn test_claim_with_arrow_type() {
    let form = only_form("(claim id (-> Nat Nat))");
    let claim = Claim::cast(&form).expect("a claim");
    assert_eq!(claim.name(), "id");

    let ty = Application::cast(claim.ty).expect("arrow types are applications by default");
    assert_eq!(ty.function.kind(), NodeKind::Identifier);
    assert_eq!(ty.function.text(), Some("->"));
    let arguments: Vec<_> = ty.arguments.iter().map(|a| (a.kind(), a.text())).collect();
    assert_eq!(
        arguments,
        vec![
            (NodeKind::TypeIdentifier, Some("Nat")),
            (NodeKind::TypeIdentifier, Some("Nat")),
        ]
    );
}

#[test]
fn test_define_with_lambda_body() {
    let form = only_form("(define add1 (lambda (n) (add1 n)))");
    let define = Define::cast(&form).expect("a define");
    assert_eq!(define.name(), "add1");

    let lambda = Lambda::cast(define.body).expect("a lambda body");
    assert_eq!(lambda.argument_names(), vec!["n"]);
    assert_eq!(lambda.body.kind(), NodeKind::Application);
}

#[test]
fn test_bare_atom_covers_whole_input() {
    let form = only_form("'atom");
    assert_eq!(form.kind(), NodeKind::Atom);
    assert_eq!(form.span(), Span::new(0, 5));
    assert_eq!(form.atom_name(), Some("atom"));
}

#[test]
fn test_comment_only_source() {
    let source = "; comment only";
    let tree = parse_ok(source);
    assert!(tree.forms().is_empty());
    assert_eq!(tree.comments().count(), 1);
    assert_eq!(tree.to_source(), source);
}

// ---
// Keyword positions
// ---

#[test]
fn test_keyword_spellings_as_arguments() {
    let form = only_form("(f claim define lambda λ)");
    assert_eq!(form.kind(), NodeKind::Application);
    assert_eq!(
        kinds_of(&form, Field::Arguments),
        vec![NodeKind::Identifier; 4]
    );
}

#[test]
fn test_define_inside_expression_is_application() {
    let form = only_form("(the Nat (define x y))");
    let inner = form.fields_of(Field::Arguments).nth(1).unwrap();
    assert_eq!(inner.kind(), NodeKind::Application);
    assert_eq!(field_text(inner, Field::Function).as_deref(), Some("define"));
}

#[test]
fn test_lambda_is_keyword_at_any_depth() {
    let form = only_form("(f (g (λ (x) x)))");
    let lambdas = form
        .descendants()
        .filter(|node| node.kind() == NodeKind::Lambda)
        .count();
    assert_eq!(lambdas, 1);
}

#[test]
fn test_keyword_prefix_is_an_identifier() {
    let form = only_form("(claims x)");
    assert_eq!(form.kind(), NodeKind::Application);
    assert_eq!(field_text(&form, Field::Function).as_deref(), Some("claims"));
}

// ---
// Identifiers
// ---

#[test]
fn test_symbolic_and_numeric_identifiers() {
    let form = only_form("(+ 1 2)");
    assert_eq!(field_text(&form, Field::Function).as_deref(), Some("+"));
    assert_eq!(
        kinds_of(&form, Field::Arguments),
        vec![NodeKind::Identifier, NodeKind::Identifier]
    );
}

#[test]
fn test_type_identifier_with_symbols() {
    let form = only_form("(claim p Pair-Nat→U)");
    let claim = Claim::cast(&form).unwrap();
    assert_eq!(claim.ty.kind(), NodeKind::TypeIdentifier);
    assert_eq!(claim.ty.text(), Some("Pair-Nat→U"));
}

// ---
// Spans and fields
// ---

#[test]
fn test_spans_are_byte_offsets() {
    let source = "(λ (x) 'é)";
    let form = only_form(source);
    assert_eq!(form.span(), Span::new(0, source.len()));
    let body = form.field(Field::Body).unwrap();
    assert_eq!(body.span().slice(source), Some("'é"));
}

#[test]
fn test_fields_index_children() {
    let form = only_form("(f a b c)");
    assert_eq!(form.children().len(), 4);
    assert_eq!(form.field_of_child(0), Some(Field::Function));
    for index in 1..4 {
        assert_eq!(form.field_of_child(index), Some(Field::Arguments));
    }
}

#[test]
fn test_multiple_top_level_forms() {
    let tree = parse_ok("(claim one Nat)\n(define one (add1 zero))\n'tick\n");
    let kinds: Vec<_> = tree.forms().iter().map(|form| form.kind()).collect();
    assert_eq!(kinds, vec![NodeKind::Claim, NodeKind::Define, NodeKind::Atom]);
}

// ---
// Function types
// ---

#[test]
fn test_function_type_production() {
    let config = ParserConfig::default().with_function_types(FunctionTypeMode::Production);
    let tree = parse_with_config("(claim twin (-> Atom (Pair Atom Atom)))", &config).unwrap();
    let claim = Claim::cast(&tree.forms()[0]).unwrap();
    let arrow = FunctionType::cast(claim.ty).expect("a function type");
    assert_eq!(arrow.domain.text(), Some("Atom"));
    assert_eq!(arrow.codomain.len(), 1);
    assert_eq!(arrow.codomain[0].kind(), NodeKind::Application);
}

#[test]
fn test_arrow_away_from_head_stays_identifier() {
    let config = ParserConfig::default().with_function_types(FunctionTypeMode::Production);
    let tree = parse_with_config("(f ->)", &config).unwrap();
    let form = &tree.forms()[0];
    assert_eq!(form.kind(), NodeKind::Application);
    assert_eq!(
        form.field(Field::Arguments).map(|arg| arg.kind()),
        Some(NodeKind::Identifier)
    );
}

// ---
// Fixtures
// ---

#[test]
fn test_fixtures_parse_and_round_trip() {
    for (name, text) in fixtures() {
        let tree = parse_ok(&text);
        assert!(!tree.forms().is_empty(), "{name} has no forms");
        assert_eq!(tree.to_source(), text, "{name} does not round-trip");
    }
}

#[test]
fn test_fixtures_parse_under_both_arrow_modes() {
    let production = ParserConfig::default().with_function_types(FunctionTypeMode::Production);
    for (name, text) in fixtures() {
        let tree = parse_with_config(&text, &production)
            .unwrap_or_else(|e| panic!("{name} failed with function types enabled: {e}"));
        assert_eq!(tree.to_source(), text);
    }
}

#[test]
fn test_lambda_fixture_shapes() {
    let (_, text) = fixtures()
        .into_iter()
        .find(|(name, _)| name == "lambdas.pie")
        .unwrap();
    let tree = parse_ok(&text);
    let arities: Vec<_> = tree
        .root()
        .descendants()
        .filter_map(Lambda::cast)
        .map(|lambda| lambda.arguments.len())
        .collect();
    assert_eq!(arities, vec![1, 1, 1, 2, 0]);
}
