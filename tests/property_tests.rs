//! Property-based tests for the lexer and parser.
//!
//! 1. **Round-trip**: tokens and trivia rebuild the input byte for byte
//! 2. **Determinism**: the same text always yields the same tree
//! 3. **Kind exclusivity**: the first character alone decides variable vs type identifier
//! 4. **Never panics**: arbitrary text lexes and parses to a tree or an error
//! 5. **Lambda arguments** are always identifiers
//! 6. **Fail fast**: an unbalanced paren never yields a tree

use once_cell::sync::Lazy;
use proptest::prelude::*;
use regex::Regex;

use pie::syntax::cst::Lambda;
use pie::syntax::{Lexer, NodeKind, TokenKind};
use pie::{parse, parse_with_config, FunctionTypeMode, ParserConfig};

static UPPERCASE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Lu}").unwrap());

// ============================================================================
// Generators
// ============================================================================

const VARIABLES: &[&str] = &[
    "x", "n", "add1", "zero", "iter-Nat", "+", "1", "n-1", "«q»", "→", "->", "é", "cons",
];
const TYPES: &[&str] = &["Nat", "Atom", "U", "Pair", "Pair-Nat→U", "Éclair"];
const ATOMS: &[&str] = &["'a", "'celery", "'Atom", "'x1", "'«q»"];
const LAMBDA_HEADS: &[&str] = &["\\", "λ", "lambda"];
const SEPARATORS: &[&str] = &[" ", "  ", "\n", "\t", " ; note\n", "\u{c}"];

fn pick(options: &'static [&'static str]) -> impl Strategy<Value = String> + Clone {
    prop::sample::select(options).prop_map(str::to_string)
}

fn separator() -> impl Strategy<Value = String> + Clone {
    pick(SEPARATORS)
}

fn leaf() -> impl Strategy<Value = String> + Clone {
    prop_oneof![pick(VARIABLES), pick(TYPES), pick(ATOMS)]
}

fn expression() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), prop::collection::vec((separator(), inner.clone()), 0..4)).prop_map(
                |(function, arguments)| {
                    let rest: String = arguments.into_iter().map(|(s, a)| s + &a).collect();
                    format!("({function}{rest})")
                }
            ),
            (
                pick(LAMBDA_HEADS),
                prop::collection::vec(pick(VARIABLES), 0..3),
                separator(),
                inner,
            )
                .prop_map(|(head, arguments, sep, body)| {
                    format!("({head} ({}){sep}{body})", arguments.join(" "))
                }),
        ]
    })
}

fn top_level_form() -> impl Strategy<Value = String> {
    prop_oneof![
        (pick(&["claim", "define"]), pick(VARIABLES), expression())
            .prop_map(|(head, name, value)| format!("({head} {name} {value})")),
        expression(),
    ]
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec((separator(), top_level_form()), 0..5).prop_map(|forms| {
        forms.into_iter().map(|(sep, form)| sep + &form).collect()
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn generated_programs_round_trip(source in program()) {
        let tree = parse(&source).unwrap();
        prop_assert_eq!(tree.to_source(), source);
    }

    #[test]
    fn parsing_is_deterministic(source in program()) {
        prop_assert_eq!(parse(&source), parse(&source));
    }

    #[test]
    fn leaf_spans_slice_their_text(source in program()) {
        let tree = parse(&source).unwrap();
        for node in tree.root().descendants() {
            prop_assert!(node.span().end <= source.len());
            if let Some(text) = node.text() {
                prop_assert_eq!(node.span().slice(&source), Some(text));
            }
        }
    }

    #[test]
    fn lambda_arguments_are_identifiers(source in program()) {
        let tree = parse(&source).unwrap();
        for lambda in tree.root().descendants().filter_map(Lambda::cast) {
            prop_assert!(lambda.arguments.iter().all(|a| a.kind() == NodeKind::Identifier));
        }
    }

    #[test]
    fn open_paren_never_yields_a_tree(source in program(), sep in separator()) {
        let unbalanced = format!("{source}{sep}(");
        let err = parse(&unbalanced).unwrap_err();
        prop_assert!(err.is_incomplete());
    }

    #[test]
    fn identifier_kind_depends_on_first_character(text in "\\PC{1,12}") {
        if let Ok(tokens) = Lexer::new(&text).tokenize() {
            for token in tokens {
                match token.kind {
                    TokenKind::TypeIdentifier => prop_assert!(UPPERCASE_START.is_match(&token.text)),
                    TokenKind::Variable => prop_assert!(!UPPERCASE_START.is_match(&token.text)),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn context_does_not_change_identifier_kind(word in "[\\p{L}\\p{S}][\\p{L}\\p{N}]{0,8}") {
        let alone = Lexer::new(&word).tokenize();
        let nested = Lexer::new(&format!("(f {word})")).tokenize();
        if let (Ok(alone), Ok(nested)) = (alone, nested) {
            prop_assert_eq!(alone[0].kind, nested[2].kind);
        }
    }

    #[test]
    fn arbitrary_text_never_panics(text in "\\PC{0,64}") {
        let _ = Lexer::new(&text).tokenize_with_comments();
        let _ = parse(&text);
        let production = ParserConfig::default().with_function_types(FunctionTypeMode::Production);
        let _ = parse_with_config(&text, &production);
    }

    #[test]
    fn successful_parses_round_trip(text in "[a-zA-Z() ;'\\n\\\\λ→-]{0,48}") {
        if let Ok(tree) = parse(&text) {
            prop_assert_eq!(tree.to_source(), text);
        }
    }
}
