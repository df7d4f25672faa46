//! Syntax front end for Pie, a small dependently-typed teaching language.
//!
//! [`parse`] turns UTF-8 source text into a lossless concrete syntax tree:
//!
//! ```
//! let tree = pie::parse("(claim one Nat) (define one (add1 zero))").unwrap();
//! assert_eq!(tree.forms().len(), 2);
//! assert_eq!(tree.to_source(), "(claim one Nat) (define one (add1 zero))");
//! ```

pub use crate::config::{FunctionTypeMode, ParserConfig};
pub use crate::errors::{print_error, PieError, SourceContext};
pub use crate::syntax::{parse, parse_with_config, Span, SyntaxError, SyntaxTree};

pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod repl;
pub mod syntax;
