//! Command-line arguments and subcommands for the `pie` binary.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{ConfigError, FunctionTypeMode, ParserConfig};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "pie",
    version,
    about = "Lexer and parser for the Pie language."
)]
pub struct PieArgs {
    #[command(flatten)]
    pub parser: ParserOptions,

    /// Increase log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Options that end up in the [`ParserConfig`].
#[derive(Debug, Default, Args)]
pub struct ParserOptions {
    /// YAML file with parser settings.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How arrow forms such as `(-> Nat Nat)` are parsed.
    #[arg(long, global = true, value_enum)]
    pub function_types: Option<FunctionTypeMode>,

    /// Maximum nesting of parenthesized forms.
    #[arg(long, global = true)]
    pub max_depth: Option<NonZeroUsize>,
}

impl ParserOptions {
    /// Loads the configuration file, if any, and applies the flag overrides.
    pub fn resolve(&self) -> Result<ParserConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ParserConfig::from_yaml_file(path)?,
            None => ParserConfig::default(),
        };
        if let Some(mode) = self.function_types {
            config = config.with_function_types(mode);
        }
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth.get());
        }
        Ok(config)
    }
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the concrete syntax tree of a file.
    Parse {
        file: PathBuf,
        /// Print the tree as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the tokens and comments of a file with their spans.
    Tokens { file: PathBuf },
    /// Parse every `.pie` file under the given paths and report errors.
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Number of worker threads (defaults to the available parallelism).
        #[arg(short, long)]
        jobs: Option<NonZeroUsize>,
    },
    /// Verify that the tree of a file rebuilds the file byte for byte.
    RoundTrip { file: PathBuf },
    /// Start an interactive session.
    Repl,
}
