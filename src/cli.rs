//! The Pie Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and wires the
//! parser, discovery and REPL together.

use std::fs;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use termcolor::WriteColor;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{FunctionTypeMode, ParserConfig},
    discovery::{check_files, default_jobs, discover_pie_files, FileReport},
    errors::{print_error, PieError},
    repl::run_repl,
    syntax::{parse_with_config, Lexer, SyntaxError, SyntaxTree},
};

pub mod args;
pub mod output;

use args::{Command, PieArgs};

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    let args = PieArgs::parse();
    init_logging(args.verbose);

    let config = match args.parser.resolve() {
        Ok(config) => config,
        Err(e) => {
            print_error(e.into());
            return ExitCode::FAILURE;
        }
    };
    debug!(?config, "resolved configuration");

    let result = match args.command {
        Command::Parse { file, json } => parse_command(&file, &config, json),
        Command::Tokens { file } => tokens_command(&file, &config),
        Command::Check { paths, jobs } => {
            return check_command(&paths, &config, jobs.unwrap_or_else(default_jobs));
        }
        Command::RoundTrip { file } => round_trip_command(&file, &config),
        Command::Repl => run_repl(config).map_err(|e| PieError::io("<stdin>", e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let directive = match verbose {
        0 => "pie=warn",
        1 => "pie=debug",
        _ => "pie=trace",
    };
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// COMMANDS
// ============================================================================

fn parse_command(file: &Path, config: &ParserConfig, json: bool) -> Result<(), PieError> {
    let (_, tree) = read_and_parse(file, config)?;
    let mut stdout = output::stdout();
    if json {
        let rendered = serde_json::to_string_pretty(tree.root())
            .map_err(|e| PieError::io(file.display(), e.into()))?;
        writeln!(stdout, "{rendered}").map_err(|e| PieError::io("<stdout>", e))
    } else {
        output::write_tree(&mut stdout, tree.root()).map_err(|e| PieError::io("<stdout>", e))
    }
}

fn tokens_command(file: &Path, config: &ParserConfig) -> Result<(), PieError> {
    let source = read_source(file)?;
    let tokens = Lexer::new(&source)
        .with_arrow_keywords(config.function_types == FunctionTypeMode::Production)
        .tokenize_with_comments()
        .map_err(|e| {
            PieError::syntax(SyntaxError::Lex(e), file.display().to_string(), source.clone())
        })?;
    output::write_tokens(&mut output::stdout(), &tokens).map_err(|e| PieError::io("<stdout>", e))
}

fn check_command(paths: &[PathBuf], config: &ParserConfig, jobs: NonZeroUsize) -> ExitCode {
    let mut files = Vec::new();
    let mut failed = 0usize;
    for path in paths {
        match discover_pie_files(path) {
            Ok(found) => files.extend(found),
            Err(e) => {
                failed += 1;
                print_error(e);
            }
        }
    }

    let reports = check_files(&files, config, jobs);
    match write_check_reports(&mut output::stdout(), reports, failed) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            print_error(PieError::io("<stdout>", e));
            ExitCode::FAILURE
        }
    }
}

/// Prints a status line per report and the summary. Returns the total
/// number of failures, counting the `failed` already seen during discovery.
fn write_check_reports<W: WriteColor>(
    out: &mut W,
    reports: Vec<FileReport>,
    mut failed: usize,
) -> io::Result<usize> {
    let checked = reports.len();
    for report in reports {
        output::print_status(out, report.is_ok(), &report.path.display().to_string())?;
        if let Err(e) = report.result {
            failed += 1;
            print_error(e);
        }
    }

    writeln!(out)?;
    writeln!(out, "Checked {checked} files, {failed} failed")?;
    Ok(failed)
}

fn round_trip_command(file: &Path, config: &ParserConfig) -> Result<(), PieError> {
    let (source, tree) = read_and_parse(file, config)?;
    let rebuilt = tree.to_source();
    if let Some(offset) = first_difference(&source, &rebuilt) {
        return Err(PieError::RoundTrip {
            path: file.display().to_string(),
            offset,
        });
    }
    output::print_status(&mut output::stdout(), true, &format!("{} round-trips", file.display()))
        .map_err(|e| PieError::io("<stdout>", e))
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn read_source(file: &Path) -> Result<String, PieError> {
    fs::read_to_string(file).map_err(|e| PieError::io(file.display(), e))
}

fn read_and_parse(file: &Path, config: &ParserConfig) -> Result<(String, SyntaxTree), PieError> {
    let source = read_source(file)?;
    match parse_with_config(&source, config) {
        Ok(tree) => Ok((source, tree)),
        Err(error) => Err(PieError::syntax(error, file.display().to_string(), source)),
    }
}

fn first_difference(left: &str, right: &str) -> Option<usize> {
    if left == right {
        return None;
    }
    let common = left
        .bytes()
        .zip(right.bytes())
        .take_while(|(a, b)| a == b)
        .count();
    Some(common)
}
