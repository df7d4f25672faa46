//! Pie REPL (Read-Parse-Print Loop)
//!
//! Reads forms interactively and prints the tree of each one. A line that
//! leaves a form open is kept and the next line is appended to it.
//!
//! On a terminal the loop runs through [`rustyline`] with line editing and a
//! history file; piped input is read line by line.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;

use crate::config::ParserConfig;
use crate::errors::{print_error, PieError};
use crate::syntax::{parse_with_config, SyntaxTree};

mod editor;

pub const PROMPT: &str = "ΛΠ ≫ ";
const CONTINUATION_PROMPT: &str = " …  ";

/// What one line of input amounted to.
#[derive(Debug)]
pub enum Feed {
    Command(ReplCommand),
    /// The buffered text ends inside an open form.
    Incomplete,
    Parsed(SyntaxTree),
    Failed(PieError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    Unknown(String),
}

/// Whether `line` is a `:command` rather than Pie input.
pub fn is_command(line: &str) -> bool {
    line.trim_start().starts_with(':')
}

/// True when `source` ends inside an open form and more lines are needed.
pub fn needs_more_input(source: &str, config: &ParserConfig) -> bool {
    matches!(parse_with_config(source, config), Err(error) if error.is_incomplete())
}

impl ReplCommand {
    fn parse(command: &str) -> Self {
        match command.to_ascii_lowercase().as_str() {
            ":help" | ":h" => ReplCommand::Help,
            ":quit" | ":q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(command.to_string()),
        }
    }
}

pub struct Repl {
    config: ParserConfig,
    buffer: String,
    entry: usize,
}

impl Repl {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            buffer: String::new(),
            entry: 1,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn is_continuing(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn prompt(&self) -> &'static str {
        if self.is_continuing() {
            CONTINUATION_PROMPT
        } else {
            PROMPT
        }
    }

    /// Adds a line of input and tries to parse everything buffered so far.
    pub fn feed(&mut self, line: &str) -> Feed {
        let trimmed = line.trim();
        if !self.is_continuing() && is_command(trimmed) {
            return Feed::Command(ReplCommand::parse(trimmed));
        }

        self.buffer.push_str(line);
        if !line.ends_with('\n') {
            self.buffer.push('\n');
        }

        match parse_with_config(&self.buffer, &self.config) {
            Ok(tree) => {
                self.finish_entry();
                Feed::Parsed(tree)
            }
            Err(error) if error.is_incomplete() => Feed::Incomplete,
            Err(error) => {
                let name = format!("<repl:{}>", self.entry);
                let source = std::mem::take(&mut self.buffer);
                self.finish_entry();
                Feed::Failed(PieError::syntax(error, name, source))
            }
        }
    }

    fn finish_entry(&mut self) {
        self.buffer.clear();
        self.entry += 1;
    }

    /// Runs the loop until `:quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<()> {
        loop {
            write!(out, "{}", self.prompt())?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(());
            }

            let feed = self.feed(&line);
            if respond(feed, &mut out)?.is_break() {
                return Ok(());
            }
        }
    }
}

/// Writes the outcome of one line. Breaks on `:quit`.
fn respond<W: Write>(feed: Feed, out: &mut W) -> io::Result<ControlFlow<()>> {
    match feed {
        Feed::Command(ReplCommand::Quit) => return Ok(ControlFlow::Break(())),
        Feed::Command(ReplCommand::Help) => print_help(out)?,
        Feed::Command(ReplCommand::Unknown(command)) => writeln!(
            out,
            "Unknown command: {command}. Type :help for available commands."
        )?,
        Feed::Incomplete => {}
        Feed::Parsed(tree) => {
            for form in tree.forms() {
                writeln!(out, "{}", form.to_sexp())?;
            }
        }
        Feed::Failed(error) => print_error(error),
    }
    Ok(ControlFlow::Continue(()))
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Pie REPL Commands:")?;
    writeln!(out, "  :help, :h     Show this help")?;
    writeln!(out, "  :quit, :q     Exit the REPL")?;
    writeln!(out)?;
    writeln!(out, "Enter Pie forms to see their syntax trees.")?;
    writeln!(out, "A form left open continues on the next line.")
}

/// Main REPL entry point
pub fn run_repl(config: ParserConfig) -> io::Result<()> {
    println!("Pie REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();

    let mut repl = Repl::new(config);
    if atty::is(atty::Stream::Stdin) {
        editor::run_interactive(&mut repl)
    } else {
        let stdin = io::stdin();
        repl.run(stdin.lock(), io::stdout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_form_continues() {
        let mut repl = Repl::new(ParserConfig::default());
        assert!(matches!(repl.feed("(define one"), Feed::Incomplete));
        assert_eq!(repl.prompt(), CONTINUATION_PROMPT);
        match repl.feed("  (add1 zero))") {
            Feed::Parsed(tree) => assert_eq!(tree.forms().len(), 1),
            other => panic!("expected a parsed form, got {other:?}"),
        }
        assert_eq!(repl.prompt(), PROMPT);
    }

    #[test]
    fn test_error_resets_buffer() {
        let mut repl = Repl::new(ParserConfig::default());
        assert!(matches!(repl.feed("(claim X Nat)"), Feed::Failed(_)));
        assert!(!repl.is_continuing());
    }

    #[test]
    fn test_commands_only_at_start_of_entry() {
        let mut repl = Repl::new(ParserConfig::default());
        assert!(matches!(repl.feed(":q"), Feed::Command(ReplCommand::Quit)));
        assert!(matches!(repl.feed("(f"), Feed::Incomplete));
        // `:q` inside an open form is ordinary input and fails to lex
        assert!(matches!(repl.feed(":q"), Feed::Failed(_)));
    }

    #[test]
    fn test_needs_more_input_only_for_open_forms() {
        let config = ParserConfig::default();
        assert!(needs_more_input("(define one", &config));
        assert!(needs_more_input("(λ (x\n", &config));
        assert!(!needs_more_input("(define one 'a)", &config));
        assert!(!needs_more_input("(f))", &config));
        assert!(!needs_more_input("(f #", &config));
        assert!(!needs_more_input("", &config));
    }

    #[test]
    fn test_is_command() {
        assert!(is_command(":help"));
        assert!(is_command("  :q"));
        assert!(!is_command("(f :q)"));
    }

    #[test]
    fn test_respond_breaks_on_quit() {
        let mut out = Vec::new();
        let flow = respond(Feed::Command(ReplCommand::Quit), &mut out).unwrap();
        assert!(flow.is_break());
        let flow = respond(Feed::Command(ReplCommand::Help), &mut out).unwrap();
        assert!(flow.is_continue());
        assert!(String::from_utf8(out).unwrap().contains(":help, :h"));
    }

    #[test]
    fn test_run_prints_forms() {
        let input = b"(claim one Nat)\n(f\n x)\n:quit\n";
        let mut out = Vec::new();
        Repl::new(ParserConfig::default())
            .run(&input[..], &mut out)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(r#"(claim identifier: (identifier "one") type: (type_identifier "Nat"))"#));
        assert!(out.contains(r#"(application function: (identifier "f") arguments: (identifier "x"))"#));
    }
}
