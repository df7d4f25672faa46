//! Line editing for terminal sessions.
//!
//! The helper validates each entry with the parser, so pressing Enter inside
//! an open form inserts a newline instead of submitting. Matching brackets are
//! highlighted, hints come from history and `:commands` tab-complete.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rustyline::completion::{Completer, Pair};
use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter, MatchingBracketHighlighter};
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{CompletionType, Context, EditMode, Editor, Helper};
use tracing::{debug, warn};

use super::{is_command, needs_more_input, respond, Repl, PROMPT};
use crate::config::ParserConfig;

const COMMANDS: &[&str] = &[":help", ":h", ":quit", ":q"];

pub(super) struct PieHelper {
    config: ParserConfig,
    highlighter: MatchingBracketHighlighter,
    hinter: HistoryHinter,
    colored_prompt: String,
}

impl PieHelper {
    pub(super) fn new(config: ParserConfig) -> Self {
        let colored_prompt = if atty::is(atty::Stream::Stdout) {
            format!("\x1b[1;32m{PROMPT}\x1b[0m")
        } else {
            PROMPT.to_string()
        };
        Self {
            config,
            highlighter: MatchingBracketHighlighter::new(),
            hinter: HistoryHinter::new(),
            colored_prompt,
        }
    }
}

/// Commands starting with `prefix`, or nothing once the prefix has an argument.
fn complete_command(prefix: &str) -> Vec<&'static str> {
    if !prefix.starts_with(':') || prefix.contains(char::is_whitespace) {
        return Vec::new();
    }
    COMMANDS
        .iter()
        .copied()
        .filter(|command| command.starts_with(prefix))
        .collect()
}

impl Completer for PieHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let Some(prefix) = line.get(..pos) else {
            return Ok((pos, Vec::new()));
        };
        let candidates = complete_command(prefix)
            .into_iter()
            .map(|command| Pair {
                display: command.to_string(),
                replacement: command.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for PieHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for PieHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Borrowed(&self.colored_prompt)
        } else {
            Borrowed(prompt)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }

    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize, kind: CmdKind) -> bool {
        self.highlighter.highlight_char(line, pos, kind)
    }
}

impl Validator for PieHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        let input = ctx.input();
        if !is_command(input) && needs_more_input(input, &self.config) {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

impl Helper for PieHelper {}

// ============================================================================
// HISTORY
// ============================================================================

/// `$XDG_STATE_HOME/pie/history`, falling back to the local data directory.
pub(super) fn history_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("pie").join("history"))
}

fn save_history(editor: &mut Editor<PieHelper, FileHistory>, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!(path = %parent.display(), error = %e, "couldn't create history directory");
            return;
        }
    }
    if let Err(e) = editor.save_history(path) {
        warn!(path = %path.display(), error = %e, "couldn't save history");
    }
}

fn into_io(error: ReadlineError) -> io::Error {
    match error {
        ReadlineError::Io(e) => e,
        other => io::Error::other(other.to_string()),
    }
}

// ============================================================================
// LOOP
// ============================================================================

/// Runs `repl` on the terminal until `:quit`, Ctrl-D, or a terminal error.
/// Ctrl-C discards the entry being typed.
pub(super) fn run_interactive(repl: &mut Repl) -> io::Result<()> {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();
    let mut editor: Editor<PieHelper, FileHistory> =
        Editor::with_config(config).map_err(into_io)?;
    editor.set_helper(Some(PieHelper::new(repl.config().clone())));

    let history = history_path();
    if let Some(path) = &history {
        if let Err(e) = editor.load_history(path) {
            debug!(path = %path.display(), error = %e, "no previous history");
        }
    }

    let mut stdout = io::stdout();
    loop {
        match editor.readline(PROMPT) {
            Ok(entry) => {
                if entry.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(entry.as_str()).map_err(into_io)?;
                let feed = repl.feed(&entry);
                if respond(feed, &mut stdout)?.is_break() {
                    break;
                }
                stdout.flush()?;
            }
            Err(ReadlineError::Interrupted) => println!("CTRL-C"),
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(into_io(e)),
        }
    }

    if let Some(path) = &history {
        save_history(&mut editor, path);
    }
    Ok(())
}
