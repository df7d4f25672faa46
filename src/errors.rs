//! Pie Error Handling
//!
//! [`SyntaxError`] knows where a failure is but not what file it is in.
//! [`PieError`] pairs it with a [`SourceContext`] so miette can render the
//! offending snippet, and adds the failures the command-line tools run into.

use std::fmt;
use std::io;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, Report, SourceCode};
use thiserror::Error;

use crate::config::ConfigError;
use crate::syntax::SyntaxError;

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Named source text for error reporting.
#[derive(Debug, Clone)]
pub struct SourceContext {
    source: Arc<NamedSource<String>>,
}

impl SourceContext {
    pub fn new(name: impl AsRef<str>, content: impl Into<String>) -> Self {
        Self {
            source: Arc::new(NamedSource::new(name, content.into())),
        }
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn named_source(&self) -> &NamedSource<String> {
        &self.source
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PieError {
    #[error("{error}")]
    Syntax {
        error: SyntaxError,
        context: SourceContext,
    },

    #[error("Couldn't read {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{path} does not round-trip")]
    RoundTrip { path: String, offset: usize },
}

impl PieError {
    pub fn syntax(error: SyntaxError, name: impl AsRef<str>, content: impl Into<String>) -> Self {
        PieError::Syntax {
            error,
            context: SourceContext::new(name, content),
        }
    }

    pub fn io(path: impl fmt::Display, source: io::Error) -> Self {
        PieError::Io {
            path: path.to_string(),
            source,
        }
    }

    /// The underlying syntax error, if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            PieError::Syntax { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl Diagnostic for PieError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            PieError::Syntax { error, .. } => error.code(),
            PieError::Io { .. } => Some(Box::new("pie::io")),
            PieError::Config(_) => Some(Box::new("pie::config")),
            PieError::RoundTrip { .. } => Some(Box::new("pie::round_trip")),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            PieError::Syntax { error, .. } => error.help(),
            PieError::RoundTrip { offset, .. } => {
                Some(Box::new(format!("the rebuilt text first differs at byte {offset}")))
            }
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            PieError::Syntax { error, .. } => error.labels(),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        match self {
            PieError::Syntax { context, .. } => Some(context.named_source()),
            _ => None,
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints an error with full miette diagnostics to stderr.
pub fn print_error(error: PieError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    #[test]
    fn test_syntax_error_keeps_labels_and_source() {
        let error = parse("(claim x)").unwrap_err();
        let error = PieError::syntax(error, "x.pie", "(claim x)");
        assert_eq!(
            error.code().map(|c| c.to_string()).as_deref(),
            Some("pie::parse::missing_expression")
        );
        assert_eq!(error.labels().map(|l| l.count()), Some(1));
        assert!(error.source_code().is_some());
        assert!(error.as_syntax().is_some());
    }

    #[test]
    fn test_io_error_has_no_source() {
        let error = PieError::io("missing.pie", io::Error::from(io::ErrorKind::NotFound));
        assert!(error.source_code().is_none());
        assert_eq!(error.to_string(), "Couldn't read missing.pie");
    }
}
