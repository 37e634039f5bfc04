//! Diagnostic collection.
//!
//! Every stage of the pipeline reports through a [`Handler`] instead of
//! aborting directly: per the error taxonomy, a lexical, syntactic, or
//! semantic problem discards one statement and continues, so diagnostics
//! need to accumulate across the whole run rather than short-circuit it.
//! Only I/O errors at the driver level bypass this and return `Err`
//! directly.

use crate::Span;
use std::fmt;

/// Severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A single diagnostic message, optionally anchored to a source span.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Accumulates diagnostics emitted over the course of a compile.
///
/// # Examples
///
/// ```
/// use ilc_util::{Handler, Level, Span};
///
/// let mut handler = Handler::new();
/// handler.error("identifier 'x' has not been declared", Span::DUMMY);
/// assert!(handler.has_errors());
/// assert_eq!(handler.diagnostics().len(), 1);
/// ```
#[derive(Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self { diagnostics: Vec::new() }
    }

    pub fn report(&mut self, level: Level, message: impl Into<String>, span: Span) {
        let diag = Diagnostic { level, message: message.into(), span };
        match diag.level {
            Level::Error => tracing::error!("{}", diag),
            Level::Warning => tracing::warn!("{}", diag),
            Level::Note => tracing::info!("{}", diag),
        }
        self.diagnostics.push(diag);
    }

    pub fn error(&mut self, message: impl Into<String>, span: Span) {
        self.report(Level::Error, message, span);
    }

    pub fn warning(&mut self, message: impl Into<String>, span: Span) {
        self.report(Level::Warning, message, span);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
