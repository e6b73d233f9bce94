//! Error types for the PCOS analyzer.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Recoverable findings are [`Diagnostic`](crate::Diagnostic)s, not errors;
//! an `Error` means a stage could not produce its output at all.

use std::fmt;

use thiserror::Error;

use crate::file::FileId;
use crate::span::Span;

/// The main error type for analyzer operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a parse error positioned at the start of `span`.
    #[must_use]
    pub fn parse(message: impl Into<String>, span: Span, source: &str) -> Self {
        let context = source
            .lines()
            .nth(span.line.saturating_sub(1) as usize)
            .unwrap_or_default()
            .to_string();
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line: span.line,
            column: span.column,
            context,
        })
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    /// The file the error belongs to, when context names one.
    #[must_use]
    pub fn file(&self) -> Option<&FileId> {
        self.context.as_ref().and_then(|c| c.file.as_ref())
    }

    /// Returns the parse position if this is a parse error.
    #[must_use]
    pub fn parse_position(&self) -> Option<(u32, u32)> {
        match &self.kind {
            ErrorKind::ParseError { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Unterminated construct or stray delimiter in stylesheet source.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// The caller cancelled the run.
    #[error("analysis cancelled")]
    Cancelled,

    /// Registry snapshot encoding or decoding failed.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// File the error belongs to.
    pub file: Option<FileId>,
    /// Stage being run (`parse`, `snapshot decode`, ...).
    pub stage: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file.
    #[must_use]
    pub fn with_file(mut self, file: FileId) -> Self {
        self.file = Some(file);
        self
    }

    /// Sets the stage.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "in {file}")?;
        }
        if let Some(stage) = &self.stage {
            if self.file.is_some() {
                f.write_str(" ")?;
            }
            write!(f, "during {stage}")?;
        }
        Ok(())
    }
}

/// Result type alias using the analyzer [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
