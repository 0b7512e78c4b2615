//! Unified, `miette`-based diagnostics for the descent engine.
//!
//! Every failure mode of the pipeline — grammar loading, sequence input,
//! trace/tree file I/O, and internal invariant violations — is represented by
//! one `DescentError` value. Note that a *rejected* sequence is not an error:
//! rejection is an ordinary engine outcome (see `engine::ParseOutcome`).

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

/// Shared, named source text for diagnostics.
pub type SourceArc = Arc<NamedSource<String>>;

/// A byte range into a diagnostic source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Type-safe error classification, used by tests instead of string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Malformed grammar file: bad headers, bad rule lines, invalid CFG.
    Grammar,
    /// Malformed input-sequence file (e.g. a lexer record with no token).
    Sequence,
    /// Trace or tree file I/O failure.
    Io,
    /// Internal invariant violation (a bug, not a user error).
    Internal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Grammar => "Grammar",
            ErrorType::Sequence => "Sequence",
            ErrorType::Io => "Io",
            ErrorType::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The primary source for this error (if any).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Returns an empty error context (no source, span, or help).
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a context with both source and span.
    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }

    /// Attaches a help message to an existing context.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Unified error type for all descent failure modes.
#[derive(Debug, Error)]
pub enum DescentError {
    #[error("Grammar error: {message}")]
    Grammar {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Sequence error: {message}")]
    Sequence {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl DescentError {
    /// A grammar-load failure with a span into the grammar source text.
    pub fn grammar(message: impl Into<String>, source: SourceArc, span: Span) -> Self {
        DescentError::Grammar {
            message: message.into(),
            ctx: ErrorContext::with_source_and_span(source, span),
            source: None,
        }
    }

    /// A malformed sequence record, with a span into the sequence file.
    pub fn sequence(message: impl Into<String>, source: SourceArc, span: Span) -> Self {
        DescentError::Sequence {
            message: message.into(),
            ctx: ErrorContext::with_source_and_span(source, span),
            source: None,
        }
    }

    /// An I/O failure tagged with the path it occurred on.
    pub fn io(path: impl std::fmt::Display, error: std::io::Error) -> Self {
        DescentError::Io {
            message: format!("{path}: {error}"),
            ctx: ErrorContext::none(),
            source: Some(Box::new(error)),
        }
    }

    /// An internal invariant violation.
    pub fn internal(message: impl Into<String>) -> Self {
        DescentError::Internal {
            message: message.into(),
            ctx: ErrorContext::none(),
            source: None,
        }
    }

    fn get_ctx(&self) -> &ErrorContext {
        match self {
            DescentError::Grammar { ctx, .. } => ctx,
            DescentError::Sequence { ctx, .. } => ctx,
            DescentError::Io { ctx, .. } => ctx,
            DescentError::Internal { ctx, .. } => ctx,
        }
    }

    fn message(&self) -> &str {
        match self {
            DescentError::Grammar { message, .. } => message,
            DescentError::Sequence { message, .. } => message,
            DescentError::Io { message, .. } => message,
            DescentError::Internal { message, .. } => message,
        }
    }

    /// Returns the type-safe error classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            DescentError::Grammar { .. } => ErrorType::Grammar,
            DescentError::Sequence { .. } => ErrorType::Sequence,
            DescentError::Io { .. } => ErrorType::Io,
            DescentError::Internal { .. } => ErrorType::Internal,
        }
    }
}

impl Diagnostic for DescentError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self {
            DescentError::Grammar { .. } => "descent::grammar",
            DescentError::Sequence { .. } => "descent::sequence",
            DescentError::Io { .. } => "descent::io",
            DescentError::Internal { .. } => "descent::internal",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.get_ctx().span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Wraps source text into a `SourceArc` for diagnostics.
pub fn to_error_source(name: impl AsRef<str>, text: impl AsRef<str>) -> SourceArc {
    Arc::new(NamedSource::new(name.as_ref(), text.as_ref().to_string()))
}
