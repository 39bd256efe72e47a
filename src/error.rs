use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Byte range into the source text, carried by tokens for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

/// A syntax problem found while parsing. The parser collects these and keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        render("Parse Error", Color::Yellow, &self.message, self.span, source, filename);
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// A semantic failure during evaluation. Once raised it becomes the result of the
/// whole program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub message: String,
    pub span: Span,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// The form printed as a program result.
    pub fn inspect(&self) -> String {
        format!("ERROR: {}", self.message)
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        render("Runtime Error", Color::Magenta, &self.message, self.span, source, filename);
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Host-level failures. These never show up as language values.
#[derive(Debug, Error)]
pub enum ChocoError {
    #[error("could not read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn render(
    kind: &str,
    color: Color,
    message: &str,
    span: Span,
    source: &str,
    filename: Option<&str>,
) {
    let filename = filename.unwrap_or("<repl>");
    // Clamp so an EOF span never points past the source.
    let start = span.start.min(source.len());
    let end = span.end.clamp(start, source.len());

    let result = Report::build(ReportKind::Error, filename, start)
        .with_message(format!("{}: {}", kind.fg(color), message))
        .with_label(
            Label::new((filename, start..end))
                .with_message(message)
                .with_color(color),
        )
        .finish()
        .eprint((filename, Source::from(source)));

    if let Err(error) = result {
        tracing::warn!(%error, "failed to render diagnostic");
    }
}
