//! Unified error handling module
//!
//! Lexical errors never abort scanning. The scanner records them as
//! [`LexError`] values and keeps going; this module turns them into
//! `codespan-reporting` diagnostics and collects them for reporting.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{Files, SimpleFiles};
use thiserror::Error;

/// Top-level error type of the relang toolchain
#[derive(Error, Debug, Clone)]
pub enum ReLangError {
    /// Lexical error
    #[error("lexical error: {0}")]
    Lexer(#[from] LexError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

/// Recoverable lexical errors
///
/// `Display` renders the plain diagnostic line `"<line>:<column>: syntax error: <message>"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("{line}:{column}: syntax error: unclosed string")]
    UnclosedString { line: usize, column: usize },

    #[error("{line}:{column}: syntax error: unclosed multi-line string")]
    UnclosedMultiLineString { line: usize, column: usize },

    #[error("{line}:{column}: syntax error: unclosed multi-line comment")]
    UnclosedMultiLineComment { line: usize, column: usize },

    #[error("{line}:{column}: syntax error: unexpected literal")]
    UnexpectedLiteral {
        literal: String,
        line: usize,
        column: usize,
    },
}

impl LexError {
    /// 1-based `(line, column)` the error points at
    pub fn position(&self) -> (usize, usize) {
        match self {
            LexError::UnclosedString { line, column }
            | LexError::UnclosedMultiLineString { line, column }
            | LexError::UnclosedMultiLineComment { line, column }
            | LexError::UnexpectedLiteral { line, column, .. } => (*line, *column),
        }
    }

    /// Message without the position prefix
    pub fn message(&self) -> &'static str {
        match self {
            LexError::UnclosedString { .. } => "unclosed string",
            LexError::UnclosedMultiLineString { .. } => "unclosed multi-line string",
            LexError::UnclosedMultiLineComment { .. } => "unclosed multi-line comment",
            LexError::UnexpectedLiteral { .. } => "unexpected literal",
        }
    }

    /// Number of bytes the primary label should cover
    fn width(&self) -> usize {
        match self {
            LexError::UnexpectedLiteral { literal, .. } => literal.len().max(1),
            LexError::UnclosedMultiLineComment { .. } => 2,
            _ => 1,
        }
    }

    fn label_message(&self) -> &'static str {
        match self {
            LexError::UnclosedString { .. } => "this string is never closed on its line",
            LexError::UnclosedMultiLineString { .. } => "this string is still open at end of input",
            LexError::UnclosedMultiLineComment { .. } => {
                "this comment is still open at end of input"
            }
            LexError::UnexpectedLiteral { .. } => "not a valid token",
        }
    }
}

/// An error together with the file it belongs to
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: ReLangError,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(error: ReLangError, file_id: usize) -> Self {
        Self { error, file_id }
    }

    /// Convert into a codespan-reporting `Diagnostic`
    ///
    /// Line/column positions are mapped back to byte offsets through the
    /// file database. A position that no longer maps onto the file produces a
    /// diagnostic without labels.
    pub fn to_diagnostic(&self, files: &SimpleFiles<String, String>) -> Diagnostic<usize> {
        match &self.error {
            ReLangError::Lexer(e) => {
                let (line, column) = e.position();
                let labels = match files.line_range(self.file_id, line.saturating_sub(1)) {
                    Ok(range) => {
                        let start = (range.start + column.saturating_sub(1)).min(range.end);
                        let end = (start + e.width()).min(range.end).max(start);
                        vec![Label::primary(self.file_id, start..end)
                            .with_message(e.label_message())]
                    }
                    Err(_) => vec![],
                };
                Diagnostic::error()
                    .with_message(format!("syntax error: {}", e.message()))
                    .with_labels(labels)
            }
            ReLangError::Io(message) => {
                Diagnostic::error().with_message(format!("I/O error: {}", message))
            }
            ReLangError::Other(message) => Diagnostic::error().with_message(message.clone()),
        }
    }
}

/// Collector for accumulating multiple errors
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: ReLangError, file_id: usize) {
        self.errors.push(DiagnosticError::new(error, file_id));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }

    pub fn first_error(&self) -> Option<&DiagnosticError> {
        self.errors.first()
    }
}

/// Result type alias
pub type ReLangResult<T> = Result<T, ReLangError>;

impl From<std::io::Error> for ReLangError {
    fn from(e: std::io::Error) -> Self {
        ReLangError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ReLangError {
    fn from(e: serde_json::Error) -> Self {
        ReLangError::Other(format!("JSON serialization failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display() {
        let e = LexError::UnclosedString { line: 2, column: 5 };
        assert_eq!(e.to_string(), "2:5: syntax error: unclosed string");

        let e = LexError::UnexpectedLiteral {
            literal: "#abc".to_string(),
            line: 1,
            column: 1,
        };
        assert_eq!(e.to_string(), "1:1: syntax error: unexpected literal");
        assert_eq!(e.position(), (1, 1));
    }

    #[test]
    fn test_diagnostic_label_points_at_column() {
        let mut files = SimpleFiles::new();
        let file_id = files.add("test.re".to_string(), "var x;\nvar y = #bad;\n".to_string());

        let error = DiagnosticError::new(
            ReLangError::Lexer(LexError::UnexpectedLiteral {
                literal: "#bad".to_string(),
                line: 2,
                column: 9,
            }),
            file_id,
        );
        let diagnostic = error.to_diagnostic(&files);

        assert_eq!(diagnostic.message, "syntax error: unexpected literal");
        assert_eq!(diagnostic.labels.len(), 1);
        // "var x;\n" is 7 bytes, column 9 is offset 8 on line 2
        assert_eq!(diagnostic.labels[0].range, 15..19);
    }

    #[test]
    fn test_diagnostic_out_of_range_has_no_labels() {
        let mut files = SimpleFiles::new();
        let file_id = files.add("test.re".to_string(), "x".to_string());

        let error = DiagnosticError::new(
            ReLangError::Lexer(LexError::UnclosedMultiLineComment { line: 40, column: 1 }),
            file_id,
        );
        assert!(error.to_diagnostic(&files).labels.is_empty());
    }

    #[test]
    fn test_error_collector() {
        let mut collector = ErrorCollector::new();
        assert!(!collector.has_errors());

        collector.add_error(LexError::UnclosedString { line: 1, column: 1 }.into(), 0);
        collector.add_error(ReLangError::Other("boom".to_string()), 0);

        assert!(collector.has_errors());
        assert_eq!(collector.error_count(), 2);
        assert!(matches!(
            collector.first_error().map(|e| &e.error),
            Some(ReLangError::Lexer(LexError::UnclosedString { .. }))
        ));
    }
}
