//! Tokenization pipeline
//!
//! Reads a source file, runs it through [`lexer::tokenize`], and
//! accumulates every lexical diagnostic so they can all be reported in one
//! pass.

use crate::error::{ErrorCollector, ReLangError, ReLangResult};
use crate::lexer::{self, Token};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// State of one source file being tokenized
pub struct SourceState {
    pub source_file: String,
    pub source: String,
    pub files: SimpleFiles<String, String>,
    pub file_id: usize,
    pub error_collector: ErrorCollector,
}

impl SourceState {
    pub fn new<P: AsRef<Path>>(source_file: P) -> ReLangResult<Self> {
        let source_file_str = source_file.as_ref().display().to_string();
        let source = fs::read_to_string(source_file.as_ref())
            .map_err(|e| ReLangError::Io(format!("Failed to read source file: {}", e)))?;

        Ok(Self::from_string(&source_file_str, source))
    }

    /// Create state from an in-memory string
    pub fn from_string(filename: &str, source: String) -> Self {
        let mut files = SimpleFiles::new();
        let file_id = files.add(filename.to_string(), source.clone());

        Self {
            source_file: filename.to_string(),
            source,
            files,
            file_id,
            error_collector: ErrorCollector::new(),
        }
    }

    pub fn add_error(&mut self, error: ReLangError) {
        self.error_collector.add_error(error, self.file_id);
    }

    /// Render every collected diagnostic to stderr
    pub fn report_diagnostics(&self, color: ColorChoice) -> ReLangResult<()> {
        let writer = StandardStream::stderr(color);
        let config = codespan_reporting::term::Config::default();

        for error in self.error_collector.errors() {
            let diagnostic = error.to_diagnostic(&self.files);
            codespan_reporting::term::emit(&mut writer.lock(), &config, &self.files, &diagnostic)
                .map_err(|e| ReLangError::Io(format!("Failed to emit diagnostic: {}", e)))?;
        }

        Ok(())
    }

    pub fn has_errors(&self) -> bool {
        self.error_collector.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.error_collector.error_count()
    }
}

/// Tokenization pipeline over a [`SourceState`]
pub struct TokenizePipeline {
    state: SourceState,
}

impl TokenizePipeline {
    pub fn new(state: SourceState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SourceState {
        &self.state
    }

    /// Scan the whole source, returning every token without `EOL` markers
    ///
    /// Diagnostics end up in the state's error collector.
    pub fn run(&mut self) -> Vec<Token> {
        info!("tokenizing {}", self.state.source_file);

        let result = lexer::tokenize(&self.state.source);
        for diagnostic in result.diagnostics {
            debug!("{}", diagnostic);
            self.state.add_error(diagnostic.into());
        }

        info!(
            "{} tokens, {} diagnostics over {} lines",
            result.tokens.len(),
            self.state.error_count(),
            result.lines
        );

        result.tokens
    }

    /// Print diagnostics and a summary line when there were errors
    pub fn report_errors(&self, color: ColorChoice) -> ReLangResult<()> {
        self.state.report_diagnostics(color)?;

        if self.state.has_errors() {
            eprintln!(
                "\ntokenization finished with {} error(s)",
                self.state.error_count()
            );
        }

        Ok(())
    }

    pub fn into_state(self) -> SourceState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexError;
    use crate::lexer::TokenKind;

    #[test]
    fn test_pipeline_collects_tokens_and_errors() {
        let state = SourceState::from_string("test.re", "var a = 1;\nvar b = #x;\n".to_string());
        let mut pipeline = TokenizePipeline::new(state);
        let tokens = pipeline.run();

        assert_eq!(tokens.len(), 10);
        assert_eq!(tokens[8].kind, TokenKind::Illegal);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Eol));

        let state = pipeline.into_state();
        assert_eq!(state.error_count(), 1);
        assert!(matches!(
            state.error_collector.first_error().map(|e| &e.error),
            Some(ReLangError::Lexer(LexError::UnexpectedLiteral { line: 2, column: 9, .. }))
        ));
    }

    #[test]
    fn test_pipeline_agrees_with_tokenize() {
        let source = "x = `a\nb` /* c\n*/ \"d\n";
        let mut pipeline = TokenizePipeline::new(SourceState::from_string("t.re", source.to_string()));
        let tokens = pipeline.run();

        let expected = lexer::tokenize(source);
        assert_eq!(tokens, expected.tokens);
        assert_eq!(pipeline.state().error_count(), expected.diagnostics.len());
        assert_eq!(pipeline.state().error_count(), 1);
    }

    #[test]
    fn test_missing_file() {
        let result = SourceState::new("/definitely/not/here.re");
        assert!(matches!(result, Err(ReLangError::Io(_))));
    }
}
