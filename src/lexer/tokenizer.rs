//! Whole-source tokenization on top of the line scanner

use super::scanner::Scanner;
use super::token::Token;
use crate::error::LexError;

/// Result of tokenizing a complete source text
#[derive(Debug, Clone, Default)]
pub struct TokenizedSource {
    /// Every token in source order, without `EOL` markers
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<LexError>,
    /// Number of lines supplied to the scanner
    pub lines: usize,
}

impl TokenizedSource {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Tokenize source code
///
/// Lines are split with [`str::lines`], so both `\n` and `\r\n` endings are
/// stripped before the scanner sees them.
pub fn tokenize(source: &str) -> TokenizedSource {
    let mut scanner = Scanner::new();
    let mut tokens = Vec::new();

    for line in source.lines() {
        tokens.extend(scanner.scan_line(line));
    }
    scanner.finish();

    TokenizedSource {
        tokens,
        diagnostics: scanner.diagnostics().to_vec(),
        lines: scanner.line(),
    }
}

/// Debug helper: render a token stream as text
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{} @ {}:{}", t, t.line, t.column))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn test_basic_tokenization() {
        let result = tokenize("var x = 42;");

        assert_eq!(result.tokens.len(), 5);
        assert!(matches!(result.tokens[0].kind, TokenKind::Var));
        assert!(matches!(result.tokens[1].kind, TokenKind::Ident));
        assert!(matches!(result.tokens[2].kind, TokenKind::Assign));
        assert!(matches!(result.tokens[3].kind, TokenKind::Int));
        assert!(matches!(result.tokens[4].kind, TokenKind::Semicolon));
        assert!(!result.has_errors());
    }

    #[test]
    fn test_crlf_line_endings() {
        let result = tokenize("a\r\nb\r\n");
        assert_eq!(result.tokens.len(), 2);
        assert_eq!(result.tokens[1].line, 2);
        assert_eq!(result.tokens[1].column, 1);
        assert_eq!(result.lines, 2);
    }

    #[test]
    fn test_multi_line_string() {
        let result = tokenize("x = `hello\nworld`;");
        assert_eq!(result.tokens[2].kind, TokenKind::String);
        assert_eq!(result.tokens[2].lexeme, "hello\nworld");
        assert_eq!(result.tokens[3].kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_unclosed_constructs_are_reported() {
        let result = tokenize("x = \"open\n/* comment");
        assert_eq!(
            result
                .diagnostics
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec![
                "1:5: syntax error: unclosed string",
                "2:1: syntax error: unclosed multi-line comment",
            ]
        );
    }

    #[test]
    fn test_format_tokens() {
        let result = tokenize("fn main");
        assert_eq!(
            format_tokens(&result.tokens),
            "FUNCTION(\"fn\") @ 1:1\nIDENT(\"main\") @ 1:4"
        );
    }
}
