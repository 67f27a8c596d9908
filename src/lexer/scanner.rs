//! Line-buffered scanner
//!
//! The scanner only ever sees one line of input at a time. Backtick strings
//! and block comments may still span several lines, so the partial state of
//! such a construct is carried across [`Scanner::supply_line`] calls in
//! [`ScanMode`].

use log::{debug, trace};
use logos::Logos;

use super::token::{RawToken, Token, TokenKind};
use crate::error::LexError;

/// Cross-line scanning state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    Normal,
    /// Inside a backtick string; `value` holds everything read since the
    /// opening backtick, with one `\n` per line boundary crossed.
    InMultiLineString {
        value: String,
        line: usize,
        column: usize,
    },
    /// Inside a `/* ... */` comment opened at `line`:`column`
    InMultiLineComment { line: usize, column: usize },
}

/// The Re language scanner
///
/// Feed lines with [`supply_line`](Scanner::supply_line), pull tokens with
/// [`next_token`](Scanner::next_token) until an `EOL` token appears, and call
/// [`finish`](Scanner::finish) once the input is exhausted.
#[derive(Debug, Default)]
pub struct Scanner {
    input: String,
    position: usize,
    line: usize,
    mode: ScanMode,
    diagnostics: Vec<LexError>,
    ended: bool,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start scanning the next line of input
    ///
    /// Any open backtick string or block comment continues on this line.
    ///
    /// # Panics
    ///
    /// Panics if called after [`finish`](Scanner::finish).
    pub fn supply_line(&mut self, text: &str) {
        assert!(
            !self.ended,
            "supply_line called after finish(): no further input may be scanned"
        );

        self.input.clear();
        self.input.push_str(text);
        self.position = 0;
        self.line += 1;
        trace!("line {}: {:?}", self.line, text);
    }

    /// Signal end of input
    ///
    /// Turns a construct that is still open into a diagnostic. Calling it
    /// again has no effect.
    pub fn finish(&mut self) {
        if self.ended {
            return;
        }

        match std::mem::take(&mut self.mode) {
            ScanMode::InMultiLineString { line, column, .. } => {
                debug!("input ended inside string opened at {}:{}", line, column);
                self.diagnostics
                    .push(LexError::UnclosedMultiLineString { line, column });
            }
            ScanMode::InMultiLineComment { line, column } => {
                debug!("input ended inside comment opened at {}:{}", line, column);
                self.diagnostics
                    .push(LexError::UnclosedMultiLineComment { line, column });
            }
            ScanMode::Normal => {}
        }

        self.ended = true;
    }

    /// Produce the next token of the current line
    ///
    /// Returns an `EOL` token once the line is exhausted and `EOF` after
    /// [`finish`](Scanner::finish).
    pub fn next_token(&mut self) -> Token {
        if self.ended {
            return Token::new(TokenKind::Eof, "", self.line, self.input.len() + 1);
        }

        loop {
            match std::mem::take(&mut self.mode) {
                ScanMode::Normal => {
                    if let Some(token) = self.scan_normal() {
                        trace!("{}:{} {}", token.line, token.column, token);
                        return token;
                    }
                }
                ScanMode::InMultiLineString { value, line, column } => {
                    return self.resume_string(value, line, column);
                }
                ScanMode::InMultiLineComment { line, column } => {
                    if !self.skip_block_comment() {
                        self.mode = ScanMode::InMultiLineComment { line, column };
                        return self.end_of_line();
                    }
                    debug!("comment opened at {}:{} closed on line {}", line, column, self.line);
                }
            }
        }
    }

    /// Pull the tokens of the current line, stopping before `EOL`
    pub fn line_tokens(&mut self) -> LineTokens<'_> {
        LineTokens {
            scanner: self,
            done: false,
        }
    }

    /// Supply `text` and collect all of its tokens
    pub fn scan_line(&mut self, text: &str) -> Vec<Token> {
        self.supply_line(text);
        self.line_tokens().collect()
    }

    /// All diagnostics recorded so far, oldest first
    pub fn diagnostics(&self) -> &[LexError] {
        &self.diagnostics
    }

    /// Diagnostics rendered as `"<line>:<column>: syntax error: <message>"`
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn mode(&self) -> &ScanMode {
        &self.mode
    }

    /// Number of the line currently being scanned (0 before the first line)
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Tokenize in normal mode by running the logos lexer over the rest of
    /// the line. `None` means input was consumed without producing a token
    /// (the opening of a block comment or backtick string) and the caller has
    /// to dispatch on the mode again.
    fn scan_normal(&mut self) -> Option<Token> {
        let (result, span) = {
            let mut lex = RawToken::lexer(&self.input[self.position..]);
            let result = lex.next();
            (result, lex.span())
        };
        let Some(result) = result else {
            self.position = self.input.len();
            return Some(self.end_of_line());
        };

        let start = self.position + span.start;
        let end = self.position + span.end;
        let column = start + 1;

        let raw = match result {
            Ok(raw) => raw,
            Err(()) => {
                // Unrecognized input is reported one character at a time
                let width = self.input[start..].chars().next().map_or(1, char::len_utf8);
                self.position = start + width;
                return Some(self.illegal(start, self.position));
            }
        };
        self.position = end;

        match raw {
            RawToken::BlockComment => {
                self.mode = ScanMode::InMultiLineComment {
                    line: self.line,
                    column,
                };
                None
            }
            RawToken::Backtick => {
                self.mode = ScanMode::InMultiLineString {
                    value: String::new(),
                    line: self.line,
                    column,
                };
                None
            }
            RawToken::String => Some(Token::new(
                TokenKind::String,
                &self.input[start + 1..end - 1],
                self.line,
                column,
            )),
            RawToken::UnclosedString => {
                self.diagnostics.push(LexError::UnclosedString {
                    line: self.line,
                    column,
                });
                Some(Token::new(
                    TokenKind::Illegal,
                    &self.input[start + 1..end],
                    self.line,
                    column,
                ))
            }
            RawToken::KnownIllegal => Some(self.illegal(start, end)),
            other => {
                let kind = other.kind()?;
                Some(Token::new(kind, &self.input[start..end], self.line, column))
            }
        }
    }

    /// ILLEGAL token over `start..end` plus its diagnostic
    fn illegal(&mut self, start: usize, end: usize) -> Token {
        let literal = self.input[start..end].to_string();
        self.diagnostics.push(LexError::UnexpectedLiteral {
            literal: literal.clone(),
            line: self.line,
            column: start + 1,
        });
        Token::new(TokenKind::Illegal, literal, self.line, start + 1)
    }

    /// Read the rest of a backtick string on the current line
    fn resume_string(&mut self, mut value: String, line: usize, column: usize) -> Token {
        let chunk = self.read_while(|c| c != b'`');
        value.push_str(&chunk);

        if self.current() == Some(b'`') {
            self.position += 1;
            let token = Token::new(TokenKind::String, value, line, column);
            trace!("{}:{} {}", token.line, token.column, token);
            return token;
        }

        value.push('\n');
        self.mode = ScanMode::InMultiLineString {
            value,
            line,
            column,
        };
        self.end_of_line()
    }

    /// Advance past the closing `*/`; false if the line ends first
    fn skip_block_comment(&mut self) -> bool {
        while let Some(ch) = self.current() {
            if ch == b'*' && self.peek() == Some(b'/') {
                self.position += 2;
                return true;
            }
            self.position += 1;
        }
        false
    }

    fn read_while(&mut self, pred: impl Fn(u8) -> bool) -> String {
        let start = self.position;
        while self.current().is_some_and(&pred) {
            self.position += 1;
        }
        self.slice(start, self.position)
    }

    fn end_of_line(&self) -> Token {
        Token::new(TokenKind::Eol, "", self.line, self.input.len() + 1)
    }

    fn current(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position + 1).copied()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.input.as_bytes()[start..end]).into_owned()
    }
}

/// Tokens of a single line, ending before the `EOL` marker
pub struct LineTokens<'a> {
    scanner: &'a mut Scanner,
    done: bool,
}

impl Iterator for LineTokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let token = self.scanner.next_token();
        if token.is_line_end() {
            self.done = true;
            return None;
        }
        Some(token)
    }
}
