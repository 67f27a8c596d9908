//! Token definitions

use logos::Logos;
use serde::{Serialize, Serializer};
use std::fmt;

/// Token kinds of the Re language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Special
    Illegal,
    Eof,
    Eol,

    // Identifiers and literals
    Ident,
    Int,
    String,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Mod,
    Lt,
    Gt,
    Eq,
    NotEq,
    LtEq,
    GtEq,
    And,
    Or,

    // Delimiters
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Package,
    Function,
    Var,
    True,
    False,
    If,
    Else,
    Return,
    Loop,
    Nil,
}

impl TokenKind {
    /// Canonical type name used by every output format
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Eol => "EOL",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::String => "STRING",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Mod => "%",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Package => "PACKAGE",
            TokenKind::Function => "FUNCTION",
            TokenKind::Var => "VAR",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
            TokenKind::Loop => "LOOP",
            TokenKind::Nil => "NIL",
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Package
                | TokenKind::Function
                | TokenKind::Var
                | TokenKind::True
                | TokenKind::False
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Return
                | TokenKind::Loop
                | TokenKind::Nil
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Normal-mode lexemes of a single line
///
/// `BlockComment` and `Backtick` only open a construct; the scanner takes
/// over from there because those may continue on later lines.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+|//[^\n]*")] // Whitespace and line comments
pub(crate) enum RawToken {
    // Keywords
    #[token("package")]
    Package,
    #[token("fn")]
    Function,
    #[token("var")]
    Var,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("return")]
    Return,
    #[token("for")]
    Loop,
    #[token("nil")]
    Nil,

    // Identifiers have no digits (must come after keywords)
    #[regex(r"[a-zA-Z_]+", priority = 1)]
    Ident,

    #[regex(r"[0-9]+")]
    Int,

    // Inline strings never leave their line
    #[regex(r#""[^"\n]*""#)]
    String,
    #[regex(r#""[^"\n]*"#)]
    UnclosedString,

    // `#` swallows everything up to whitespace or `;`
    #[regex(r"#[^ \t\r\n;]*")]
    KnownIllegal,

    #[token("/*")]
    BlockComment,
    #[token("`")]
    Backtick,

    // Operators
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("!")]
    Bang,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("%")]
    Mod,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    And,
    #[token("||")]
    Or,

    // Delimiters
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
}

impl RawToken {
    /// Kind of the emitted token. Lexemes that open a multi-line construct
    /// have none.
    pub(crate) fn kind(self) -> Option<TokenKind> {
        let kind = match self {
            RawToken::Package => TokenKind::Package,
            RawToken::Function => TokenKind::Function,
            RawToken::Var => TokenKind::Var,
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,
            RawToken::If => TokenKind::If,
            RawToken::Else => TokenKind::Else,
            RawToken::Return => TokenKind::Return,
            RawToken::Loop => TokenKind::Loop,
            RawToken::Nil => TokenKind::Nil,
            RawToken::Ident => TokenKind::Ident,
            RawToken::Int => TokenKind::Int,
            RawToken::String => TokenKind::String,
            RawToken::UnclosedString | RawToken::KnownIllegal => TokenKind::Illegal,
            RawToken::BlockComment | RawToken::Backtick => return None,
            RawToken::Assign => TokenKind::Assign,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Asterisk => TokenKind::Asterisk,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Mod => TokenKind::Mod,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Eq => TokenKind::Eq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::And => TokenKind::And,
            RawToken::Or => TokenKind::Or,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
        };
        Some(kind)
    }
}

/// Resolve an identifier against the keyword table
pub fn lookup_ident(ident: &str) -> TokenKind {
    let mut lex = RawToken::lexer(ident);
    let first = lex.next();
    let whole = lex.span() == (0..ident.len());
    match (first, lex.next()) {
        (Some(Ok(raw)), None) if whole => match raw.kind() {
            Some(kind) if kind.is_keyword() => kind,
            _ => TokenKind::Ident,
        },
        _ => TokenKind::Ident,
    }
}

/// A token with its position information
///
/// `line` and `column` are both 1-based and point at the first character of
/// the lexeme (the opening delimiter for strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    /// True for the markers that tell the caller to stop pulling tokens
    pub fn is_line_end(&self) -> bool {
        matches!(self.kind, TokenKind::Eol | TokenKind::Eof)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind, self.lexeme)
    }
}
