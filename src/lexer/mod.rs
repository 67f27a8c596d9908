//! Lexical analysis module for the Re language.
//!
//! Source text is tokenized one line at a time by [`Scanner`]. Backtick
//! strings and `/* */` comments may span lines; the scanner carries their
//! partial state between lines and reports anything left open when the input
//! ends. Lexical errors never stop scanning: each one yields an `ILLEGAL`
//! token and a diagnostic.

mod scanner;
mod token;
mod tokenizer;

pub use scanner::{LineTokens, ScanMode, Scanner};
pub use token::{lookup_ident, Token, TokenKind};
pub use tokenizer::{format_tokens, tokenize, TokenizedSource};
