//! Re Language Tokenizer Library
//!
//! This library provides the line-buffered lexer for the Re scripting
//! language together with the plumbing to tokenize files and dump tokens.

pub mod driver;
pub mod emitter;
pub mod error;
pub mod lexer;

// Re-export commonly used types
pub use driver::{SourceState, TokenizePipeline};
pub use emitter::OutputFormat;
pub use error::{ErrorCollector, LexError, ReLangError, ReLangResult};
pub use lexer::{tokenize, ScanMode, Scanner, Token, TokenKind};
