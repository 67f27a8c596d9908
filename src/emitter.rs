//! Token stream serialization

use crate::error::ReLangResult;
use crate::lexer::Token;
use clap::ValueEnum;
use std::io::Write;

/// Output format for token dumps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `"<lexeme>": type: <TYPE>` entry per token
    #[default]
    #[value(name = "yaml")]
    Yaml,
    /// Pretty JSON array of token objects
    #[value(name = "json")]
    Json,
}

pub fn emit<W: Write>(tokens: &[Token], format: OutputFormat, writer: &mut W) -> ReLangResult<()> {
    match format {
        OutputFormat::Yaml => write_yaml(tokens, writer),
        OutputFormat::Json => write_json(tokens, writer),
    }
}

/// Write tokens as YAML-style entries
///
/// ```text
/// "var":
///   type: VAR
/// ```
pub fn write_yaml<W: Write>(tokens: &[Token], writer: &mut W) -> ReLangResult<()> {
    for token in tokens {
        write!(
            writer,
            "\"{}\":\n  type: {}\n",
            escape_lexeme(&token.lexeme),
            token.kind
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(tokens: &[Token], writer: &mut W) -> ReLangResult<()> {
    serde_json::to_writer_pretty(&mut *writer, tokens)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn escape_lexeme(lexeme: &str) -> String {
    let mut escaped = String::with_capacity(lexeme.len());
    for ch in lexeme.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn test_yaml_output() {
        let tokens = vec![
            Token::new(TokenKind::Var, "var", 1, 1),
            Token::new(TokenKind::String, "a\n\"b\"", 1, 5),
        ];
        let mut out = Vec::new();
        write_yaml(&tokens, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"var\":\n  type: VAR\n\"a\\n\\\"b\\\"\":\n  type: STRING\n"
        );
    }

    #[test]
    fn test_json_output() {
        let tokens = vec![Token::new(TokenKind::LtEq, "<=", 2, 3)];
        let mut out = Vec::new();
        emit(&tokens, OutputFormat::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["kind"], "<=");
        assert_eq!(value[0]["lexeme"], "<=");
        assert_eq!(value[0]["line"], 2);
        assert_eq!(value[0]["column"], 3);
    }
}
