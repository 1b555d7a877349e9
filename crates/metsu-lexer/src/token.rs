//! Token types for the metsu lexer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The reserved statement keywords.
pub const KEYWORDS: &[&str] = &["print", "if", "else", "while", "proc", "return"];

/// The declared type names.
pub const TYPE_NAMES: &[&str] = &["int", "float"];

/// What class of lexeme a token holds.
///
/// The lexeme text itself lives on [`Token`]; kinds are deliberately
/// payload-free so the parser can dispatch on kind and compare lexemes
/// by value, the way the grammar is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// Numeric literal: `8`, `-2`, `.5`, `23e02`.
    Number,
    /// Statement keyword: `print`, `if`, `else`, `while`, `proc`, `return`.
    Keyword,
    /// Declared type name: `int`, `float`.
    TypeName,
    /// Operator lexeme, including the list separator `,`.
    Operator,
    /// User identifier.
    Identifier,
    /// `=`
    Assignment,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::Keyword => "keyword",
            TokenKind::TypeName => "type name",
            TokenKind::Operator => "operator",
            TokenKind::Identifier => "identifier",
            TokenKind::Assignment => "assignment",
            TokenKind::OpenParen => "open paren",
            TokenKind::CloseParen => "close paren",
            TokenKind::OpenBrace => "open brace",
            TokenKind::CloseBrace => "close brace",
        };
        f.write_str(name)
    }
}

/// A single token: kind, source lexeme, and 1-based position.
///
/// Produced once by the lexer, consumed once by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    /// Returns `true` if this token is the given keyword.
    pub fn is_keyword(&self, name: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == name
    }

    /// Returns `true` if this token's lexeme equals `value`.
    pub fn has_lexeme(&self, value: &str) -> bool {
        self.lexeme == value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' ({}) at {}:{}", self.lexeme, self.kind, self.line, self.column)
    }
}
