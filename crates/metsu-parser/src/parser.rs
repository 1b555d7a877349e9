//! Core parser infrastructure: token cursor, error type, entry point.

use metsu_lexer::{Token, TokenKind};
use metsu_types::Program;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A parse failure: a message plus the offending token, if any.
///
/// `token` is `None` only when the stream ended where more input was
/// required.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}{}", fmt_token(.token))]
pub struct ParserError {
    pub message: String,
    pub token: Option<Token>,
}

fn fmt_token(token: &Option<Token>) -> String {
    match token {
        Some(token) => format!(": {token}"),
        None => String::new(),
    }
}

impl ParserError {
    pub fn new(message: impl Into<String>, token: Option<Token>) -> Self {
        Self {
            message: message.into(),
            token,
        }
    }

    pub fn end_of_input() -> Self {
        Self::new("unexpected end of input", None)
    }
}

/// The metsu parser.
///
/// Holds the current token and one token of lookahead over a consuming
/// iterator; nothing is ever pushed back.
pub struct Parser {
    tokens: std::vec::IntoIter<Token>,
    current: Option<Token>,
    next: Option<Token>,
}

impl Parser {
    /// Create a parser over a token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens.into_iter();
        let current = tokens.next();
        let next = tokens.next();
        Self {
            tokens,
            current,
            next,
        }
    }

    // ── Token cursor ──────────────────────────────────────────────────────

    /// The current token, or an end-of-input error.
    pub(crate) fn current(&self) -> Result<&Token, ParserError> {
        self.current.as_ref().ok_or_else(ParserError::end_of_input)
    }

    /// The current token's kind, if any.
    pub(crate) fn current_kind(&self) -> Option<TokenKind> {
        self.current.as_ref().map(|t| t.kind)
    }

    /// Returns `true` if the current token has the given kind.
    pub(crate) fn current_is(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    /// Returns `true` if the current token is the given keyword.
    pub(crate) fn current_is_keyword(&self, name: &str) -> bool {
        self.current.as_ref().is_some_and(|t| t.is_keyword(name))
    }

    /// Returns `true` if the lookahead token is an assignment (`=`).
    /// Distinguishes `f = ...` from a call statement `f(...)`.
    pub(crate) fn next_is_assignment(&self) -> bool {
        self.next
            .as_ref()
            .is_some_and(|t| t.kind == TokenKind::Assignment)
    }

    /// Consume and return the current token, shifting the lookahead.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let consumed = self.current.take();
        self.current = self.next.take();
        self.next = self.tokens.next();
        consumed
    }

    /// Consume the current token, or fail at end of input.
    pub(crate) fn take_current(&mut self) -> Result<Token, ParserError> {
        self.advance().ok_or_else(ParserError::end_of_input)
    }

    // ── Expect helpers ────────────────────────────────────────────────────

    /// Consume a token whose lexeme must equal `value`.
    pub(crate) fn expect_lexeme(&mut self, value: &str) -> Result<Token, ParserError> {
        let token = self.take_current()?;
        if !token.has_lexeme(value) {
            return Err(ParserError::new(
                format!(
                    "unexpected token value, expected '{value}', got '{}'",
                    token.lexeme
                ),
                Some(token),
            ));
        }
        Ok(token)
    }

    /// Consume a token that must have the given kind.
    pub(crate) fn expect_kind(&mut self, kind: TokenKind) -> Result<Token, ParserError> {
        let token = self.take_current()?;
        if token.kind != kind {
            return Err(ParserError::new(
                format!("expected {kind}, got {}", token.kind),
                Some(token),
            ));
        }
        Ok(token)
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Parse the whole token stream into a program.
    pub fn parse(mut self) -> Result<Program, ParserError> {
        let mut nodes = Vec::new();
        while self.current.is_some() {
            nodes.push(self.parse_statement(true)?);
        }
        Ok(nodes)
    }
}

/// Parse a token stream into a program AST.
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParserError> {
    Parser::new(tokens).parse()
}
