//! Core metsu lexer.
//!
//! A fixed-priority table of patterns is tried at each byte position and
//! the first match wins. Ordering matters twice over: the number pattern
//! precedes the operator pattern so `-2` lexes as one literal, and the
//! keyword/type-name patterns precede the identifier pattern so `print`
//! and `int` are not swallowed as plain identifiers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::token::{Token, TokenKind, KEYWORDS, TYPE_NAMES};

/// Error raised when no pattern matches at the current position.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("unexpected character '{character}' at {line}:{column} (byte {offset})")]
pub struct LexError {
    /// The offending character.
    pub character: char,
    /// Byte offset into the source.
    pub offset: usize,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

/// One entry in the matcher table.
struct Pattern {
    /// Token kind to emit, or `None` for matched-and-dropped text.
    kind: Option<TokenKind>,
    regex: Regex,
    /// Reserved-word patterns must not match a prefix of a longer
    /// identifier (`printer`, `interval`). The `regex` crate has no
    /// lookahead, so the boundary is checked by hand after the match.
    word_boundary: bool,
}

/// The metsu lexer.
struct Lexer<'src> {
    source: &'src str,
    patterns: Vec<Pattern>,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        let pattern = |kind: Option<TokenKind>, re: &str, word_boundary: bool| Pattern {
            kind,
            regex: Regex::new(re).expect("lexer pattern must compile"),
            word_boundary,
        };

        // Priority order. Whitespace first (dropped), number before the
        // operator table so a leading minus belongs to the literal, reserved
        // words before the identifier catch-all, `==` before `=` inside the
        // operator alternation itself.
        let patterns = vec![
            pattern(None, r"^\s+", false),
            pattern(
                Some(TokenKind::Number),
                r"^-?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE]-?[0-9]+)?",
                false,
            ),
            pattern(
                Some(TokenKind::Keyword),
                &format!("^(?:{})", KEYWORDS.join("|")),
                true,
            ),
            pattern(
                Some(TokenKind::TypeName),
                &format!("^(?:{})", TYPE_NAMES.join("|")),
                true,
            ),
            pattern(
                Some(TokenKind::Operator),
                r"^(?:&&|\|\||==|!=|<=|>=|[-+*/%<>,])",
                false,
            ),
            pattern(Some(TokenKind::Assignment), r"^=", false),
            pattern(Some(TokenKind::OpenParen), r"^\(", false),
            pattern(Some(TokenKind::CloseParen), r"^\)", false),
            pattern(Some(TokenKind::OpenBrace), r"^\{", false),
            pattern(Some(TokenKind::CloseBrace), r"^\}", false),
            pattern(
                Some(TokenKind::Identifier),
                r"^[A-Za-z_][A-Za-z0-9_]*",
                false,
            ),
        ];

        Self {
            source,
            patterns,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Try every pattern at the current position, first match wins.
    /// Returns the kind (or `None` for dropped text) and the matched lexeme.
    fn match_at(&self, rest: &'src str) -> Option<(Option<TokenKind>, &'src str)> {
        for pattern in &self.patterns {
            let Some(found) = pattern.regex.find(rest) else {
                continue;
            };
            if pattern.word_boundary {
                let follows_word = rest[found.end()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
                if follows_word {
                    continue;
                }
            }
            return Some((pattern.kind, found.as_str()));
        }
        None
    }

    /// Advance position and line/column bookkeeping past `lexeme`.
    fn advance_over(&mut self, lexeme: &str) {
        self.pos += lexeme.len();
        for ch in lexeme.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let source = self.source;
        let mut tokens = Vec::new();

        while self.pos < source.len() {
            let rest = &source[self.pos..];
            match self.match_at(rest) {
                Some((kind, lexeme)) => {
                    if let Some(kind) = kind {
                        tokens.push(Token::new(kind, lexeme, self.line, self.column));
                    }
                    self.advance_over(lexeme);
                }
                None => {
                    return Err(LexError {
                        character: rest.chars().next().unwrap_or('\0'),
                        offset: self.pos,
                        line: self.line,
                        column: self.column,
                    });
                }
            }
        }

        Ok(tokens)
    }
}

/// Lex source text into an ordered token stream.
///
/// Whitespace is matched and dropped, never emitted. Fails with a
/// [`LexError`] carrying the offending character and its position when no
/// pattern matches.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}
