//! Metsu lexer: converts source text to a token stream.

pub mod lexer;
pub mod token;

pub use lexer::{tokenize, LexError};
pub use token::{Token, TokenKind, KEYWORDS, TYPE_NAMES};
