//! Metsu parser: token stream to AST.
//!
//! Recursive descent with exactly one token of lookahead and no
//! backtracking. Binary expressions are always parenthesized in the
//! grammar, so there is no precedence climbing anywhere.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::{parse, Parser, ParserError};
