//! Expression parsing.
//!
//! The expression grammar has three forms only: a number literal, a bare
//! identifier, or a fully parenthesized binary form `( expr op expr )`.
//! Mandatory parenthesization keeps the grammar single-lookahead.

use metsu_lexer::TokenKind;
use metsu_types::{BinOp, Expr};

use crate::parser::{Parser, ParserError};

impl Parser {
    /// Parse one expression.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParserError> {
        let kind = self.current()?.kind;
        match kind {
            TokenKind::Number => {
                let token = self.take_current()?;
                let value: f64 = token.lexeme.parse().map_err(|_| {
                    ParserError::new(
                        format!("invalid number literal '{}'", token.lexeme),
                        Some(token.clone()),
                    )
                })?;
                Ok(Expr::Number(value))
            }
            TokenKind::Identifier => {
                let token = self.take_current()?;
                Ok(Expr::Identifier(token.lexeme))
            }
            TokenKind::OpenParen => self.parse_binary(),
            _ => {
                let token = self.take_current()?;
                Err(ParserError::new(
                    format!("unexpected token type {kind} in expression"),
                    Some(token),
                ))
            }
        }
    }

    /// Parse `( left op right )` — the open paren is still current.
    fn parse_binary(&mut self) -> Result<Expr, ParserError> {
        self.expect_lexeme("(")?;
        let left = self.parse_expression()?;
        let op_token = self.take_current()?;
        let op = BinOp::from_lexeme(&op_token.lexeme).ok_or_else(|| {
            ParserError::new(
                format!("'{}' is not a valid operator", op_token.lexeme),
                Some(op_token.clone()),
            )
        })?;
        let right = self.parse_expression()?;
        self.expect_lexeme(")")?;
        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}
