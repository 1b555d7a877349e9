//! Statement parsing.

use metsu_lexer::TokenKind;
use metsu_types::{Stmt, ValueType};

use crate::parser::{Parser, ParserError};

impl Parser {
    /// Parse a single statement, dispatching on the current token.
    ///
    /// `top_level` is `true` only for statements directly in the program;
    /// `proc` declarations are rejected anywhere else.
    pub(crate) fn parse_statement(&mut self, top_level: bool) -> Result<Stmt, ParserError> {
        let token = self.current()?.clone();
        match token.kind {
            TokenKind::Keyword => match token.lexeme.as_str() {
                "print" => self.parse_print(),
                "if" => self.parse_if(),
                "while" => self.parse_while(),
                "return" => self.parse_return(),
                "proc" if top_level => self.parse_proc(),
                "proc" => Err(ParserError::new(
                    "procedures may only be declared at the top level",
                    Some(token),
                )),
                other => Err(ParserError::new(
                    format!("unknown keyword '{other}'"),
                    Some(token),
                )),
            },
            TokenKind::TypeName => self.parse_var_decl(),
            TokenKind::Identifier => {
                if self.next_is_assignment() {
                    self.parse_assignment()
                } else {
                    self.parse_call()
                }
            }
            _ => Err(ParserError::new(
                format!("token cannot start a statement: {token}"),
                Some(token),
            )),
        }
    }

    /// `{ statements... }` — parse until the matching close brace.
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParserError> {
        self.expect_lexeme("{")?;
        let mut stmts = Vec::new();
        while !self.current_is(TokenKind::CloseBrace) {
            stmts.push(self.parse_statement(false)?);
        }
        self.expect_lexeme("}")?;
        Ok(stmts)
    }

    /// A parenthesized, comma-separated list. Shared by call arguments and
    /// procedure parameters.
    fn parse_comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParserError>,
    ) -> Result<Vec<T>, ParserError> {
        self.expect_lexeme("(")?;
        let mut items = Vec::new();
        while !self.current_is(TokenKind::CloseParen) {
            items.push(item(self)?);
            if !self.current_is(TokenKind::CloseParen) {
                self.expect_lexeme(",")?;
            }
        }
        self.expect_lexeme(")")?;
        Ok(items)
    }

    /// `print expr`
    fn parse_print(&mut self) -> Result<Stmt, ParserError> {
        self.expect_lexeme("print")?;
        let expr = self.parse_expression()?;
        Ok(Stmt::Print { expr })
    }

    /// `int name = expr` / `float name = expr`
    fn parse_var_decl(&mut self) -> Result<Stmt, ParserError> {
        let type_token = self.expect_kind(TokenKind::TypeName)?;
        let ty = ValueType::from_type_name(&type_token.lexeme).ok_or_else(|| {
            ParserError::new(
                format!("'{}' is not a type name", type_token.lexeme),
                Some(type_token.clone()),
            )
        })?;
        let name = self.expect_kind(TokenKind::Identifier)?.lexeme;
        self.expect_lexeme("=")?;
        let initializer = self.parse_expression()?;
        Ok(Stmt::VarDecl {
            name,
            ty,
            initializer,
        })
    }

    /// `name = expr`
    fn parse_assignment(&mut self) -> Result<Stmt, ParserError> {
        let name = self.expect_kind(TokenKind::Identifier)?.lexeme;
        self.expect_lexeme("=")?;
        let value = self.parse_expression()?;
        Ok(Stmt::Assign { name, value })
    }

    /// `if cond { ... }` with an optional `else { ... }`.
    /// Both branches parse statement lists to their closing brace.
    fn parse_if(&mut self) -> Result<Stmt, ParserError> {
        self.expect_lexeme("if")?;
        let condition = self.parse_expression()?;
        let consequent = self.parse_block()?;
        let alternate = if self.current_is_keyword("else") {
            self.expect_lexeme("else")?;
            self.parse_block()?
        } else {
            Vec::new()
        };
        Ok(Stmt::If {
            condition,
            consequent,
            alternate,
        })
    }

    /// `while cond { ... }`
    fn parse_while(&mut self) -> Result<Stmt, ParserError> {
        self.expect_lexeme("while")?;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Stmt::While { condition, body })
    }

    /// `proc name(params) { ... }`
    fn parse_proc(&mut self) -> Result<Stmt, ParserError> {
        self.expect_lexeme("proc")?;
        let name = self.expect_kind(TokenKind::Identifier)?.lexeme;
        let params =
            self.parse_comma_separated(|p| Ok(p.expect_kind(TokenKind::Identifier)?.lexeme))?;
        let body = self.parse_block()?;
        Ok(Stmt::Proc { name, params, body })
    }

    /// `name(args)`
    fn parse_call(&mut self) -> Result<Stmt, ParserError> {
        let name = self.expect_kind(TokenKind::Identifier)?.lexeme;
        let args = self.parse_comma_separated(Self::parse_expression)?;
        Ok(Stmt::Call { name, args })
    }

    /// `return expr`
    fn parse_return(&mut self) -> Result<Stmt, ParserError> {
        self.expect_lexeme("return")?;
        let value = self.parse_expression()?;
        Ok(Stmt::Return { value })
    }
}
