//! AST node types for the metsu language.
//!
//! Expressions and statements are closed sum types, matched exhaustively by
//! every consumer. Recursive positions are boxed to keep enum sizes
//! reasonable. Nodes are immutable once built: the transformer regroups
//! statements into procedures but never rewrites a node in place.

use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Value types
// ══════════════════════════════════════════════════════════════════════════════

/// A static value type of the target instruction set.
///
/// Every variable, parameter, and expression resolves to exactly one of
/// these; the target has no dynamic typing and no implicit widening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// 32-bit signed integer (`int`).
    Int,
    /// 32-bit IEEE-754 float (`float`).
    Float,
}

impl ValueType {
    /// Look up a declared type name. Returns `None` for anything that is
    /// not a type-name lexeme.
    pub fn from_type_name(s: &str) -> Option<ValueType> {
        match s {
            "int" => Some(ValueType::Int),
            "float" => Some(ValueType::Float),
            _ => None,
        }
    }

    /// The source-level type name.
    pub fn type_name(self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

/// A binary operator. Every binary expression in the grammar is fully
/// parenthesized, so operators carry no precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinOp {
    /// Look up an operator lexeme. Returns `None` for lexemes outside the
    /// recognized operator set (including `,`, which lexes as an operator
    /// token but never appears in expression position).
    pub fn from_lexeme(s: &str) -> Option<BinOp> {
        Some(match s {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Rem,
            "==" => BinOp::Eq,
            "!=" => BinOp::Ne,
            "<" => BinOp::Lt,
            ">" => BinOp::Gt,
            "<=" => BinOp::Le,
            ">=" => BinOp::Ge,
            "&&" => BinOp::And,
            "||" => BinOp::Or,
            _ => return None,
        })
    }

    /// The operator's source lexeme.
    pub fn lexeme(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    /// Comparison operators produce an i32 truth value whatever their
    /// operand type.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge
        )
    }

    /// `&&` and `||` — operate on i32 truth values only.
    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexeme())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal: `8`, `-2`, `.5`, `23e02`.
    Number(f64),
    /// A bare variable read.
    Identifier(String),
    /// `( left op right )` — parenthesization is mandatory in the grammar.
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `print expr`
    Print { expr: Expr },
    /// `int name = expr` / `float name = expr`
    VarDecl {
        name: String,
        ty: ValueType,
        initializer: Expr,
    },
    /// `name = expr` (name must already be declared)
    Assign { name: String, value: Expr },
    /// `if cond { ... } else { ... }` — the alternate may be empty.
    If {
        condition: Expr,
        consequent: Vec<Stmt>,
        alternate: Vec<Stmt>,
    },
    /// `while cond { ... }`
    While { condition: Expr, body: Vec<Stmt> },
    /// `proc name(params) { ... }` — top level only.
    Proc {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    /// `name(args)`
    Call { name: String, args: Vec<Expr> },
    /// `return expr`
    Return { value: Expr },
}

/// A complete program: the ordered top-level statement list.
pub type Program = Vec<Stmt>;

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════
