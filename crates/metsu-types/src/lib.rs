//! Shared types for the metsu compiler.
//!
//! This crate defines the AST node types, binary operators, and the value
//! types of the target instruction set, used across all compiler stages.

pub mod ast;

pub use ast::{BinOp, Expr, Program, Stmt, ValueType};
