//! Metsu compiler facade.
//!
//! [`compile`] composes the four pipeline stages — lex, parse, transform,
//! emit — and propagates the first error any stage raises. [`run`] wraps
//! `compile` with a `wasmi`-backed host: it wires the caller's `print`
//! callback and a fresh linear memory, instantiates the module, and hands
//! back a consume-once [`Runner`] for the exported entry.

mod runtime;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use metsu_codegen::EmitError;
pub use metsu_lexer::LexError;
pub use metsu_parser::ParserError;
pub use metsu_transform::TransformError;

pub use runtime::{run, Imports, RunError, Runner};

/// Any pipeline stage's failure. Compilation is fail-fast: the first error
/// aborts the whole pipeline and no partial module is produced.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParserError),
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),
}

/// Compile source text into a binary module.
///
/// Deterministic and side-effect-free: the same source always produces the
/// same bytes or the same error.
pub fn compile(source: &str) -> Result<Vec<u8>, CompileError> {
    let tokens = metsu_lexer::tokenize(source)?;
    let program = metsu_parser::parse(tokens)?;
    let transformed = metsu_transform::transform(program)?;
    let module = metsu_codegen::emit(&transformed)?;
    Ok(module)
}
