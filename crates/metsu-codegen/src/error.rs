//! Code generation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A code generation failure. Either one aborts emission for the whole
/// program; there is no per-statement recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EmitError {
    /// Resolved static types disagree where one type is required.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// A call site's callee is not among the transformed procedures.
    #[error("call to unknown procedure '{0}'")]
    UnknownProcedure(String),
}

impl EmitError {
    pub(crate) fn mismatch(detail: impl Into<String>) -> Self {
        EmitError::TypeMismatch(detail.into())
    }
}
