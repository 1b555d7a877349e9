//! Metsu transformer: AST to normalized procedure list.
//!
//! Flattens top-level statements into a synthetic entry procedure, builds a
//! per-procedure symbol table (slot index and static type for every local),
//! and validates the program before code generation: procedure names are
//! unique, every identifier resolves, every call site's arity matches.

mod symbols;
mod transformer;

pub use symbols::{LocalSlot, SymbolTable};
pub use transformer::{transform, Procedure, TransformError, TransformedProgram, ENTRY_NAME};
