//! Metsu code generator: transformed AST to a WebAssembly binary module.
//!
//! The module is hand-encoded: magic/version header, then type, import,
//! function, export, and code sections, each framed as an id byte plus a
//! LEB128 payload length. No encoder crate is involved; the three encoding
//! helpers in [`encoding`] produce every multi-byte field.

pub mod encoding;
pub mod opcodes;

mod emitter;
mod error;
mod expr;
mod stmt;

pub use emitter::{emit, ENTRY_EXPORT, IMPORT_MODULE, MEMORY_IMPORT, PRINT_IMPORT};
pub use error::EmitError;
