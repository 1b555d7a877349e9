//! Module assembly: header, sections, and per-procedure code bodies.

use std::collections::HashMap;

use metsu_transform::{Procedure, SymbolTable, TransformedProgram, ENTRY_NAME};
use metsu_types::{Stmt, ValueType};

use crate::encoding::unsigned_leb128;
use crate::error::EmitError;
use crate::expr::expr_type;
use crate::opcodes::*;
use crate::stmt::emit_body;

/// Module field both imports live under.
pub const IMPORT_MODULE: &str = "env";
/// Name of the imported print function.
pub const PRINT_IMPORT: &str = "print";
/// Name of the imported linear memory.
pub const MEMORY_IMPORT: &str = "memory";
/// Export name of the entry procedure.
pub const ENTRY_EXPORT: &str = "run";

/// The print import precedes all defined functions in the index space.
pub(crate) const PRINT_FUNC_INDEX: u32 = 0;

const MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6d];
const VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

/// A deduplicated function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Signature {
    params: Vec<ValueType>,
    result: Option<ValueType>,
}

/// A resolved callee: function index and result arity.
pub(crate) struct ProcRef {
    pub index: u32,
    pub result: Option<ValueType>,
}

/// Everything statement/expression emission needs to resolve names.
pub(crate) struct Context<'a> {
    pub locals: &'a SymbolTable,
    pub procs: &'a HashMap<String, ProcRef>,
}

/// Serialize a transformed program into one binary module.
///
/// Section order is format-mandated: type, import, function, export, code.
/// Output is deterministic: the same program always yields the same bytes.
pub fn emit(program: &TransformedProgram) -> Result<Vec<u8>, EmitError> {
    // Signature table. The print import's signature is interned first and
    // participates in deduplication like any other.
    let mut signatures = vec![Signature {
        params: vec![ValueType::Float],
        result: None,
    }];
    let mut proc_type_indices = Vec::with_capacity(program.procs.len());
    let mut procs = HashMap::new();
    for (position, proc) in program.procs.iter().enumerate() {
        let result = infer_result(proc)?;
        if result.is_some() {
            // A function with a result type must leave a value on every
            // path; the entry is invoked for its prints alone.
            if proc.name == ENTRY_NAME {
                return Err(EmitError::mismatch(format!(
                    "'{ENTRY_NAME}' cannot return a value"
                )));
            }
            if !always_returns(&proc.body) {
                return Err(EmitError::mismatch(format!(
                    "'{}' does not return on every path",
                    proc.name
                )));
            }
        }
        let signature = Signature {
            params: vec![ValueType::Int; proc.params.len()],
            result,
        };
        proc_type_indices.push(intern(&mut signatures, signature));
        procs.insert(
            proc.name.clone(),
            ProcRef {
                index: PRINT_FUNC_INDEX + 1 + position as u32,
                result,
            },
        );
    }

    let entry_index = program
        .index_of(ENTRY_NAME)
        .ok_or_else(|| EmitError::UnknownProcedure(ENTRY_NAME.to_string()))?;

    let mut module = Vec::new();
    module.extend(MAGIC);
    module.extend(VERSION);
    push_section(&mut module, SECTION_TYPE, type_payload(&signatures));
    push_section(&mut module, SECTION_IMPORT, import_payload());
    push_section(&mut module, SECTION_FUNCTION, function_payload(&proc_type_indices));
    push_section(
        &mut module,
        SECTION_EXPORT,
        export_payload(PRINT_FUNC_INDEX + 1 + entry_index as u32),
    );
    push_section(&mut module, SECTION_CODE, code_payload(program, &procs)?);
    Ok(module)
}

// ── Result inference ──────────────────────────────────────────────────────

/// A procedure that contains a `return` gets a single result type; all its
/// `return` expressions must resolve to the same one.
fn infer_result(proc: &Procedure) -> Result<Option<ValueType>, EmitError> {
    let mut result = None;
    scan_returns(&proc.body, proc, &mut result)?;
    Ok(result)
}

fn scan_returns(
    body: &[Stmt],
    proc: &Procedure,
    result: &mut Option<ValueType>,
) -> Result<(), EmitError> {
    for stmt in body {
        match stmt {
            Stmt::Return { value } => {
                let ty = expr_type(value, &proc.locals)?;
                match *result {
                    Some(prev) if prev != ty => {
                        return Err(EmitError::mismatch(format!(
                            "'{}' returns both {prev} and {ty}",
                            proc.name
                        )));
                    }
                    _ => *result = Some(ty),
                }
            }
            Stmt::If {
                consequent,
                alternate,
                ..
            } => {
                scan_returns(consequent, proc, result)?;
                scan_returns(alternate, proc, result)?;
            }
            Stmt::While { body, .. } => scan_returns(body, proc, result)?,
            _ => {}
        }
    }
    Ok(())
}

/// Whether every control path through `body` reaches a `return`.
///
/// Sequential statements: one unconditional return suffices. An `if` only
/// guarantees a return when both branches exist and both guarantee one. A
/// `while` never does; its condition may be false on entry.
fn always_returns(body: &[Stmt]) -> bool {
    body.iter().any(|stmt| match stmt {
        Stmt::Return { .. } => true,
        Stmt::If {
            consequent,
            alternate,
            ..
        } => !alternate.is_empty() && always_returns(consequent) && always_returns(alternate),
        _ => false,
    })
}

fn intern(signatures: &mut Vec<Signature>, signature: Signature) -> u32 {
    if let Some(index) = signatures.iter().position(|s| *s == signature) {
        return index as u32;
    }
    signatures.push(signature);
    (signatures.len() - 1) as u32
}

// ── Section payloads ──────────────────────────────────────────────────────

fn type_payload(signatures: &[Signature]) -> Vec<u8> {
    let mut payload = unsigned_leb128(signatures.len() as u32);
    for signature in signatures {
        payload.push(FUNC_TYPE);
        payload.extend(unsigned_leb128(signature.params.len() as u32));
        payload.extend(signature.params.iter().map(|&ty| valtype(ty)));
        match signature.result {
            Some(ty) => {
                payload.extend(unsigned_leb128(1));
                payload.push(valtype(ty));
            }
            None => payload.extend(unsigned_leb128(0)),
        }
    }
    payload
}

fn import_payload() -> Vec<u8> {
    let mut payload = unsigned_leb128(2);
    // env.print: function, type index 0 (interned first).
    payload.extend(encode_name(IMPORT_MODULE));
    payload.extend(encode_name(PRINT_IMPORT));
    payload.push(KIND_FUNC);
    payload.extend(unsigned_leb128(0));
    // env.memory: one page minimum, no maximum.
    payload.extend(encode_name(IMPORT_MODULE));
    payload.extend(encode_name(MEMORY_IMPORT));
    payload.push(KIND_MEMORY);
    payload.push(0x00);
    payload.extend(unsigned_leb128(1));
    payload
}

fn function_payload(type_indices: &[u32]) -> Vec<u8> {
    let mut payload = unsigned_leb128(type_indices.len() as u32);
    for &index in type_indices {
        payload.extend(unsigned_leb128(index));
    }
    payload
}

fn export_payload(entry_func_index: u32) -> Vec<u8> {
    let mut payload = unsigned_leb128(1);
    payload.extend(encode_name(ENTRY_EXPORT));
    payload.push(KIND_FUNC);
    payload.extend(unsigned_leb128(entry_func_index));
    payload
}

fn code_payload(
    program: &TransformedProgram,
    procs: &HashMap<String, ProcRef>,
) -> Result<Vec<u8>, EmitError> {
    let mut payload = unsigned_leb128(program.procs.len() as u32);
    for proc in &program.procs {
        let body = function_body(proc, procs)?;
        payload.extend(unsigned_leb128(body.len() as u32));
        payload.extend(body);
    }
    Ok(payload)
}

/// One code-section entry: declared locals (parameters excluded, grouped by
/// consecutive type runs) followed by the instruction stream and `end`.
fn function_body(
    proc: &Procedure,
    procs: &HashMap<String, ProcRef>,
) -> Result<Vec<u8>, EmitError> {
    let mut groups: Vec<(u32, u8)> = Vec::new();
    for ty in proc.locals.slot_types().skip(proc.params.len()) {
        let byte = valtype(ty);
        match groups.last_mut() {
            Some((count, last)) if *last == byte => *count += 1,
            _ => groups.push((1, byte)),
        }
    }

    let mut body = unsigned_leb128(groups.len() as u32);
    for (count, byte) in groups {
        body.extend(unsigned_leb128(count));
        body.push(byte);
    }

    let ctx = Context {
        locals: &proc.locals,
        procs,
    };
    emit_body(&proc.body, &ctx, &mut body)?;
    body.push(END);
    Ok(body)
}

// ── Low-level helpers ─────────────────────────────────────────────────────

fn push_section(module: &mut Vec<u8>, id: u8, payload: Vec<u8>) {
    module.push(id);
    module.extend(unsigned_leb128(payload.len() as u32));
    module.extend(payload);
}

fn encode_name(name: &str) -> Vec<u8> {
    let mut bytes = unsigned_leb128(name.len() as u32);
    bytes.extend(name.as_bytes());
    bytes
}

fn valtype(ty: ValueType) -> u8 {
    match ty {
        ValueType::Int => VALTYPE_I32,
        ValueType::Float => VALTYPE_F32,
    }
}
