//! Integration tests for the metsu code generator.
//!
//! Tests validate:
//! - The fixed magic/version header and section ordering
//! - Emitted modules pass `wasmparser` validation
//! - Import and export wiring (`env.print`, `env.memory`, `"run"`)
//! - Signature deduplication in the type section
//! - Deterministic output (same input → same bytes)
//! - TypeMismatch / UnknownProcedure failure modes

use metsu_codegen::{emit, EmitError, ENTRY_EXPORT};
use metsu_lexer::tokenize;
use metsu_parser::parse;
use metsu_transform::transform;
use wasmparser::{ExternalKind, Parser as WasmParser, Payload, TypeRef};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Compile source to module bytes (panics on any stage error).
fn emit_source(source: &str) -> Vec<u8> {
    try_emit(source).unwrap_or_else(|e| panic!("emit failed: {e}"))
}

/// Compile and return the emitter's Result for error-testing.
fn try_emit(source: &str) -> Result<Vec<u8>, EmitError> {
    let tokens = tokenize(source).expect("source should lex");
    let program = parse(tokens).expect("source should parse");
    let transformed = transform(program).expect("source should transform");
    emit(&transformed)
}

/// Extract exports from module bytes.
fn get_exports(wasm: &[u8]) -> Vec<(String, ExternalKind)> {
    let mut exports = Vec::new();
    for payload in WasmParser::new(0).parse_all(wasm) {
        if let Ok(Payload::ExportSection(reader)) = payload {
            for export in reader {
                let exp = export.expect("valid export");
                exports.push((exp.name.to_string(), exp.kind));
            }
        }
    }
    exports
}

/// Extract (module, field) import names from module bytes.
fn get_imports(wasm: &[u8]) -> Vec<(String, String, bool)> {
    let mut imports = Vec::new();
    for payload in WasmParser::new(0).parse_all(wasm) {
        if let Ok(Payload::ImportSection(reader)) = payload {
            for import in reader {
                let imp = import.expect("valid import");
                let is_func = matches!(imp.ty, TypeRef::Func(_));
                imports.push((imp.module.to_string(), imp.name.to_string(), is_func));
            }
        }
    }
    imports
}

/// Number of entries in the type section.
fn type_count(wasm: &[u8]) -> u32 {
    for payload in WasmParser::new(0).parse_all(wasm) {
        if let Ok(Payload::TypeSection(reader)) = payload {
            return reader.count();
        }
    }
    0
}

/// Returns true if `haystack` contains `needle` as a contiguous slice.
fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

// ══════════════════════════════════════════════════════════════════════════════
// Module structure
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn header_is_magic_then_version() {
    let wasm = emit_source("");
    assert_eq!(&wasm[..8], b"\0asm\x01\x00\x00\x00");
}

#[test]
fn sections_appear_in_mandated_order() {
    let wasm = emit_source("print 8");
    let mut ids = Vec::new();
    let mut offset = 8;
    while offset < wasm.len() {
        ids.push(wasm[offset]);
        // Section lengths here are single-byte LEB128; programs this small
        // never exceed 127-byte payloads.
        let len = wasm[offset + 1] as usize;
        assert!(len < 0x80, "test assumes single-byte section lengths");
        offset += 2 + len;
    }
    assert_eq!(ids, vec![0x01, 0x02, 0x03, 0x07, 0x0a]);
}

#[test]
fn empty_program_is_a_valid_module() {
    let wasm = emit_source("");
    wasmparser::validate(&wasm).expect("empty program should validate");
}

#[test]
fn imports_are_env_print_and_env_memory() {
    let imports = get_imports(&emit_source("print 8"));
    assert_eq!(
        imports,
        vec![
            ("env".to_string(), "print".to_string(), true),
            ("env".to_string(), "memory".to_string(), false),
        ]
    );
}

#[test]
fn entry_is_exported_as_run() {
    let exports = get_exports(&emit_source("print 8"));
    assert_eq!(
        exports,
        vec![(ENTRY_EXPORT.to_string(), ExternalKind::Func)]
    );
}

#[test]
fn signatures_are_deduplicated() {
    // print's (f32)->(), the shared ()->() of both procs and the entry.
    let wasm = emit_source("proc a() {print 1} proc b() {print 2}");
    assert_eq!(type_count(&wasm), 2);
}

#[test]
fn distinct_signatures_get_distinct_types() {
    // (f32)->(), ()->(), (i32)->(), (i32,i32)->(i32).
    let wasm = emit_source(
        "proc one(a) {print a} proc two(a, b) {return (a + b)} one(1) two(2, 3)",
    );
    assert_eq!(type_count(&wasm), 4);
}

#[test]
fn output_is_deterministic() {
    let source = "int f = 0 while (f < 5) {f = (f + 1) print f}";
    assert_eq!(emit_source(source), emit_source(source));
}

// ══════════════════════════════════════════════════════════════════════════════
// Code emission
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn print_of_an_int_converts_before_the_call() {
    // i32.const 8; f32.convert_i32_s; call 0
    let wasm = emit_source("print 8");
    assert!(contains_bytes(&wasm, &[0x41, 0x08, 0xb2, 0x10, 0x00]));
}

#[test]
fn print_of_a_float_passes_through() {
    // f32.const 22.5; call 0 — no conversion in between.
    let wasm = emit_source("float f = 22.5 print f");
    assert!(contains_bytes(&wasm, &[0x43, 0x00, 0x00, 0xb4, 0x41]));
    assert!(!contains_bytes(&wasm, &[0xb2]));
}

#[test]
fn while_lowers_to_block_loop_with_back_branch() {
    let wasm = emit_source("int f = 0 while (f < 5) {f = (f + 1)}");
    // block void; loop void ... br_if 1 ... br 0; end; end
    assert!(contains_bytes(&wasm, &[0x02, 0x40, 0x03, 0x40]));
    assert!(contains_bytes(&wasm, &[0x45, 0x0d, 0x01]));
    assert!(contains_bytes(&wasm, &[0x0c, 0x00, 0x0b, 0x0b]));
    wasmparser::validate(&wasm).expect("while loop should validate");
}

#[test]
fn if_without_else_emits_no_else_opcode() {
    let wasm = emit_source("int f = 1 if (f < 10) {print 2}");
    assert!(!contains_bytes(&wasm, &[0x05]));
    wasmparser::validate(&wasm).expect("if should validate");
}

#[test]
fn call_to_value_returning_proc_drops_the_result() {
    let wasm = emit_source("proc double(x) {return (x * 2)} double(4)");
    // call 1; drop — double follows the print import (0) in the function
    // index space; the synthetic entry comes after it.
    assert!(contains_bytes(&wasm, &[0x10, 0x01, 0x1a]));
    wasmparser::validate(&wasm).expect("dropped call should validate");
}

#[test]
fn every_end_to_end_program_validates() {
    let programs = [
        "",
        "print 8",
        "print 8 print 24",
        "print(2+ 4)",
        "print ((6 - 4)+10)",
        "int f = 22 print f",
        "float f = 22.5 print f",
        "int f = 22 f = (f+1) print f",
        "float f = 22.5 f = (f+1.5) print f",
        "print 23e02 print -2 print .5",
        "int f = 0 while (f < 5) {f = (f + 1) print f}",
        "int i = 0 while (i < 2) {int j = 0 while (j < 5) {j = (j + 1) print ((i * 5) + j)} i = (i + 1)}",
        "int f = 1 if (f < 10) {print 2}",
        "int f = 11 if (f < 10) {print 2} else {print 3}",
        "int f = 11 if ((f < 10) || (f > 10)) {print 2} else {print 3}",
        "int f = 10 if ((f >= 10) && (f <= 10)) {print 1} else {print 0}",
        "proc main() {print 22}",
        "proc foo() {print 27} foo()",
        "proc foo(f) {print (f + 1)} foo(28)",
    ];
    for source in programs {
        let wasm = emit_source(source);
        wasmparser::validate(&wasm)
            .unwrap_or_else(|e| panic!("program {source:?} failed validation: {e}"));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Failure modes
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn mixed_operand_types_are_rejected() {
    let err = try_emit("int f = 1 float g = 1.5 print (f + g)").unwrap_err();
    assert!(matches!(err, EmitError::TypeMismatch(_)), "{err}");
}

#[test]
fn remainder_requires_int_operands() {
    let err = try_emit("print (5.5 % 2.5)").unwrap_err();
    assert!(matches!(err, EmitError::TypeMismatch(_)), "{err}");
}

#[test]
fn logical_operators_require_int_operands() {
    let err = try_emit("print (1.5 && 2.5)").unwrap_err();
    assert!(matches!(err, EmitError::TypeMismatch(_)), "{err}");
}

#[test]
fn conditions_must_be_int() {
    let err = try_emit("if (.5) {print 1}").unwrap_err();
    assert!(matches!(err, EmitError::TypeMismatch(_)), "{err}");
}

#[test]
fn storing_the_wrong_type_is_rejected() {
    let err = try_emit("int f = 1.5").unwrap_err();
    assert!(matches!(err, EmitError::TypeMismatch(_)), "{err}");
}

#[test]
fn float_arguments_are_rejected() {
    let err = try_emit("proc foo(a) {print a} foo(1.5)").unwrap_err();
    assert!(matches!(err, EmitError::TypeMismatch(_)), "{err}");
}

#[test]
fn conditional_only_returns_are_rejected() {
    // A result-typed function must produce a value on the fallthrough
    // path too; emitting it anyway would yield an invalid module.
    let err = try_emit("proc f(x) {if (x > 0) {return 1}} proc main() {f(1)}").unwrap_err();
    assert!(matches!(err, EmitError::TypeMismatch(_)), "{err}");
}

#[test]
fn returns_on_both_branches_are_accepted() {
    let wasm = emit_source("proc f(x) {if (x > 0) {return 1} else {return 2}} proc main() {f(3)}");
    wasmparser::validate(&wasm).expect("both-branch return should validate");
}

#[test]
fn entry_cannot_return_a_value() {
    let err = try_emit("return 5").unwrap_err();
    assert!(matches!(err, EmitError::TypeMismatch(_)), "{err}");

    let err = try_emit("proc main() {return 5}").unwrap_err();
    assert!(matches!(err, EmitError::TypeMismatch(_)), "{err}");
}

#[test]
fn disagreeing_return_types_are_rejected() {
    let err =
        try_emit("proc f(a) {if (a < 1) {return 1} return 2.5} f(0)").unwrap_err();
    assert!(matches!(err, EmitError::TypeMismatch(_)), "{err}");
}

#[test]
fn unknown_callee_is_rejected() {
    let err = try_emit("nope(1, 2)").unwrap_err();
    assert_eq!(err, EmitError::UnknownProcedure("nope".into()));
}

#[test]
fn emit_error_serializes_to_json() {
    let err = try_emit("nope(1)").unwrap_err();
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("nope"), "{json}");
}
