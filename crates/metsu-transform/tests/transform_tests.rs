//! Transformer integration tests: entry synthesis, slot numbering, and the
//! three validation failures, driven from source text.

use metsu_lexer::tokenize;
use metsu_parser::parse;
use metsu_transform::{transform, TransformError, TransformedProgram, ENTRY_NAME};
use metsu_types::ValueType;

fn transform_source(source: &str) -> TransformedProgram {
    let tokens = tokenize(source).expect("source should lex");
    let program = parse(tokens).expect("source should parse");
    transform(program).unwrap_or_else(|e| panic!("transform failed: {e}"))
}

fn transform_err(source: &str) -> TransformError {
    let tokens = tokenize(source).expect("source should lex");
    let program = parse(tokens).expect("source should parse");
    transform(program).expect_err("transform should fail")
}

#[test]
fn flattens_top_level_statements_into_entry() {
    let transformed = transform_source("print 8 proc foo() {print 1} print 24");
    assert_eq!(transformed.procs.len(), 2);
    let entry = transformed.entry();
    assert_eq!(entry.name, ENTRY_NAME);
    assert_eq!(entry.body.len(), 2);
    // Declared procedures keep declaration order; the synthetic entry
    // comes after them.
    assert_eq!(transformed.index_of("foo"), Some(0));
    assert_eq!(transformed.index_of(ENTRY_NAME), Some(1));
}

#[test]
fn declared_types_flow_into_the_symbol_table() {
    let transformed = transform_source("int f = 22 float g = 1.5 print f");
    let entry = transformed.entry();
    let f = entry.locals.resolve("f").unwrap();
    let g = entry.locals.resolve("g").unwrap();
    assert_eq!((f.index, f.ty), (0, ValueType::Int));
    assert_eq!((g.index, g.ty), (1, ValueType::Float));
}

#[test]
fn declarations_inside_blocks_share_the_procedure_table() {
    let transformed = transform_source("int f = 0 while (f < 3) {int g = 1 f = (f + g)}");
    let entry = transformed.entry();
    assert_eq!(entry.locals.resolve("g").unwrap().index, 1);
}

#[test]
fn user_main_is_the_entry_for_proc_only_programs() {
    let transformed = transform_source("proc main() {print 22}");
    assert_eq!(transformed.procs.len(), 1);
    assert_eq!(transformed.entry().params.len(), 0);
}

#[test]
fn rejects_user_main_alongside_top_level_statements() {
    let err = transform_err("print 1 proc main() {print 2}");
    assert_eq!(err, TransformError::DuplicateProcedure("main".into()));
}

#[test]
fn rejects_duplicate_procedures() {
    let err = transform_err("proc foo() {print 1} proc foo() {print 2}");
    assert_eq!(err, TransformError::DuplicateProcedure("foo".into()));
}

#[test]
fn rejects_unresolved_identifier_read() {
    let err = transform_err("print f");
    assert_eq!(err, TransformError::UnresolvedIdentifier("f".into()));
}

#[test]
fn rejects_unresolved_assignment_target() {
    let err = transform_err("f = 1");
    assert_eq!(err, TransformError::UnresolvedIdentifier("f".into()));
}

#[test]
fn identifiers_do_not_leak_across_procedures() {
    let err = transform_err("proc foo() {int f = 1 print f} proc bar() {print f}");
    assert_eq!(err, TransformError::UnresolvedIdentifier("f".into()));
}

#[test]
fn rejects_arity_mismatch() {
    let err = transform_err("proc foo(a, b) {print (a + b)} foo(1)");
    assert_eq!(
        err,
        TransformError::ArityMismatch {
            name: "foo".into(),
            expected: 2,
            found: 1,
        }
    );
}

#[test]
fn unknown_callee_passes_transformation() {
    // Resolution of the callee itself is the emitter's job.
    let transformed = transform_source("nope(1, 2)");
    assert_eq!(transformed.procs.len(), 1);
}

#[test]
fn transform_error_serializes_to_json() {
    let err = transform_err("print f");
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("f"), "{json}");
}
