//! The transformation pass: program to procedure list.

use metsu_types::{Expr, Program, Stmt, ValueType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::symbols::SymbolTable;

/// Name of the entry procedure. Top-level statements are collected under
/// this name; a user may declare it instead, but not both.
pub const ENTRY_NAME: &str = "main";

/// A validation failure. The pass aborts on the first one; no partial
/// program is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TransformError {
    #[error("procedure '{0}' is declared more than once")]
    DuplicateProcedure(String),
    #[error("call to '{name}' passes {found} argument(s), expected {expected}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("identifier '{0}' has no visible declaration")]
    UnresolvedIdentifier(String),
}

/// One procedure with its resolved symbol table.
///
/// `locals` covers parameters and declarations alike; parameters occupy
/// slots `0..params.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub locals: SymbolTable,
}

/// The transformed program: procedures only, in declaration order, with
/// the synthetic entry (when one was built) appended last.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedProgram {
    pub procs: Vec<Procedure>,
}

impl TransformedProgram {
    /// The entry procedure.
    ///
    /// Always present: `transform` either adopts a user-declared entry or
    /// synthesizes one.
    pub fn entry(&self) -> &Procedure {
        self.procs
            .iter()
            .find(|p| p.name == ENTRY_NAME)
            .unwrap_or_else(|| unreachable!("transform always produces an entry procedure"))
    }

    /// Position of a procedure by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.procs.iter().position(|p| p.name == name)
    }
}

/// Normalize and validate a program.
///
/// Top-level non-procedure statements are flattened, in order, into a
/// synthetic entry procedure with no parameters. Every procedure gets a
/// symbol table; every identifier, call arity, and procedure name is
/// checked. Fails fast on the first violation.
pub fn transform(program: Program) -> Result<TransformedProgram, TransformError> {
    let mut procs = Vec::new();
    let mut top_level = Vec::new();

    for stmt in program {
        match stmt {
            Stmt::Proc { name, params, body } => {
                if procs.iter().any(|p: &Procedure| p.name == name) {
                    return Err(TransformError::DuplicateProcedure(name));
                }
                procs.push(build_procedure(name, params, body));
            }
            other => top_level.push(other),
        }
    }

    let has_user_entry = procs.iter().any(|p| p.name == ENTRY_NAME);
    if has_user_entry && !top_level.is_empty() {
        return Err(TransformError::DuplicateProcedure(ENTRY_NAME.to_string()));
    }
    if !has_user_entry {
        procs.push(build_procedure(ENTRY_NAME.to_string(), Vec::new(), top_level));
    }

    let arities: Vec<(String, usize)> = procs
        .iter()
        .map(|p| (p.name.clone(), p.params.len()))
        .collect();
    for proc in &procs {
        validate_body(&proc.body, &proc.locals, &arities)?;
    }

    Ok(TransformedProgram { procs })
}

/// Build a procedure and its symbol table: parameters first (the call
/// convention types them as integers), then declarations in first-seen
/// order, nested blocks included.
fn build_procedure(name: String, params: Vec<String>, body: Vec<Stmt>) -> Procedure {
    let mut locals = SymbolTable::new();
    for param in &params {
        locals.declare(param, ValueType::Int);
    }
    collect_declarations(&body, &mut locals);
    Procedure {
        name,
        params,
        body,
        locals,
    }
}

fn collect_declarations(body: &[Stmt], locals: &mut SymbolTable) {
    for stmt in body {
        match stmt {
            Stmt::VarDecl { name, ty, .. } => {
                locals.declare(name, *ty);
            }
            Stmt::If {
                consequent,
                alternate,
                ..
            } => {
                collect_declarations(consequent, locals);
                collect_declarations(alternate, locals);
            }
            Stmt::While { body, .. } => collect_declarations(body, locals),
            _ => {}
        }
    }
}

fn validate_body(
    body: &[Stmt],
    locals: &SymbolTable,
    arities: &[(String, usize)],
) -> Result<(), TransformError> {
    for stmt in body {
        match stmt {
            Stmt::Print { expr } => validate_expr(expr, locals)?,
            Stmt::VarDecl { initializer, .. } => validate_expr(initializer, locals)?,
            Stmt::Assign { name, value } => {
                if locals.resolve(name).is_none() {
                    return Err(TransformError::UnresolvedIdentifier(name.clone()));
                }
                validate_expr(value, locals)?;
            }
            Stmt::If {
                condition,
                consequent,
                alternate,
            } => {
                validate_expr(condition, locals)?;
                validate_body(consequent, locals, arities)?;
                validate_body(alternate, locals, arities)?;
            }
            Stmt::While { condition, body } => {
                validate_expr(condition, locals)?;
                validate_body(body, locals, arities)?;
            }
            Stmt::Call { name, args } => {
                // Unknown callees surface later, during emission.
                if let Some((_, expected)) = arities.iter().find(|(n, _)| n == name) {
                    if *expected != args.len() {
                        return Err(TransformError::ArityMismatch {
                            name: name.clone(),
                            expected: *expected,
                            found: args.len(),
                        });
                    }
                }
                for arg in args {
                    validate_expr(arg, locals)?;
                }
            }
            Stmt::Return { value } => validate_expr(value, locals)?,
            // The parser only produces procedure declarations at the top
            // level, and those were split off before validation.
            Stmt::Proc { .. } => {}
        }
    }
    Ok(())
}

fn validate_expr(expr: &Expr, locals: &SymbolTable) -> Result<(), TransformError> {
    match expr {
        Expr::Number(_) => Ok(()),
        Expr::Identifier(name) => match locals.resolve(name) {
            Some(_) => Ok(()),
            None => Err(TransformError::UnresolvedIdentifier(name.clone())),
        },
        Expr::Binary { left, right, .. } => {
            validate_expr(left, locals)?;
            validate_expr(right, locals)
        }
    }
}
