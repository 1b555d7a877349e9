//! Statement code generation.

use metsu_types::{Expr, Stmt, ValueType};

use crate::emitter::{Context, PRINT_FUNC_INDEX};
use crate::encoding::unsigned_leb128;
use crate::error::EmitError;
use crate::expr::emit_expr;
use crate::opcodes::*;

pub(crate) fn emit_body(
    body: &[Stmt],
    ctx: &Context<'_>,
    code: &mut Vec<u8>,
) -> Result<(), EmitError> {
    for stmt in body {
        emit_stmt(stmt, ctx, code)?;
    }
    Ok(())
}

fn emit_stmt(stmt: &Stmt, ctx: &Context<'_>, code: &mut Vec<u8>) -> Result<(), EmitError> {
    match stmt {
        Stmt::Print { expr } => {
            let ty = emit_expr(expr, ctx, code)?;
            // One host import, one signature: ints are converted on the way
            // out, floats pass through.
            if ty == ValueType::Int {
                code.push(F32_CONVERT_I32_S);
            }
            code.push(CALL);
            code.extend(unsigned_leb128(PRINT_FUNC_INDEX));
            Ok(())
        }
        Stmt::VarDecl {
            name, initializer, ..
        } => emit_set(name, initializer, ctx, code),
        Stmt::Assign { name, value } => emit_set(name, value, ctx, code),
        Stmt::If {
            condition,
            consequent,
            alternate,
        } => {
            emit_condition(condition, ctx, code)?;
            code.push(IF);
            code.push(BLOCKTYPE_EMPTY);
            emit_body(consequent, ctx, code)?;
            if !alternate.is_empty() {
                code.push(ELSE);
                emit_body(alternate, ctx, code)?;
            }
            code.push(END);
            Ok(())
        }
        Stmt::While { condition, body } => {
            // block { loop { cond; eqz; br_if 1; body; br 0 } }
            code.push(BLOCK);
            code.push(BLOCKTYPE_EMPTY);
            code.push(LOOP);
            code.push(BLOCKTYPE_EMPTY);
            emit_condition(condition, ctx, code)?;
            code.push(I32_EQZ);
            code.push(BR_IF);
            code.extend(unsigned_leb128(1));
            emit_body(body, ctx, code)?;
            code.push(BR);
            code.extend(unsigned_leb128(0));
            code.push(END);
            code.push(END);
            Ok(())
        }
        Stmt::Call { name, args } => {
            let callee = ctx
                .procs
                .get(name.as_str())
                .ok_or_else(|| EmitError::UnknownProcedure(name.clone()))?;
            for arg in args {
                let ty = emit_expr(arg, ctx, code)?;
                if ty != ValueType::Int {
                    return Err(EmitError::mismatch(format!(
                        "argument to '{name}' is {ty}, parameters are int"
                    )));
                }
            }
            code.push(CALL);
            code.extend(unsigned_leb128(callee.index));
            // A call statement discards any produced value.
            if callee.result.is_some() {
                code.push(DROP);
            }
            Ok(())
        }
        Stmt::Return { value } => {
            emit_expr(value, ctx, code)?;
            code.push(RETURN);
            Ok(())
        }
        // Procedure declarations were regrouped by the transformer and are
        // emitted as functions, never as body statements.
        Stmt::Proc { .. } => Ok(()),
    }
}

/// Evaluate and store into an existing slot; value and slot types must
/// agree.
fn emit_set(
    name: &str,
    value: &Expr,
    ctx: &Context<'_>,
    code: &mut Vec<u8>,
) -> Result<(), EmitError> {
    let slot = ctx
        .locals
        .resolve(name)
        .ok_or_else(|| EmitError::mismatch(format!("identifier '{name}' has no slot")))?;
    let ty = emit_expr(value, ctx, code)?;
    if ty != slot.ty {
        return Err(EmitError::mismatch(format!(
            "cannot store {ty} into '{name}' ({})",
            slot.ty
        )));
    }
    code.push(LOCAL_SET);
    code.extend(unsigned_leb128(slot.index));
    Ok(())
}

/// `if`/`while` conditions are i32 truth values.
fn emit_condition(
    condition: &Expr,
    ctx: &Context<'_>,
    code: &mut Vec<u8>,
) -> Result<(), EmitError> {
    let ty = emit_expr(condition, ctx, code)?;
    if ty != ValueType::Int {
        return Err(EmitError::mismatch(format!(
            "condition resolves to {ty}, expected int"
        )));
    }
    Ok(())
}
