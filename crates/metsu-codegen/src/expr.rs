//! Expression code generation.
//!
//! Expressions compile to postorder stack code: operands first, operator
//! last. Every expression resolves to exactly one static type; operand
//! types must match exactly, there is no widening.

use metsu_transform::SymbolTable;
use metsu_types::{BinOp, Expr, ValueType};

use crate::emitter::Context;
use crate::encoding::{ieee754_f32, signed_leb128, unsigned_leb128};
use crate::error::EmitError;
use crate::opcodes::*;

/// The static type an expression resolves to, without emitting any code.
/// Used for signature inference ahead of emission.
pub(crate) fn expr_type(expr: &Expr, locals: &SymbolTable) -> Result<ValueType, EmitError> {
    match expr {
        Expr::Number(value) => Ok(literal_type(*value)),
        Expr::Identifier(name) => slot_type(name, locals),
        Expr::Binary { op, left, right } => {
            let lt = expr_type(left, locals)?;
            let rt = expr_type(right, locals)?;
            binary_result(*op, lt, rt)
        }
    }
}

/// Emit code for an expression, leaving its value on the stack.
/// Returns the value's static type.
pub(crate) fn emit_expr(
    expr: &Expr,
    ctx: &Context<'_>,
    code: &mut Vec<u8>,
) -> Result<ValueType, EmitError> {
    match expr {
        Expr::Number(value) => {
            let ty = literal_type(*value);
            match ty {
                ValueType::Int => {
                    code.push(I32_CONST);
                    code.extend(signed_leb128(*value as i32));
                }
                ValueType::Float => {
                    code.push(F32_CONST);
                    code.extend(ieee754_f32(*value as f32));
                }
            }
            Ok(ty)
        }
        Expr::Identifier(name) => {
            let slot = ctx
                .locals
                .resolve(name)
                .ok_or_else(|| EmitError::mismatch(format!("identifier '{name}' has no slot")))?;
            code.push(LOCAL_GET);
            code.extend(unsigned_leb128(slot.index));
            Ok(slot.ty)
        }
        Expr::Binary { op, left, right } => {
            let lt = emit_expr(left, ctx, code)?;
            let rt = emit_expr(right, ctx, code)?;
            let result = binary_result(*op, lt, rt)?;
            code.push(binary_opcode(*op, lt)?);
            Ok(result)
        }
    }
}

/// Integral literals are `int`; anything with a fractional part is `float`.
fn literal_type(value: f64) -> ValueType {
    if value.fract() == 0.0 {
        ValueType::Int
    } else {
        ValueType::Float
    }
}

fn slot_type(name: &str, locals: &SymbolTable) -> Result<ValueType, EmitError> {
    locals
        .resolve(name)
        .map(|slot| slot.ty)
        .ok_or_else(|| EmitError::mismatch(format!("identifier '{name}' has no slot")))
}

/// The result type of a binary operator, after checking its operands.
fn binary_result(op: BinOp, left: ValueType, right: ValueType) -> Result<ValueType, EmitError> {
    if left != right {
        return Err(EmitError::mismatch(format!(
            "operands of '{op}' are {left} and {right}"
        )));
    }
    if (op == BinOp::Rem || op.is_logical()) && left == ValueType::Float {
        return Err(EmitError::mismatch(format!("'{op}' requires int operands")));
    }
    if op.is_comparison() || op.is_logical() {
        // Truth values are i32 whatever the operand type.
        Ok(ValueType::Int)
    } else {
        Ok(left)
    }
}

/// Opcode for (operator, operand type). Assumes `binary_result` passed.
fn binary_opcode(op: BinOp, operands: ValueType) -> Result<u8, EmitError> {
    let opcode = match (op, operands) {
        (BinOp::Add, ValueType::Int) => I32_ADD,
        (BinOp::Sub, ValueType::Int) => I32_SUB,
        (BinOp::Mul, ValueType::Int) => I32_MUL,
        (BinOp::Div, ValueType::Int) => I32_DIV_S,
        (BinOp::Rem, ValueType::Int) => I32_REM_S,
        (BinOp::Eq, ValueType::Int) => I32_EQ,
        (BinOp::Ne, ValueType::Int) => I32_NE,
        (BinOp::Lt, ValueType::Int) => I32_LT_S,
        (BinOp::Gt, ValueType::Int) => I32_GT_S,
        (BinOp::Le, ValueType::Int) => I32_LE_S,
        (BinOp::Ge, ValueType::Int) => I32_GE_S,
        (BinOp::And, ValueType::Int) => I32_AND,
        (BinOp::Or, ValueType::Int) => I32_OR,
        (BinOp::Add, ValueType::Float) => F32_ADD,
        (BinOp::Sub, ValueType::Float) => F32_SUB,
        (BinOp::Mul, ValueType::Float) => F32_MUL,
        (BinOp::Div, ValueType::Float) => F32_DIV,
        (BinOp::Eq, ValueType::Float) => F32_EQ,
        (BinOp::Ne, ValueType::Float) => F32_NE,
        (BinOp::Lt, ValueType::Float) => F32_LT,
        (BinOp::Gt, ValueType::Float) => F32_GT,
        (BinOp::Le, ValueType::Float) => F32_LE,
        (BinOp::Ge, ValueType::Float) => F32_GE,
        (op, ValueType::Float) => {
            return Err(EmitError::mismatch(format!("'{op}' requires int operands")))
        }
    };
    Ok(opcode)
}
