//! Arithmetic operators
//!
//! Double precision throughout. Null operands propagate. Division and
//! remainder by zero give no value rather than an infinity.

use crate::error::{EvalError, EvalResult};
use aggexpr_ast::{BinaryOp, UnaryOp};
use aggexpr_types::Value;

pub(super) fn sign(op: UnaryOp, operand: Value) -> EvalResult<Value> {
    match operand {
        Value::Null => Ok(Value::Null),
        Value::Number(n) => Ok(Value::Number(match op {
            UnaryOp::Negate => -n,
            _ => n,
        })),
        other => Err(EvalError::type_mismatch(op.symbol(), "number", other.type_name())),
    }
}

pub(super) fn binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    let (a, b) = match (left, right) {
        (Value::Null, _) | (_, Value::Null) => return Ok(Value::Null),
        (Value::Number(a), Value::Number(b)) => (*a, *b),
        (Value::Number(_), other) | (other, _) => {
            return Err(EvalError::type_mismatch(op.symbol(), "number", other.type_name()));
        }
    };

    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Subtract => a - b,
        BinaryOp::Multiply => a * b,
        BinaryOp::Divide | BinaryOp::Modulo if b == 0.0 => return Ok(Value::Null),
        BinaryOp::Divide => a / b,
        // Remainder keeps the sign of the dividend
        BinaryOp::Modulo => a % b,
        BinaryOp::Power => a.powf(b),
        other => {
            return Err(EvalError::type_mismatch(other.symbol(), "boolean operator", "number"));
        }
    };
    Ok(Value::Number(result))
}
