//! Logical operators with three-valued logic
//!
//! `&&`: false dominates. `||`: true dominates. Otherwise a null operand
//! gives null.

use crate::error::{EvalError, EvalResult};
use aggexpr_types::Value;

fn as_logical(operator: &str, value: &Value) -> EvalResult<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Boolean(b) => Ok(Some(*b)),
        other => Err(EvalError::type_mismatch(operator, "boolean", other.type_name())),
    }
}

pub(super) fn and(left: Value, right: Value) -> EvalResult<Value> {
    let result = match (as_logical("&&", &left)?, as_logical("&&", &right)?) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    };
    Ok(result.into())
}

pub(super) fn or(left: Value, right: Value) -> EvalResult<Value> {
    let result = match (as_logical("||", &left)?, as_logical("||", &right)?) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    };
    Ok(result.into())
}

pub(super) fn not(operand: Value) -> EvalResult<Value> {
    Ok(as_logical("!", &operand)?.map(|b| !b).into())
}
