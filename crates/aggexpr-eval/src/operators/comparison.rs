//! Comparison and equality
//!
//! Numbers compare numerically, text lexicographically (which also orders ISO
//! dates) and booleans with `false < true`. Mixing kinds is an error.

use crate::error::{EvalError, EvalResult};
use aggexpr_ast::BinaryOp;
use aggexpr_types::Value;
use std::cmp::Ordering;

fn ordering(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Option<Ordering>> {
    if left.is_null() || right.is_null() {
        return Ok(None);
    }
    match left.compare(right) {
        Some(ordering) => Ok(Some(ordering)),
        // NaN compares with nothing
        None if left.data_type() == right.data_type() => Ok(None),
        None => Err(EvalError::type_mismatch(
            op.symbol(),
            left.type_name(),
            right.type_name(),
        )),
    }
}

pub(super) fn compare(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    let Some(ordering) = ordering(op, left, right)? else {
        return Ok(Value::Null);
    };
    let result = match op {
        BinaryOp::Less => ordering == Ordering::Less,
        BinaryOp::LessOrEqual => ordering != Ordering::Greater,
        BinaryOp::Greater => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    };
    Ok(Value::Boolean(result))
}

pub(super) fn equality(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    if left.data_type() != right.data_type() {
        return Err(EvalError::type_mismatch(
            op.symbol(),
            left.type_name(),
            right.type_name(),
        ));
    }
    let equal = left == right;
    Ok(Value::Boolean(if op == BinaryOp::Equal { equal } else { !equal }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(BinaryOp::Less, Value::from("2022-01-15"), Value::from("2022-02-01"), true)]
    #[case(BinaryOp::Less, Value::from("2022-01-15"), Value::from("2022-01-01"), false)]
    #[case(BinaryOp::GreaterOrEqual, Value::from("a"), Value::from("a"), true)]
    #[case(BinaryOp::Greater, Value::from(true), Value::from(false), true)]
    #[case(BinaryOp::LessOrEqual, Value::from(2.0), Value::from(1.0), false)]
    fn test_compare(#[case] op: BinaryOp, #[case] left: Value, #[case] right: Value, #[case] expected: bool) {
        assert_eq!(compare(op, &left, &right), Ok(Value::Boolean(expected)));
    }

    #[test]
    fn test_null_propagates() {
        assert_eq!(compare(BinaryOp::Less, &Value::Null, &Value::from(1.0)), Ok(Value::Null));
        assert_eq!(equality(BinaryOp::Equal, &Value::from(1.0), &Value::Null), Ok(Value::Null));
    }

    #[test]
    fn test_mixed_kinds_are_rejected() {
        assert!(compare(BinaryOp::Less, &Value::from(1.0), &Value::from("1")).is_err());
        assert!(equality(BinaryOp::NotEqual, &Value::from(true), &Value::from(1.0)).is_err());
    }

    #[test]
    fn test_not_equal() {
        assert_eq!(
            equality(BinaryOp::NotEqual, &Value::from("a"), &Value::from("b")),
            Ok(Value::Boolean(true))
        );
    }
}
