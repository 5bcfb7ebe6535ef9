//! Logical Operator Tests
//!
//! Tests for: && || ! including precedence against comparisons

use super::{eval, eval_in, fixture};
use aggexpr_eval::EvalError;
use aggexpr_types::Value;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("true && true", true)]
#[case("true && false", false)]
#[case("false || true", true)]
#[case("false || false", false)]
#[case("true || false && false", true)]
#[case("(true || false) && false", false)]
#[case("!false", true)]
#[case("! true == false", true)]
#[case("! 5 > 3", false)]
#[case("true == !false", true)]
#[case("#{deH} != !true", true)]
#[case("#{deA} < #{deB} && #{deH}", true)]
#[case("#{deA} > 5 || #{deB} > 5", true)]
fn test_logical(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(eval(source), Value::Boolean(expected));
}

#[rstest]
#[case("1 && true")]
#[case("true && 2")]
#[case("!5")]
#[case("'abc' || false")]
fn test_non_boolean_operands_fail(#[case] source: &str) {
    let err = eval_in(source, &fixture()).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { .. }), "{:?}", err);
}
