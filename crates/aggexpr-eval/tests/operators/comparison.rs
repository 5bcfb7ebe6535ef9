//! Comparison Operator Tests
//!
//! Tests for: < > <= >= == != over numbers, text, dates and booleans

use super::{eval, eval_in, fixture};
use aggexpr_eval::EvalError;
use aggexpr_types::Value;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("1 < 2", true)]
#[case("2 <= 2", true)]
#[case("3 > 4", false)]
#[case("3 >= 4", false)]
#[case("#{deA} == 3", true)]
#[case("#{deA} != #{deB}", true)]
#[case("1 + 2 < 4", true)]
#[case("'abc' < 'abd'", true)]
#[case("'b' > 'abc'", true)]
#[case("'abc' == 'abc'", true)]
#[case("false < true", true)]
#[case("true == true", true)]
#[case("#{deF} == 'Str'", true)]
#[case("#{deH} == true", true)]
fn test_comparison(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(eval(source), Value::Boolean(expected));
}

// === Dates compare as ISO text ===

#[rstest]
#[case("#{deG} < '2022-02-01'", true)]
#[case("#{deG} > '2022-02-01'", false)]
#[case("#{deG} >= '2022-01-15'", true)]
#[case("#{deG} == '2022-01-15'", true)]
fn test_date_comparison(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(eval(source), Value::Boolean(expected));
}

// === Chained equality evaluates left to right ===

#[rstest]
#[case("1 < 2 == 3 > 4", false)]
#[case("true == false == false", true)]
fn test_chained_equality(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(eval(source), Value::Boolean(expected));
}

#[rstest]
#[case("1 < 'abc'")]
#[case("true == 1")]
#[case("#{deF} > 2")]
fn test_mixed_kinds_fail(#[case] source: &str) {
    let err = eval_in(source, &fixture()).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { .. }), "{:?}", err);
}
