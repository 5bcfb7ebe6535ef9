//! Arithmetic Operator Tests
//!
//! Tests for: + - * / % ^, unary minus and plus, precedence, division by zero

use super::{assert_number, de, eval, eval_in, fixture};
use aggexpr_eval::EvalError;
use aggexpr_types::Value;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

// === Precedence and associativity ===

#[rstest]
#[case("1 + 2 * 3", 7.0)]
#[case("(1 + 2) * 3", 9.0)]
#[case("12 % 5 % 3", 2.0)]
#[case("-(7) % 3", -1.0)]
#[case("7 % 4 / 2", 1.5)]
#[case("-(2) ^ 2", -4.0)]
#[case("2^3^2", 512.0)]
#[case("2^-2", 0.25)]
#[case("10 - 4 - 3", 3.0)]
#[case("+5 - -5", 10.0)]
#[case("1.5e2 / 3", 50.0)]
fn test_precedence(#[case] source: &str, #[case] expected: f64) {
    assert_number(eval(source), expected);
}

// === Items ===

#[rstest]
#[case("#{deA} + #{deB}", 16.0)]
#[case("#{deB} - #{deA}", 10.0)]
#[case("#{deA} * #{deB}", 39.0)]
#[case("#{deB} % #{deA}", 1.0)]
#[case("#{deA} ^ 2", 9.0)]
fn test_item_arithmetic(#[case] source: &str, #[case] expected: f64) {
    assert_number(eval(source), expected);
}

// === Division by zero ===

#[rstest]
#[case("1 / 0")]
#[case("5 % 0")]
#[case("#{deA} / (#{deB} - 13)")]
fn test_division_by_zero_has_no_value(#[case] source: &str) {
    assert_eq!(eval(source), Value::Null);
}

// === Type errors ===

#[rstest]
#[case("'abc' + 1")]
#[case("true * 2")]
#[case("-'abc'")]
#[case("#{deF} + 1")]
fn test_non_numeric_operands_fail(#[case] source: &str) {
    let err = eval_in(source, &fixture()).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { .. }), "{:?}", err);
}

// === Long chains ===

#[test]
fn test_long_sum_of_items() {
    let ctx = (0..150).fold(fixture(), |ctx, i| ctx.with_value(de(&format!("de{}", i)), 1.0));
    let source = (0..150)
        .map(|i| format!("#{{de{}}}", i))
        .collect::<Vec<_>>()
        .join(" + ");
    assert_eq!(eval_in(&source, &ctx).unwrap(), Value::Number(150.0));
}

#[test]
fn test_long_mixed_chain() {
    let source = (0..200).map(|_| "2").collect::<Vec<_>>().join(" * 1 - 1 + ");
    // 2 * 1 - 1 + 2 * 1 - 1 + ... + 2
    assert_eq!(eval(&source), Value::Number(200.0 * 2.0 - 199.0));
}

// === Properties ===

proptest! {
    #[test]
    fn integer_arithmetic_is_exact(a in -10_000i32..10_000, b in -10_000i32..10_000) {
        let (a, b) = (f64::from(a), f64::from(b));
        prop_assert_eq!(eval(&format!("{} + {}", a, b)), Value::Number(a + b));
        prop_assert_eq!(eval(&format!("{} - ({})", a, b)), Value::Number(a - b));
        prop_assert_eq!(eval(&format!("({}) * ({})", a, b)), Value::Number(a * b));
    }

    #[test]
    fn items_match_literals(a in 0u16..1000) {
        let ctx = fixture().with_value(de("deX"), f64::from(a));
        prop_assert_eq!(eval_in("#{deX} * 2 + 1", &ctx).unwrap(), eval(&format!("{} * 2 + 1", a)));
    }
}
