//! Scalar Function Tests
//!
//! Tests for: if, isNull, isNotNull, firstNonNull, greatest, least, log, log10,
//! orgUnit.ancestor, orgUnit.group

use super::{assert_number, eval, eval_in, eval_with, fixture};
use aggexpr_eval::{EvalError, MissingValueStrategy, OrgUnitInfo};
use aggexpr_types::Value;
use pretty_assertions::assert_eq;
use rstest::rstest;

// === log / log10 ===

#[rstest]
#[case("log(50)", 3.912023005428146)]
#[case("log(2.718281828459045)", 1.0)]
#[case("log(0)", f64::NEG_INFINITY)]
#[case("log(-1)", f64::NAN)]
#[case("log(50, 3)", 3.5608767950073115)]
#[case("log(8, 2)", 3.0)]
#[case("log(0, 3)", f64::NEG_INFINITY)]
#[case("log(-1, 3)", f64::NAN)]
#[case("log(50, 0)", 0.0)]
#[case("log(50, -3)", f64::NAN)]
#[case("log(-50, -3)", f64::NAN)]
#[case("log10(50)", 1.6989700043360187)]
#[case("log10(1000)", 3.0)]
fn test_log(#[case] source: &str, #[case] expected: f64) {
    assert_number(eval(source), expected);
}

// === if ===

#[rstest]
#[case("if(#{deA} > 1, 10, 20)", 10.0)]
#[case("if(#{deA} > 5, 10, 20)", 20.0)]
#[case("if(true, 1, 1 / 0) + 1", 2.0)]
fn test_if(#[case] source: &str, #[case] expected: f64) {
    assert_number(eval(source), expected);
}

#[test]
fn test_if_only_evaluates_selected_branch() {
    assert_eq!(eval_in("if(true, 1, C{missing})", &fixture()), Ok(Value::Number(1.0)));
}

#[test]
fn test_if_requires_boolean_condition() {
    let err = eval_in("if(0, 1, 0)", &fixture()).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { .. }));
}

// === Null tests see absent items even when defaults are substituted ===

#[rstest]
#[case("isNull(#{deE})", true)]
#[case("isNull(#{deA})", false)]
#[case("isNotNull(#{deE})", false)]
#[case("isNotNull(#{deA})", true)]
fn test_null_tests(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(
        eval_with(source, MissingValueStrategy::NeverSkip),
        Value::Boolean(expected)
    );
}

#[test]
fn test_first_non_null() {
    assert_number(eval("firstNonNull(#{deC}, #{deD}, #{deA}, #{deB})"), 3.0);
    assert_number(eval("firstNonNull(#{deC}, 7)"), 7.0);
    assert_eq!(eval("firstNonNull(#{deC}, #{deE})"), Value::Null);
}

// === greatest / least ===

#[rstest]
#[case("greatest(#{deA}, #{deB})", Some(13.0))]
#[case("least(#{deA}, #{deB})", Some(3.0))]
#[case("greatest(#{deA}, #{deC}, 1)", Some(3.0))]
#[case("least(#{deC}, #{deB})", Some(13.0))]
#[case("greatest(#{deE})", None)]
#[case("least(#{deE})", None)]
fn test_extremes(#[case] source: &str, #[case] expected: Option<f64>) {
    let value = eval_with(source, MissingValueStrategy::NeverSkip);
    match expected {
        Some(n) => assert_number(value, n),
        None => assert_eq!(value, Value::Null),
    }
}

#[test]
fn test_extremes_compare_text() {
    assert_eq!(eval("greatest('a', 'c', 'b')"), Value::from("c"));
    assert_eq!(eval("least(#{deG}, '2021-12-31')"), Value::from("2021-12-31"));
}

// === orgUnit.ancestor / orgUnit.group ===

#[rstest]
#[case("if(orgUnit.ancestor(ouA, ouB), 1, 0)", 1.0)]
#[case("if(orgUnit.ancestor(ouX), 1, 0)", 0.0)]
#[case("if(orgUnit.ancestor(ouC), 1, 0)", 1.0)]
#[case("if(orgUnit.group(ougA, ougB), 1, 0)", 1.0)]
#[case("if(orgUnit.group(ougX), 1, 0)", 0.0)]
fn test_org_unit_predicates(#[case] source: &str, #[case] expected: f64) {
    let ctx = fixture().with_org_unit(
        OrgUnitInfo::new("ouC")
            .with_ancestors(["ouA"])
            .with_groups(["ougB"]),
    );
    assert_eq!(eval_in(source, &ctx), Ok(Value::Number(expected)));
}

#[test]
fn test_org_unit_predicates_without_org_unit() {
    assert_eq!(eval("orgUnit.group(ougA)"), Value::Boolean(false));
    assert_eq!(eval("orgUnit.ancestor(ouA)"), Value::Boolean(false));
}
