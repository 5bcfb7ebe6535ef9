//! Item Reference Tests
//!
//! Tests for: constants, org unit group counts, [days], indicators, program
//! items, reporting rates, and operand wildcards

use super::{assert_number, de, eval_in, fixture};
use aggexpr_ast::{DimensionalItemId, ItemKind};
use aggexpr_eval::{EvalError, MissingValueStrategy, ValueContext};
use aggexpr_types::Value;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn items() -> ValueContext {
    fixture()
        .with_constant("half", 0.5)
        .with_constant("quarter", 0.25)
        .with_org_unit_group_count("ougA", 20.0)
        .with_days(30)
        .with_value(DimensionalItemId::indicator("indA"), 40.0)
        .with_value(DimensionalItemId::new(ItemKind::DataElementOperand, ["deP", "cocA"]), 4.0)
        .with_value(DimensionalItemId::new(ItemKind::ProgramDataElement, ["prA", "deQ"]), 6.0)
        .with_value(DimensionalItemId::new(ItemKind::ProgramAttribute, ["prA", "teaA"]), 8.0)
        .with_value(DimensionalItemId::new(ItemKind::ProgramIndicator, ["piA"]), 10.0)
        .with_value(DimensionalItemId::new(ItemKind::ReportingRate, ["dsA", "REPORTING_RATE"]), 90.0)
}

#[rstest]
#[case("C{half} + C{quarter}", 0.75)]
#[case("OUG{ougA} * 2", 40.0)]
#[case("1 + [days]", 31.0)]
#[case("N{indA} / 4", 10.0)]
#[case("#{deP.cocA}", 4.0)]
#[case("#{deP.cocA.*}", 4.0)]
#[case("D{prA.deQ} + A{prA.teaA}", 14.0)]
#[case("I{piA}", 10.0)]
#[case("R{dsA.REPORTING_RATE} / 100", 0.9)]
fn test_item_values(#[case] source: &str, #[case] expected: f64) {
    assert_number(eval_in(source, &items()).unwrap(), expected);
}

#[test]
fn test_days_without_period_has_no_value() {
    assert_eq!(eval_in("[days]", &fixture()), Ok(Value::Null));
}

#[test]
fn test_missing_constant_is_fatal() {
    let err = eval_in("C{nope} + 1", &items()).unwrap_err();
    assert_eq!(err, EvalError::UnresolvedConstant { uid: "nope".to_string() });
    assert_eq!(err.to_string(), "Unresolved constant C{nope}");
}

#[test]
fn test_missing_indicator_is_fatal() {
    let err = eval_in("N{nope}", &items()).unwrap_err();
    assert!(matches!(err, EvalError::UnresolvedIndicator { .. }));
}

#[rstest]
#[case(MissingValueStrategy::SkipIfAllValuesMissing, None)]
#[case(MissingValueStrategy::NeverSkip, Some(0.0))]
fn test_missing_org_unit_group_count(
    #[case] strategy: MissingValueStrategy,
    #[case] expected: Option<f64>,
) {
    let ctx = fixture().with_strategy(strategy);
    assert_eq!(eval_in("OUG{ougX}", &ctx), Ok(expected.into()));
}

#[test]
fn test_wildcard_operand_matches_plain_data_element() {
    let ctx = ValueContext::new().with_value(de("deA"), 5.0);
    assert_eq!(eval_in("#{deA.*}", &ctx), Ok(Value::Number(5.0)));
    assert_eq!(eval_in("#{deA.*.*}", &ctx), Ok(Value::Number(5.0)));
}
