//! Missing Value Strategy Tests
//!
//! Tests for: NEVER_SKIP, SKIP_IF_ANY_VALUE_MISSING, SKIP_IF_ALL_VALUES_MISSING,
//! typed defaults, and items referenced only in an untaken `if` branch

use super::{assert_number, de, eval_in, eval_with};
use aggexpr_eval::{MissingValueStrategy, ValueContext};
use aggexpr_types::{DataType, Value};
use pretty_assertions::assert_eq;
use rstest::rstest;

use MissingValueStrategy::{NeverSkip, SkipIfAllValuesMissing, SkipIfAnyValueMissing};

// === Strategy table ===

#[rstest]
#[case("#{deA} + #{deB}", SkipIfAnyValueMissing, Some(16.0))]
#[case("#{deA} + #{deB} + #{deC}", SkipIfAnyValueMissing, None)]
#[case("#{deC} + #{deD} + #{deE}", SkipIfAnyValueMissing, None)]
#[case("#{deA} + #{deB}", SkipIfAllValuesMissing, Some(16.0))]
#[case("#{deA} + #{deB} + #{deC}", SkipIfAllValuesMissing, Some(16.0))]
#[case("#{deC} + #{deD} + #{deE}", SkipIfAllValuesMissing, None)]
#[case("#{deA} + #{deB} + #{deC}", NeverSkip, Some(16.0))]
#[case("#{deC} + #{deD} + #{deE}", NeverSkip, Some(0.0))]
#[case("#{deE}", NeverSkip, Some(0.0))]
#[case("#{deE}", SkipIfAllValuesMissing, None)]
fn test_strategy(
    #[case] source: &str,
    #[case] strategy: MissingValueStrategy,
    #[case] expected: Option<f64>,
) {
    let value = eval_with(source, strategy);
    match expected {
        Some(n) => assert_number(value, n),
        None => assert_eq!(value, Value::Null),
    }
}

// === Expressions without data items always evaluate ===

#[rstest]
#[case(SkipIfAnyValueMissing)]
#[case(SkipIfAllValuesMissing)]
#[case(NeverSkip)]
fn test_constant_expression_always_has_value(#[case] strategy: MissingValueStrategy) {
    assert_number(eval_with("1 + 2", strategy), 3.0);
}

// === Items in both branches of `if` count ===

#[test]
fn test_untaken_branch_items_count() {
    let value = eval_with("if(true, #{deA}, #{deC})", SkipIfAnyValueMissing);
    assert_eq!(value, Value::Null);

    let value = eval_with("if(true, #{deA}, #{deC})", SkipIfAllValuesMissing);
    assert_number(value, 3.0);
}

// === Defaults follow the declared item type ===

#[rstest]
#[case(DataType::Numeric, Value::Number(0.0))]
#[case(DataType::Text, Value::Text(String::new()))]
#[case(DataType::Date, Value::Text(String::new()))]
#[case(DataType::Boolean, Value::Boolean(false))]
fn test_typed_defaults(#[case] data_type: DataType, #[case] expected: Value) {
    let ctx = ValueContext::new()
        .with_strategy(NeverSkip)
        .with_item_type(de("deX"), data_type);
    assert_eq!(eval_in("#{deX}", &ctx), Ok(expected));
}

#[test]
fn test_skipped_expression_still_reports_fatal_errors() {
    let ctx = ValueContext::new().with_strategy(SkipIfAllValuesMissing);
    assert!(eval_in("#{deC} + C{missing}", &ctx).is_err());
}
