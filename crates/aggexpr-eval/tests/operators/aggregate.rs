//! Aggregate Function Tests
//!
//! Tests for: sum, avg, count, min, max, median, percentileCont, stddev,
//! stddevPop, stddevSamp, variance over predictor sample periods

use super::{assert_number, de, eval_in};
use aggexpr_eval::{EvalError, MissingValueStrategy, SamplePeriod, ValueContext};
use aggexpr_types::Value;
use pretty_assertions::assert_eq;
use rstest::rstest;

use MissingValueStrategy::{NeverSkip, SkipIfAllValuesMissing, SkipIfAnyValueMissing};

/// Two sample periods: `{C: 2}` and `{B: 1, C: 3}`. A is never present.
fn samples(strategy: MissingValueStrategy) -> ValueContext {
    ValueContext::new()
        .with_strategy(strategy)
        .with_sample(SamplePeriod::new("202001").with_value(de("deC"), 2.0))
        .with_sample(
            SamplePeriod::new("202002")
                .with_value(de("deB"), 1.0)
                .with_value(de("deC"), 3.0),
        )
}

fn aggregate(source: &str, strategy: MissingValueStrategy) -> Value {
    eval_in(source, &samples(strategy))
        .unwrap_or_else(|e| panic!("Failed to evaluate '{}': {}", source, e))
}

// === Strategy applies per sample period ===

#[rstest]
#[case("sum(#{deA} + #{deA})", SkipIfAnyValueMissing, None)]
#[case("sum(#{deA} + #{deA})", SkipIfAllValuesMissing, None)]
#[case("sum(#{deA} + #{deA})", NeverSkip, Some(0.0))]
#[case("sum(#{deA} + #{deB})", SkipIfAnyValueMissing, None)]
#[case("sum(#{deA} + #{deB})", SkipIfAllValuesMissing, Some(1.0))]
#[case("sum(#{deA} + #{deB})", NeverSkip, Some(1.0))]
#[case("sum(#{deB} + #{deC})", SkipIfAnyValueMissing, Some(4.0))]
#[case("sum(#{deB} + #{deC})", SkipIfAllValuesMissing, Some(6.0))]
#[case("sum(#{deB} + #{deC})", NeverSkip, Some(6.0))]
fn test_sum_per_period_strategy(
    #[case] source: &str,
    #[case] strategy: MissingValueStrategy,
    #[case] expected: Option<f64>,
) {
    let value = aggregate(source, strategy);
    match expected {
        Some(n) => assert_number(value, n),
        None => assert_eq!(value, Value::Null),
    }
}

// === Reductions ===

#[rstest]
#[case("avg(#{deC})", 2.5)]
#[case("count(#{deC})", 2.0)]
#[case("count(#{deB})", 1.0)]
#[case("min(#{deC})", 2.0)]
#[case("max(#{deC})", 3.0)]
#[case("median(#{deC})", 2.5)]
#[case("percentileCont(0.5, #{deC})", 2.5)]
#[case("percentileCont(0.0, #{deC})", 2.0)]
#[case("percentileCont(1, #{deC})", 3.0)]
#[case("stddev(#{deC})", 0.5)]
#[case("stddevPop(#{deC})", 0.5)]
#[case("stddevSamp(#{deC})", 0.7071067811865476)]
#[case("variance(#{deC})", 0.5)]
#[case("sum(#{deC}) * 2", 10.0)]
fn test_reductions(#[case] source: &str, #[case] expected: f64) {
    assert_number(aggregate(source, SkipIfAllValuesMissing), expected);
}

#[rstest]
#[case("count(#{deA})")]
#[case("avg(#{deA})")]
#[case("stddevSamp(#{deB})")]
#[case("variance(#{deB})")]
fn test_no_usable_samples_has_no_value(#[case] source: &str) {
    assert_eq!(aggregate(source, SkipIfAllValuesMissing), Value::Null);
}

#[test]
fn test_without_samples() {
    assert_eq!(eval_in("sum(#{deC})", &ValueContext::new()), Ok(Value::Null));
}

#[test]
fn test_percentile_fraction_out_of_range() {
    let err = eval_in("percentileCont(1.5, #{deC})", &samples(NeverSkip)).unwrap_err();
    assert!(matches!(err, EvalError::InvalidArgument { .. }), "{:?}", err);
}

#[test]
fn test_items_outside_aggregate_use_current_values() {
    let ctx = samples(SkipIfAllValuesMissing).with_value(de("deC"), 10.0);
    assert_number(eval_in("#{deC} - avg(#{deC})", &ctx).unwrap(), 7.5);
}
