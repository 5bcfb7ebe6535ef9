//! Operator integration tests for expression evaluation
//!
//! These tests parse real expression text and evaluate it against a shared
//! fixture of item values:
//! - `#{deA}` = 3, `#{deB}` = 13
//! - `#{deC}`, `#{deD}`, `#{deE}` have no value
//! - `#{deF}` is text, `#{deG}` a date and `#{deH}` a boolean

mod aggregate;
mod arithmetic;
mod comparison;
mod functions;
mod items;
mod logical;
mod missing_values;

use aggexpr_ast::DimensionalItemId;
use aggexpr_eval::{EvalResult, ExpressionEngine, MissingValueStrategy, ValueContext};
use aggexpr_parser::parse_expression;
use aggexpr_types::{DataType, Value};

// ============================================================================
// Test Helpers
// ============================================================================

pub const DELTA: f64 = 1e-10;

pub fn de(uid: &str) -> DimensionalItemId {
    DimensionalItemId::data_element(uid)
}

pub fn fixture() -> ValueContext {
    ValueContext::new()
        .with_value(de("deA"), 3.0)
        .with_value(de("deB"), 13.0)
        .with_value(de("deF"), "Str")
        .with_value(de("deG"), "2022-01-15")
        .with_value(de("deH"), true)
        .with_item_type(de("deF"), DataType::Text)
        .with_item_type(de("deG"), DataType::Date)
        .with_item_type(de("deH"), DataType::Boolean)
}

pub fn eval_in(source: &str, ctx: &ValueContext) -> EvalResult<Value> {
    let expr = parse_expression(source)
        .unwrap_or_else(|e| panic!("Failed to parse '{}': {:?}", source, e));
    ExpressionEngine::new().evaluate(&expr, ctx)
}

pub fn eval(source: &str) -> Value {
    eval_with(source, MissingValueStrategy::NeverSkip)
}

pub fn eval_with(source: &str, strategy: MissingValueStrategy) -> Value {
    eval_in(source, &fixture().with_strategy(strategy))
        .unwrap_or_else(|e| panic!("Failed to evaluate '{}': {}", source, e))
}

pub fn assert_number(value: Value, expected: f64) {
    match value {
        Value::Number(n) if expected.is_nan() => assert!(n.is_nan(), "expected NaN, got {}", n),
        Value::Number(n) if expected.is_infinite() => assert_eq!(n, expected),
        Value::Number(n) => assert!(
            (n - expected).abs() < DELTA,
            "expected {}, got {}",
            expected,
            n
        ),
        other => panic!("expected number {}, got {:?}", expected, other),
    }
}
