//! Expression evaluation engine
//!
//! The engine walks the AST against a [`ValueContext`]. Missing-value
//! handling is decided once per call from the items referenced anywhere in
//! the tree, both `if` branches included, and then applied uniformly.

use crate::context::{MissingValueStrategy, ValueContext};
use crate::error::{EvalError, EvalResult};
use aggexpr_ast::visit::walk_items;
use aggexpr_ast::{DimensionalItemId, Expression, ItemKind, ItemReference, Literal};
use aggexpr_types::Value;
use indexmap::IndexSet;
use log::{debug, trace};
use std::collections::HashMap;

/// Default bound on evaluation nesting. Left-deep operator chains do not
/// count towards it, only nested operands, calls and parentheses.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Per-call evaluation state. Aggregates open a fresh frame per sample period.
pub(crate) struct Frame<'c> {
    pub ctx: &'c ValueContext,
    pub values: &'c HashMap<DimensionalItemId, Value>,
    /// Replace absent items with the default of their type
    pub substitute: bool,
    pub depth: usize,
}

/// Outcome of applying the missing-value strategy to an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Evaluate, substituting defaults for absent items
    Evaluate,
    /// The result is no value
    Skip,
}

/// The evaluator. Stateless apart from its depth limit, so one engine can
/// serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct ExpressionEngine {
    max_depth: usize,
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEngine {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluate an expression. `Value::Null` means "no value".
    pub fn evaluate(&self, expr: &Expression, ctx: &ValueContext) -> EvalResult<Value> {
        let decision = decide(expr, &ctx.values, ctx, ctx.missing_value_strategy);
        debug!(
            "evaluating with {} -> {:?}",
            ctx.missing_value_strategy, decision
        );

        let mut frame = Frame {
            ctx,
            values: &ctx.values,
            substitute: decision == Decision::Evaluate,
            depth: 0,
        };
        let value = self.eval(expr, &mut frame)?;

        // Present items are still evaluated so fatal errors surface
        Ok(match decision {
            Decision::Evaluate => value,
            Decision::Skip => Value::Null,
        })
    }

    /// Main dispatcher
    pub(crate) fn eval(&self, expr: &Expression, frame: &mut Frame<'_>) -> EvalResult<Value> {
        if frame.depth >= self.max_depth {
            return Err(EvalError::RecursionLimit {
                depth: self.max_depth,
            });
        }
        frame.depth += 1;

        let result = match expr {
            Expression::Literal(literal) => Ok(eval_literal(literal)),
            Expression::Item(reference) => self.eval_item(reference, frame),
            Expression::Days => Ok(frame
                .ctx
                .days
                .map_or(Value::Null, |d| Value::Number(f64::from(d)))),
            Expression::UnaryOp(unary) => self.eval_unary(unary, frame),
            Expression::BinaryOp(binary) => self.eval_binary(binary, frame),
            Expression::FunctionCall(call) => self.eval_call(call, frame),
        };

        frame.depth -= 1;
        trace!("{:?} => {:?}", expr, result);
        result
    }

    fn eval_item(&self, reference: &ItemReference, frame: &Frame<'_>) -> EvalResult<Value> {
        let id = reference.dimensional_id();
        let found = match reference.kind {
            ItemKind::Constant => {
                return frame
                    .ctx
                    .constants
                    .get(id.uid())
                    .map(|c| Value::Number(*c))
                    .ok_or_else(|| EvalError::UnresolvedConstant {
                        uid: id.uid().to_string(),
                    });
            }
            ItemKind::Indicator => {
                return lookup(frame.values, &id)
                    .or_else(|| lookup(&frame.ctx.values, &id))
                    .ok_or_else(|| EvalError::UnresolvedIndicator {
                        uid: id.uid().to_string(),
                    });
            }
            ItemKind::OrgUnitGroup => frame
                .ctx
                .org_unit_group_counts
                .get(id.uid())
                .map(|count| Value::Number(*count)),
            _ => lookup(frame.values, &id),
        };

        Ok(match found {
            Some(value) => value,
            None if frame.substitute => frame.ctx.item_type(&id).default_value(),
            None => Value::Null,
        })
    }

    /// Evaluate with absent items left as null, for functions that test presence
    pub(crate) fn eval_raw(&self, expr: &Expression, frame: &mut Frame<'_>) -> EvalResult<Value> {
        let substitute = std::mem::replace(&mut frame.substitute, false);
        let result = self.eval(expr, frame);
        frame.substitute = substitute;
        result
    }
}

fn eval_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::Text(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
    }
}

fn lookup(values: &HashMap<DimensionalItemId, Value>, id: &DimensionalItemId) -> Option<Value> {
    values.get(id).filter(|v| !v.is_null()).cloned()
}

/// Whether a data item has a value in the given map
fn is_present(
    reference: &ItemReference,
    id: &DimensionalItemId,
    values: &HashMap<DimensionalItemId, Value>,
    ctx: &ValueContext,
) -> bool {
    match reference.kind {
        ItemKind::OrgUnitGroup => ctx.org_unit_group_counts.contains_key(id.uid()),
        _ => values.get(id).is_some_and(|v| !v.is_null()),
    }
}

/// Apply a missing-value strategy to the data items of `expr` that are
/// evaluated against `values`. Items inside sample aggregates are decided
/// per period by the aggregate itself.
pub(crate) fn decide(
    expr: &Expression,
    values: &HashMap<DimensionalItemId, Value>,
    ctx: &ValueContext,
    strategy: MissingValueStrategy,
) -> Decision {
    let mut items: IndexSet<DimensionalItemId> = IndexSet::new();
    let mut present = 0usize;
    walk_items(expr, &mut |reference, in_aggregate| {
        if in_aggregate || !reference.kind.is_data_item() {
            return;
        }
        let id = reference.dimensional_id();
        if !items.contains(&id) {
            if is_present(reference, &id, values, ctx) {
                present += 1;
            }
            items.insert(id);
        }
    });

    let found = items.len();
    match strategy {
        MissingValueStrategy::SkipIfAnyValueMissing if present < found => Decision::Skip,
        MissingValueStrategy::SkipIfAnyValueMissing | MissingValueStrategy::SkipIfAllValuesMissing
            if found > 0 && present == 0 =>
        {
            Decision::Skip
        }
        _ => Decision::Evaluate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggexpr_ast::{BinaryOp, UnaryOp};
    use pretty_assertions::assert_eq;

    fn de(uid: &str) -> Expression {
        Expression::item(ItemReference::data_element(uid))
    }

    #[test]
    fn test_decision_counts_distinct_items() {
        let ctx = ValueContext::new().with_value(DimensionalItemId::data_element("a"), 1.0);
        let expr = Expression::binary(de("a"), BinaryOp::Add, de("a"));
        assert_eq!(
            decide(&expr, &ctx.values, &ctx, MissingValueStrategy::SkipIfAnyValueMissing),
            Decision::Evaluate
        );
    }

    #[test]
    fn test_constants_are_not_counted() {
        let ctx = ValueContext::new().with_constant("c", 2.0);
        let expr = Expression::item(ItemReference::single(ItemKind::Constant, "c"));
        assert_eq!(
            decide(&expr, &ctx.values, &ctx, MissingValueStrategy::SkipIfAllValuesMissing),
            Decision::Evaluate
        );
    }

    #[test]
    fn test_recursion_limit() {
        let mut expr = Expression::number(1.0);
        for _ in 0..10 {
            expr = Expression::unary(UnaryOp::Negate, expr);
        }
        let engine = ExpressionEngine::with_max_depth(5);
        let err = engine.evaluate(&expr, &ValueContext::new()).unwrap_err();
        assert_eq!(err, EvalError::RecursionLimit { depth: 5 });
        assert_eq!(
            ExpressionEngine::new().evaluate(&expr, &ValueContext::new()),
            Ok(Value::Number(1.0))
        );
    }

    #[test]
    fn test_operator_chains_do_not_count_as_nesting() {
        let expr = (1..1000).fold(de("a"), |acc, _| Expression::binary(acc, BinaryOp::Add, de("a")));
        let ctx = ValueContext::new().with_value(DimensionalItemId::data_element("a"), 1.0);
        let engine = ExpressionEngine::with_max_depth(5);
        assert_eq!(engine.evaluate(&expr, &ctx), Ok(Value::Number(1000.0)));
    }
}
