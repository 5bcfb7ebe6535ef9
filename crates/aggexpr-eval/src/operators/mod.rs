//! Operator and function implementations, organized by category:
//! - Arithmetic (`+ - * / % ^`, unary sign)
//! - Comparison (`< > <= >= == !=`)
//! - Logical (`&& || !`) with three-valued logic
//! - Scalar functions (`if`, null tests, `greatest`, `least`, `log`)
//! - Predictor aggregates over sample periods
//! - Org unit membership tests

mod aggregate;
mod arithmetic;
mod comparison;
mod functions;
mod logical;
mod org_unit;

use crate::engine::{ExpressionEngine, Frame};
use crate::error::EvalResult;
use aggexpr_ast::{BinaryOp, BinaryOpExpr, Expression, UnaryOp, UnaryOpExpr};
use aggexpr_types::Value;

impl ExpressionEngine {
    pub(crate) fn eval_unary(&self, expr: &UnaryOpExpr, frame: &mut Frame<'_>) -> EvalResult<Value> {
        let operand = self.eval(&expr.operand, frame)?;
        match expr.op {
            UnaryOp::Not => logical::not(operand),
            UnaryOp::Negate | UnaryOp::Plus => arithmetic::sign(expr.op, operand),
        }
    }

    /// Operator chains such as `a + b + c + ...` parse left-deep, so the
    /// left spine is walked in a loop and only right operands recurse.
    pub(crate) fn eval_binary(&self, expr: &BinaryOpExpr, frame: &mut Frame<'_>) -> EvalResult<Value> {
        let mut spine = vec![expr];
        let mut leftmost: &Expression = expr.left.as_ref();
        while let Expression::BinaryOp(inner) = leftmost {
            spine.push(inner);
            leftmost = inner.left.as_ref();
        }

        let mut value = self.eval(leftmost, frame)?;
        for binary in spine.into_iter().rev() {
            let right = self.eval(&binary.right, frame)?;
            value = apply_binary(binary.op, value, right)?;
        }
        Ok(value)
    }
}

fn apply_binary(op: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
    match op {
        BinaryOp::And => logical::and(left, right),
        BinaryOp::Or => logical::or(left, right),
        BinaryOp::Equal | BinaryOp::NotEqual => comparison::equality(op, &left, &right),
        op if op.is_comparison() => comparison::compare(op, &left, &right),
        op => arithmetic::binary(op, &left, &right),
    }
}
