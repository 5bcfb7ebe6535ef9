//! `orgUnit.ancestor(..)` and `orgUnit.group(..)`
//!
//! Both are false when the context names no org unit.

use crate::engine::{ExpressionEngine, Frame};
use aggexpr_ast::{Expression, Literal};
use aggexpr_types::Value;

fn uids(args: &[Expression]) -> impl Iterator<Item = &str> {
    args.iter().filter_map(|arg| match arg {
        Expression::Literal(Literal::String(uid)) => Some(uid.as_str()),
        _ => None,
    })
}

impl ExpressionEngine {
    pub(super) fn eval_org_unit_ancestor(&self, args: &[Expression], frame: &Frame<'_>) -> Value {
        let found = frame
            .ctx
            .org_unit
            .as_ref()
            .is_some_and(|ou| uids(args).any(|uid| ou.is_or_descends_from(uid)));
        Value::Boolean(found)
    }

    pub(super) fn eval_org_unit_group(&self, args: &[Expression], frame: &Frame<'_>) -> Value {
        let found = frame
            .ctx
            .org_unit
            .as_ref()
            .is_some_and(|ou| uids(args).any(|group| ou.is_member_of(group)));
        Value::Boolean(found)
    }
}
