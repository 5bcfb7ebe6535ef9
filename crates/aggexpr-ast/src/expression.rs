//! Expression AST nodes

use crate::{BinaryOp, BoxExpr, Function, ItemReference, UnaryOp};
use serde::{Deserialize, Serialize};

/// A literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Numeric literal, always double precision
    Number(f64),
    /// Single-quoted string literal (escapes already resolved)
    String(String),
    Boolean(bool),
}

/// All expression node kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal(Literal),
    /// `#{..}`, `D{..}`, `A{..}`, `I{..}`, `R{..}`, `C{..}`, `OUG{..}`, `N{..}`
    Item(ItemReference),
    FunctionCall(FunctionCall),
    UnaryOp(UnaryOpExpr),
    BinaryOp(BinaryOpExpr),
    /// `[days]`
    Days,
}

/// Function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub function: Function,
    /// For `orgUnit.group`/`orgUnit.ancestor` these are string literals
    /// holding the bare uids as written.
    pub arguments: Vec<Expression>,
}

/// Unary operation expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOpExpr {
    pub op: UnaryOp,
    pub operand: BoxExpr,
}

/// Binary operation expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOpExpr {
    pub left: BoxExpr,
    pub op: BinaryOp,
    pub right: BoxExpr,
}

impl Expression {
    pub fn number(value: f64) -> Self {
        Self::Literal(Literal::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    pub fn item(reference: ItemReference) -> Self {
        Self::Item(reference)
    }

    pub fn call(function: Function, arguments: Vec<Expression>) -> Self {
        Self::FunctionCall(FunctionCall { function, arguments })
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Self::UnaryOp(UnaryOpExpr {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Self::BinaryOp(BinaryOpExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    /// Binding strength of the node when rendered, on the operator scale.
    /// Atoms and calls bind tightest.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::BinaryOp(b) => b.op.precedence(),
            Self::UnaryOp(u) => u.op.precedence(),
            _ => u8::MAX,
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Self::Literal(_) | Self::Item(_) | Self::Days => Vec::new(),
            Self::FunctionCall(call) => call.arguments.iter().collect(),
            Self::UnaryOp(u) => vec![u.operand.as_ref()],
            Self::BinaryOp(b) => vec![b.left.as_ref(), b.right.as_ref()],
        }
    }

    /// Tree depth, counting this node
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expression::depth)
            .max()
            .unwrap_or(0)
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<ItemReference> for Expression {
    fn from(reference: ItemReference) -> Self {
        Self::Item(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth() {
        let expr = Expression::binary(
            Expression::number(1.0),
            BinaryOp::Add,
            Expression::unary(UnaryOp::Negate, Expression::number(2.0)),
        );
        assert_eq!(expr.depth(), 3);
        assert_eq!(Expression::Days.depth(), 1);
    }
}
