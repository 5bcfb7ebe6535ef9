//! Static type inference
//!
//! Infers the [`DataType`] of every node bottom-up and rejects operators and
//! functions applied to the wrong kind of value. Item types come from the
//! metadata collaborator; an item without a declared type fits any operator.

use crate::{DataType, MetadataLookup};
use aggexpr_ast::{
    BinaryOpExpr, Expression, Function, FunctionCall, ItemKind, ItemReference, Literal,
    UnaryOp, UsageContext,
};
use aggexpr_diagnostics::{
    ErrorCode, ExprError, EXP0100, EXP0101, EXP0102, EXP0103, EXP0104, EXP0105,
};
use thiserror::Error;

/// Type and usage errors found before evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    #[error("Function {function}() is not allowed in {usage} expressions")]
    NotAllowed {
        function: &'static str,
        usage: UsageContext,
    },

    #[error("Function {function}() expects {expected} argument(s), found {found}")]
    ArgumentCount {
        function: &'static str,
        expected: String,
        found: usize,
    },

    #[error("Type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: DataType,
        found: DataType,
    },

    #[error("Incompatible operand types {left} and {right} for {operation}")]
    IncompatibleOperands {
        operation: String,
        left: DataType,
        right: DataType,
    },

    #[error("Aggregate function {inner}() cannot be nested inside {outer}()")]
    NestedAggregate {
        outer: &'static str,
        inner: &'static str,
    },

    #[error("Invalid argument to {function}(): {message}")]
    InvalidArgument {
        function: &'static str,
        message: String,
    },

    #[error("Expression has type {found} but {expected} was expected")]
    ResultType { expected: DataType, found: DataType },
}

impl TypeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotAllowed { .. } => EXP0100,
            Self::ArgumentCount { .. } => EXP0101,
            Self::TypeMismatch { .. } | Self::IncompatibleOperands { .. } => EXP0102,
            Self::InvalidArgument { .. } => EXP0103,
            Self::NestedAggregate { .. } => EXP0104,
            Self::ResultType { .. } => EXP0105,
        }
    }

    pub(crate) fn argument_count(function: Function, found: usize) -> Self {
        let expected = match function.arity() {
            (min, Some(max)) if min == max => min.to_string(),
            (min, Some(max)) => format!("{} to {}", min, max),
            (min, None) => format!("at least {}", min),
        };
        Self::ArgumentCount {
            function: function.name(),
            expected,
            found,
        }
    }
}

impl From<TypeError> for ExprError {
    fn from(err: TypeError) -> Self {
        ExprError::semantic(err.code(), err.to_string())
    }
}

pub type InferenceResult<T> = Result<T, TypeError>;

/// Bottom-up type inference over an expression tree
pub struct TypeInferrer<'a> {
    metadata: &'a dyn MetadataLookup,
}

impl<'a> TypeInferrer<'a> {
    pub fn new(metadata: &'a dyn MetadataLookup) -> Self {
        Self { metadata }
    }

    pub fn infer_literal(&self, literal: &Literal) -> DataType {
        match literal {
            Literal::Number(_) => DataType::Numeric,
            Literal::String(_) => DataType::Text,
            Literal::Boolean(_) => DataType::Boolean,
        }
    }

    /// Type of an item: counts, rates and indicator values are numbers,
    /// data values take their declared value type. `None` marks an untyped
    /// item, which fits wherever a value is expected.
    pub fn infer_item(&self, reference: &ItemReference) -> Option<DataType> {
        match reference.kind {
            ItemKind::Constant
            | ItemKind::OrgUnitGroup
            | ItemKind::Indicator
            | ItemKind::ProgramIndicator
            | ItemKind::ReportingRate => Some(DataType::Numeric),
            _ => self.metadata.value_type(&reference.dimensional_id()),
        }
    }

    /// Result type of `expr`; an expression made only of untyped items is numeric
    pub fn infer_expression(&self, expr: &Expression) -> InferenceResult<DataType> {
        Ok(self.infer_type(expr)?.unwrap_or_default())
    }

    /// Result type of `expr`, `None` while it depends only on untyped items
    pub fn infer_type(&self, expr: &Expression) -> InferenceResult<Option<DataType>> {
        match expr {
            Expression::Literal(literal) => Ok(Some(self.infer_literal(literal))),
            Expression::Item(reference) => Ok(self.infer_item(reference)),
            Expression::Days => Ok(Some(DataType::Numeric)),
            Expression::UnaryOp(unary) => {
                let operand = self.infer_type(&unary.operand)?;
                let expected = match unary.op {
                    UnaryOp::Not => DataType::Boolean,
                    UnaryOp::Negate | UnaryOp::Plus => DataType::Numeric,
                };
                expect(unary.op.symbol(), expected, operand)?;
                Ok(Some(expected))
            }
            Expression::BinaryOp(binary) => self.infer_binary(binary),
            Expression::FunctionCall(call) => self.infer_call(call),
        }
    }

    fn infer_binary(&self, binary: &BinaryOpExpr) -> InferenceResult<Option<DataType>> {
        let left = self.infer_type(&binary.left)?;
        let right = self.infer_type(&binary.right)?;
        let symbol = binary.op.symbol();

        if binary.op.is_arithmetic() {
            expect(symbol, DataType::Numeric, left)?;
            expect(symbol, DataType::Numeric, right)?;
            Ok(Some(DataType::Numeric))
        } else if binary.op.is_logical() {
            expect(symbol, DataType::Boolean, left)?;
            expect(symbol, DataType::Boolean, right)?;
            Ok(Some(DataType::Boolean))
        } else {
            compatible(symbol, left, right)?;
            Ok(Some(DataType::Boolean))
        }
    }

    fn infer_call(&self, call: &FunctionCall) -> InferenceResult<Option<DataType>> {
        let function = call.function;
        if !function.accepts_arity(call.arguments.len()) {
            return Err(TypeError::argument_count(function, call.arguments.len()));
        }
        let name = function.name();

        match function {
            Function::OrgUnitAncestor | Function::OrgUnitGroup => Ok(Some(DataType::Boolean)),
            Function::If => {
                let cond = self.infer_type(&call.arguments[0])?;
                expect("if() condition", DataType::Boolean, cond)?;
                let then = self.infer_type(&call.arguments[1])?;
                let otherwise = self.infer_type(&call.arguments[2])?;
                compatible("if() branches", then, otherwise)?;
                Ok(then.or(otherwise))
            }
            Function::IsNull | Function::IsNotNull => {
                self.infer_type(&call.arguments[0])?;
                Ok(Some(DataType::Boolean))
            }
            Function::FirstNonNull | Function::Greatest | Function::Least => {
                let mut known: Option<DataType> = None;
                for arg in &call.arguments {
                    let ty = self.infer_type(arg)?;
                    compatible(name, known, ty)?;
                    known = known.or(ty);
                }
                Ok(known)
            }
            Function::Count => {
                self.infer_type(&call.arguments[0])?;
                Ok(Some(DataType::Numeric))
            }
            Function::PercentileCont => {
                if let Expression::Literal(Literal::Number(fraction)) = &call.arguments[0] {
                    if !(0.0..=1.0).contains(fraction) {
                        return Err(TypeError::InvalidArgument {
                            function: name,
                            message: format!("fraction {} is outside 0..1", fraction),
                        });
                    }
                }
                self.numeric_arguments(name, &call.arguments)
            }
            _ => self.numeric_arguments(name, &call.arguments),
        }
    }

    fn numeric_arguments(&self, name: &str, args: &[Expression]) -> InferenceResult<Option<DataType>> {
        for arg in args {
            let ty = self.infer_type(arg)?;
            expect(&format!("{}()", name), DataType::Numeric, ty)?;
        }
        Ok(Some(DataType::Numeric))
    }
}

fn expect(context: &str, expected: DataType, found: Option<DataType>) -> InferenceResult<()> {
    match found {
        Some(found) if !expected.is_compatible_with(found) => Err(TypeError::TypeMismatch {
            context: context.to_string(),
            expected,
            found,
        }),
        _ => Ok(()),
    }
}

fn compatible(
    operation: &str,
    left: Option<DataType>,
    right: Option<DataType>,
) -> InferenceResult<()> {
    match (left, right) {
        (Some(left), Some(right)) if !left.is_compatible_with(right) => {
            Err(TypeError::IncompatibleOperands {
                operation: operation.to_string(),
                left,
                right,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryMetadata, NoMetadata};
    use aggexpr_ast::BinaryOp;
    use pretty_assertions::assert_eq;

    fn de(uid: &str) -> Expression {
        Expression::item(ItemReference::data_element(uid))
    }

    #[test]
    fn test_items_default_to_numeric() {
        let inferrer = TypeInferrer::new(&NoMetadata);
        assert_eq!(inferrer.infer_expression(&de("a")), Ok(DataType::Numeric));
        assert_eq!(inferrer.infer_type(&de("a")), Ok(None));
    }

    #[test]
    fn test_untyped_item_fits_any_operator() {
        let inferrer = TypeInferrer::new(&NoMetadata);
        let text = Expression::binary(de("a"), BinaryOp::Equal, Expression::string("XYZ"));
        let negated = Expression::unary(UnaryOp::Not, de("b"));
        let branch = Expression::call(
            Function::If,
            vec![Expression::boolean(true), de("c"), Expression::string("x")],
        );
        assert_eq!(inferrer.infer_type(&text), Ok(Some(DataType::Boolean)));
        assert_eq!(inferrer.infer_type(&negated), Ok(Some(DataType::Boolean)));
        assert_eq!(inferrer.infer_type(&branch), Ok(Some(DataType::Text)));
    }

    #[test]
    fn test_date_item_compares_with_text() {
        let metadata = InMemoryMetadata::new().with_value_type("dateDe", DataType::Date);
        let inferrer = TypeInferrer::new(&metadata);
        let expr = Expression::binary(de("dateDe"), BinaryOp::Less, Expression::string("2022-02-01"));
        assert_eq!(inferrer.infer_expression(&expr), Ok(DataType::Boolean));
    }

    #[test]
    fn test_text_item_in_arithmetic() {
        let metadata = InMemoryMetadata::new().with_value_type("t", DataType::Text);
        let inferrer = TypeInferrer::new(&metadata);
        let expr = Expression::binary(de("t"), BinaryOp::Add, Expression::number(1.0));
        let err = inferrer.infer_expression(&expr).unwrap_err();
        assert_eq!(err.code(), EXP0102);
    }

    #[test]
    fn test_argument_count_message() {
        let err = TypeError::argument_count(Function::Log, 3);
        assert_eq!(err.to_string(), "Function log() expects 1 to 2 argument(s), found 3");
        assert_eq!(ExprError::from(err).code(), EXP0101);
    }
}
