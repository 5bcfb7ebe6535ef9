//! Semantic checks run after a successful parse
//!
//! Structural rules (usage allowlist, arity, aggregate nesting) are collected
//! over the whole tree so a caller sees every violation at once. Type
//! inference runs only on a structurally sound tree and stops at the first
//! mismatch.

use crate::{DataType, MetadataLookup, NoMetadata, TypeError, TypeInferrer};
use aggexpr_ast::{Expression, Function, UsageContext};
use aggexpr_diagnostics::{ExprError, Result};
use log::debug;

static NO_METADATA: NoMetadata = NoMetadata;

/// Checks an expression against its usage context and declared type
pub struct SemanticChecker<'a> {
    usage: UsageContext,
    metadata: &'a dyn MetadataLookup,
}

impl SemanticChecker<'static> {
    /// Checker with untyped items
    pub fn new(usage: UsageContext) -> Self {
        Self {
            usage,
            metadata: &NO_METADATA,
        }
    }
}

impl<'a> SemanticChecker<'a> {
    pub fn with_metadata(usage: UsageContext, metadata: &'a dyn MetadataLookup) -> Self {
        Self { usage, metadata }
    }

    pub fn usage(&self) -> UsageContext {
        self.usage
    }

    /// Allowlist, arity and nesting violations anywhere in the tree
    pub fn structural_errors(&self, expr: &Expression) -> Vec<TypeError> {
        let mut errors = Vec::new();
        self.visit(expr, None, &mut errors);
        errors
    }

    fn visit(&self, expr: &Expression, enclosing: Option<Function>, errors: &mut Vec<TypeError>) {
        if let Expression::FunctionCall(call) = expr {
            let function = call.function;
            if !function.is_allowed_in(self.usage) {
                errors.push(TypeError::NotAllowed {
                    function: function.name(),
                    usage: self.usage,
                });
            }
            if !function.accepts_arity(call.arguments.len()) {
                errors.push(TypeError::argument_count(function, call.arguments.len()));
            }
            if function.is_aggregate() {
                if let Some(outer) = enclosing {
                    errors.push(TypeError::NestedAggregate {
                        outer: outer.name(),
                        inner: function.name(),
                    });
                }
                for arg in &call.arguments {
                    self.visit(arg, Some(function), errors);
                }
                return;
            }
        }

        for child in expr.children() {
            self.visit(child, enclosing, errors);
        }
    }

    /// Full check, returning the inferred result type
    pub fn check(&self, expr: &Expression) -> Result<DataType> {
        Ok(self.check_type(expr)?.unwrap_or_default())
    }

    fn check_type(&self, expr: &Expression) -> Result<Option<DataType>> {
        let errors: Vec<ExprError> = self
            .structural_errors(expr)
            .into_iter()
            .map(ExprError::from)
            .collect();
        if let Some(err) = ExprError::from_many(errors) {
            debug!("semantic check failed for {} usage: {}", self.usage, err);
            return Err(err);
        }

        let inferred = TypeInferrer::new(self.metadata).infer_type(expr)?;
        Ok(inferred)
    }

    /// Full check plus agreement with the declared result type
    pub fn check_as(&self, expr: &Expression, expected: DataType) -> Result<DataType> {
        match self.check_type(expr)? {
            Some(found) if !expected.is_compatible_with(found) => {
                Err(TypeError::ResultType { expected, found }.into())
            }
            Some(found) => Ok(found),
            None => Ok(expected),
        }
    }
}
