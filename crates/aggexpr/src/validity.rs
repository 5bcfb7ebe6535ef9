//! Validity checks per usage context
//!
//! Never fails: every problem folds into [`ValidationOutcome::ExpressionIsNotWellFormed`].
//! No metadata object is looked up, so dangling references do not make an
//! expression invalid.

use aggexpr_ast::{Expression, UsageContext};
use aggexpr_diagnostics::Result;
use aggexpr_parser::parse_expression;
use aggexpr_types::{DataType, MetadataLookup, NoMetadata, SemanticChecker};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationOutcome {
    Valid,
    ExpressionIsNotWellFormed,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::ExpressionIsNotWellFormed => "EXPRESSION_IS_NOT_WELL_FORMED",
        }
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<T> From<&Result<T>> for ValidationOutcome {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Valid,
            Err(_) => Self::ExpressionIsNotWellFormed,
        }
    }
}

/// Semantic check of a parsed tree; `expected` also checks the result type
pub fn check_expression(
    expr: &Expression,
    usage: UsageContext,
    metadata: &dyn MetadataLookup,
    expected: Option<DataType>,
) -> Result<DataType> {
    let checker = SemanticChecker::with_metadata(usage, metadata);
    match expected {
        Some(data_type) => checker.check_as(expr, data_type),
        None => checker.check(expr),
    }
}

/// Parse and check `text` for `usage`, with untyped items
pub fn is_valid(text: &str, usage: UsageContext) -> ValidationOutcome {
    is_valid_with(text, usage, &NoMetadata, None)
}

/// Parse and check `text`, typing items through `metadata`
pub fn is_valid_with(
    text: &str,
    usage: UsageContext,
    metadata: &dyn MetadataLookup,
    expected: Option<DataType>,
) -> ValidationOutcome {
    let result = parse_expression(text)
        .and_then(|expr| check_expression(&expr, usage, metadata, expected));
    if let Err(err) = &result {
        debug!("'{}' is not well formed for {}: {}", text, usage, err);
    }
    ValidationOutcome::from(&result)
}
