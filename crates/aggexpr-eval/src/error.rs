//! Evaluation errors
//!
//! These are fatal failures. A missing data value is never an error; it
//! becomes `Value::Null` or a substituted default according to the
//! missing-value strategy.

use aggexpr_diagnostics::{ErrorCode, ExprError, EXP0201, EXP0202, EXP0203, EXP0204, EXP0205};
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("Type mismatch in {operator}: expected {expected}, found {found}")]
    TypeMismatch {
        operator: String,
        expected: String,
        found: String,
    },

    /// Constants are static configuration and must always be supplied
    #[error("Unresolved constant C{{{uid}}}")]
    UnresolvedConstant { uid: String },

    /// `N{..}` values are pre-computed by the caller
    #[error("No value supplied for indicator N{{{uid}}}")]
    UnresolvedIndicator { uid: String },

    #[error("Invalid argument to {function}(): {message}")]
    InvalidArgument { function: String, message: String },

    #[error("Maximum recursion depth {depth} exceeded")]
    RecursionLimit { depth: usize },
}

impl EvalError {
    pub fn type_mismatch(
        operator: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            operator: operator.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn invalid_argument(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnresolvedConstant { .. } => EXP0201,
            Self::UnresolvedIndicator { .. } => EXP0202,
            Self::TypeMismatch { .. } => EXP0203,
            Self::InvalidArgument { .. } => EXP0204,
            Self::RecursionLimit { .. } => EXP0205,
        }
    }
}

impl From<EvalError> for ExprError {
    fn from(err: EvalError) -> Self {
        ExprError::evaluation(err.code(), err.to_string())
    }
}
