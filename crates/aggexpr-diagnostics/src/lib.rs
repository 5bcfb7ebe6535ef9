//! Diagnostics for the aggregate expression language
//!
//! Error codes, source locations and the [`ExprError`] type shared by the
//! parser, the semantic checker and the evaluator.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for expression operations
pub type Result<T> = std::result::Result<T, ExprError>;
