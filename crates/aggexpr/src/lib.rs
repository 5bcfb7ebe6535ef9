//! Aggregate expression language for Rust
//!
//! One expression syntax shared by indicators, validation rules and
//! predictors. This crate ties the pieces together:
//! - Parsing with a shared (text, usage) cache
//! - Usage and type checking
//! - Human-readable descriptions
//! - Evaluation with missing-value strategies
//! - Indicator values and indicator reference expansion
//!
//! # Example
//!
//! ```ignore
//! use aggexpr::{ExpressionService, UsageContext};
//!
//! let service = ExpressionService::default();
//! let ctx = service.new_context().with_value(DimensionalItemId::data_element("deA"), 3.0);
//! let value = service.evaluate("#{deA} * 2", UsageContext::Indicator, &ctx)?;
//! ```

// Re-export all public APIs from internal crates
pub use aggexpr_ast as ast;
pub use aggexpr_diagnostics as diagnostics;
pub use aggexpr_eval as eval;
pub use aggexpr_parser as parser;
pub use aggexpr_types as types;

mod config;
mod describe;
mod indicators;
mod service;
mod validity;

pub use config::{ConfigError, ServiceConfig, DEFAULT_INDICATOR_DEPTH};
pub use describe::{describe, DAYS_DESCRIPTION};
pub use indicators::{Indicator, IndicatorExpansion, IndicatorSource};
pub use service::ExpressionService;
pub use validity::{check_expression, is_valid, is_valid_with, ValidationOutcome};

// Convenience re-exports
pub use aggexpr_ast::{DimensionalItemId, Expression, ItemReference, UsageContext};
pub use aggexpr_diagnostics::{ExprError, Result};
pub use aggexpr_eval::{MissingValueStrategy, ValueContext};
pub use aggexpr_parser::parse_expression;
pub use aggexpr_types::{DataType, Value};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
