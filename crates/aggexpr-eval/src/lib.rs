//! Aggregate Expression Evaluation Engine
//!
//! Evaluates parsed expressions against caller-supplied values:
//!
//! - **Arithmetic**: `+ - * / % ^` over numbers; division by zero has no value
//! - **Comparison and equality**: numbers, text, dates (as ISO text) and booleans
//! - **Logic**: `&& || !` with three-valued semantics
//! - **Functions**: `if`, `isNull`, `isNotNull`, `firstNonNull`, `greatest`,
//!   `least`, `log`, `log10` and the `orgUnit.*` predicates
//! - **Aggregates**: predictor functions (`sum`, `avg`, `stddev`, ...) over
//!   sample periods
//! - **Indicators**: numerator / denominator with factor and annualization
//!
//! # Example
//!
//! ```ignore
//! use aggexpr_eval::{ExpressionEngine, ValueContext};
//! use aggexpr_ast::DimensionalItemId;
//!
//! let expr = aggexpr_parser::parse_expression("#{deA} + 1")?;
//! let ctx = ValueContext::new().with_value(DimensionalItemId::data_element("deA"), 2.0);
//! let value = ExpressionEngine::new().evaluate(&expr, &ctx)?;
//! ```
//!
//! # Missing values
//!
//! A [`MissingValueStrategy`] decides, from the data items an expression
//! references, whether the expression has a value at all. When it does,
//! absent items are replaced by the default of their type. `isNull`,
//! `isNotNull`, `firstNonNull`, `greatest` and `least` see absent items as
//! null regardless.

pub mod context;
pub mod engine;
pub mod error;
pub mod indicator;
mod operators;
pub mod period;
pub mod resolver;

// Re-export main types
pub use context::{MissingValueStrategy, OrgUnitInfo, SamplePeriod, ValueContext};
pub use engine::{ExpressionEngine, DEFAULT_MAX_DEPTH};
pub use error::{EvalError, EvalResult};
pub use indicator::{IndicatorFactor, IndicatorValue};
pub use period::{Period, PeriodType};
pub use resolver::{dimensional_item_ids, resolve, ObjectLookup};
