//! Abstract syntax tree for the aggregate expression language
//!
//! The node set is closed: literals, item references, function calls, unary
//! and binary operators, and the `[days]` keyword. Nodes are built once per
//! parse and never mutated afterwards.

mod expression;
mod function;
mod item;
mod operator;
mod usage;
pub mod visit;

pub use expression::*;
pub use function::*;
pub use item::*;
pub use operator::*;
pub use usage::*;

/// Type alias for boxed expressions
pub type BoxExpr = Box<Expression>;
