//! Values, data types and semantic checking
//!
//! This crate provides:
//! - [`Value`], the runtime value of an expression or data item
//! - [`DataType`], the declared type of expressions and items
//! - [`MetadataLookup`], the collaborator that names and types metadata objects
//! - [`SemanticChecker`], the usage allowlist, arity and type checks run after parsing

mod inference;
mod metadata;
mod semantic;
mod value;

pub use inference::*;
pub use metadata::*;
pub use semantic::*;
pub use value::*;
