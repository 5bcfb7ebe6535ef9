//! CLI functionality for the aggexpr tool
//!
//! This module contains all CLI-related functionality including:
//! - Parsing, describing and validating expressions
//! - Evaluation against a JSON value context
//! - Indicator values
//! - Logging and output formatting

pub mod context;
pub mod describe;
pub mod evaluate;
pub mod indicator;
pub mod logger;
pub mod output;
pub mod parse;
pub mod validate;
