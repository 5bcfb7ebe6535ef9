//! Error codes following a structured numbering system
//!
//! Error code ranges:
//! - EXP0001-EXP0099: Parse errors (syntax)
//! - EXP0100-EXP0199: Semantic errors (usage allowlist, arity, types)
//! - EXP0200-EXP0299: Evaluation errors (runtime)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a parse error (0001-0099)
    pub const fn is_parse_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a semantic error (0100-0199)
    pub const fn is_semantic_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is an evaluation error (0200-0299)
    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EXP{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Parse errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unexpected token"));
    map.insert(2, ErrorInfo::new("Unexpected end of input"));
    map.insert(3, ErrorInfo::new("Invalid item reference")
        .with_help("Item references look like #{uid}, #{uid.uid}, D{program.uid}, R{dataSet.REPORTING_RATE}"));
    map.insert(4, ErrorInfo::new("Unknown function"));
    map.insert(5, ErrorInfo::new("Invalid string escape sequence"));
    map.insert(6, ErrorInfo::new("Unterminated string literal"));
    map.insert(7, ErrorInfo::new("Invalid number format"));
    map.insert(8, ErrorInfo::new("Unknown reporting rate metric"));

    // Semantic errors (0100-0199)
    map.insert(100, ErrorInfo::new("Function not allowed in this usage context")
        .with_help("Predictor aggregates such as sum() and stddev() are only legal in predictors"));
    map.insert(101, ErrorInfo::new("Invalid argument count"));
    map.insert(102, ErrorInfo::new("Type mismatch"));
    map.insert(103, ErrorInfo::new("Invalid argument"));
    map.insert(104, ErrorInfo::new("Nested aggregate function"));
    map.insert(105, ErrorInfo::new("Result type does not match the declared data type"));
    map.insert(106, ErrorInfo::new("Circular indicator reference"));
    map.insert(107, ErrorInfo::new("Indicator reference depth exceeded"));

    // Evaluation errors (0200-0299)
    map.insert(200, ErrorInfo::new("Evaluation failed"));
    map.insert(201, ErrorInfo::new("Unresolved constant")
        .with_help("Constants are static configuration and must be supplied with the value context"));
    map.insert(202, ErrorInfo::new("Unresolved indicator value"));
    map.insert(203, ErrorInfo::new("Type mismatch during evaluation"));
    map.insert(204, ErrorInfo::new("Invalid function argument"));
    map.insert(205, ErrorInfo::new("Recursion limit exceeded"));

    map
});

// Parse errors
pub const EXP0001: ErrorCode = ErrorCode::new(1);
pub const EXP0002: ErrorCode = ErrorCode::new(2);
pub const EXP0003: ErrorCode = ErrorCode::new(3);
pub const EXP0004: ErrorCode = ErrorCode::new(4);
pub const EXP0005: ErrorCode = ErrorCode::new(5);
pub const EXP0006: ErrorCode = ErrorCode::new(6);
pub const EXP0007: ErrorCode = ErrorCode::new(7);
pub const EXP0008: ErrorCode = ErrorCode::new(8);

// Semantic errors
pub const EXP0100: ErrorCode = ErrorCode::new(100);
pub const EXP0101: ErrorCode = ErrorCode::new(101);
pub const EXP0102: ErrorCode = ErrorCode::new(102);
pub const EXP0103: ErrorCode = ErrorCode::new(103);
pub const EXP0104: ErrorCode = ErrorCode::new(104);
pub const EXP0105: ErrorCode = ErrorCode::new(105);
pub const EXP0106: ErrorCode = ErrorCode::new(106);
pub const EXP0107: ErrorCode = ErrorCode::new(107);

// Evaluation errors
pub const EXP0200: ErrorCode = ErrorCode::new(200);
pub const EXP0201: ErrorCode = ErrorCode::new(201);
pub const EXP0202: ErrorCode = ErrorCode::new(202);
pub const EXP0203: ErrorCode = ErrorCode::new(203);
pub const EXP0204: ErrorCode = ErrorCode::new(204);
pub const EXP0205: ErrorCode = ErrorCode::new(205);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(EXP0001.to_string(), "EXP0001");
        assert_eq!(EXP0100.to_string(), "EXP0100");
    }

    #[test]
    fn test_error_categories() {
        assert!(EXP0001.is_parse_error());
        assert!(!EXP0001.is_semantic_error());

        assert!(EXP0100.is_semantic_error());
        assert!(!EXP0100.is_evaluation_error());

        assert!(EXP0201.is_evaluation_error());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(EXP0001.info().description, "Unexpected token");
        assert!(EXP0201.info().help.is_some());
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }
}
