//! Expression error types

use crate::{ErrorCode, SourceLocation, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A diagnostic message with location and context. Every diagnostic marks
/// an expression that cannot be used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the span (converts to location using provided source)
    pub fn with_span(mut self, span: Span, source: &str) -> Self {
        self.location = Some(SourceLocation::from_span(span, source));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render for a terminal, with the code highlighted
    #[cfg(feature = "colored")]
    pub fn render(&self) -> String {
        use colored::Colorize;

        let mut out = format!("{}[{}]: {}", "error".red().bold(), self.code, self.message);
        if let Some(loc) = &self.location {
            out.push_str(&format!(" {} {}", "at".dimmed(), loc));
        }
        if let Some(help) = self.help.as_ref().map(String::as_str).or(self.code.info().help) {
            out.push_str(&format!("\n  {}: {}", "help".cyan(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {} - {}", self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main expression error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Malformed expression text
    #[error("{code}: {message}")]
    Parse {
        code: ErrorCode,
        message: String,
        expression: String,
        location: Option<SourceLocation>,
        /// The part of the input the parser choked on
        fragment: Option<String>,
    },

    /// Well-formed text that is illegal for its usage or mistyped
    #[error("{code}: {message}")]
    Semantic {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Fatal evaluation failure (never used for missing values)
    #[error("{code}: {message}")]
    Evaluation {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Multiple errors collected
    #[error("Multiple errors: {}", .0.len())]
    Multiple(Vec<ExprError>),
}

impl ExprError {
    /// Create a parse error
    pub fn parse(
        code: ErrorCode,
        message: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            expression: expression.into(),
            location: None,
            fragment: None,
        }
    }

    /// Create a parse error pointing at a byte offset of the expression
    pub fn parse_at(
        code: ErrorCode,
        message: impl Into<String>,
        expression: impl Into<String>,
        offset: usize,
    ) -> Self {
        let expression = expression.into();
        let offset = offset.min(expression.len());
        let rest = expression.get(offset..).unwrap_or_default().trim_end();
        let location = SourceLocation::from_span(Span::new(offset, offset + rest.len()), &expression);
        let fragment = (!rest.is_empty()).then(|| rest.to_string());
        Self::Parse {
            code,
            message: message.into(),
            expression,
            location: Some(location),
            fragment,
        }
    }

    /// Create a semantic error
    pub fn semantic(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Semantic {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Create an evaluation error
    pub fn evaluation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Evaluation {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Attach context (usually the expression text) to a semantic or evaluation error
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        match &mut self {
            Self::Semantic { context, .. } | Self::Evaluation { context, .. } => {
                *context = Some(ctx.into());
            }
            Self::Multiple(errors) => {
                let ctx = ctx.into();
                for error in errors.iter_mut() {
                    *error = error.clone().with_context(ctx.clone());
                }
            }
            Self::Parse { .. } => {}
        }
        self
    }

    /// Collapse a list of errors, keeping a single error unwrapped
    pub fn from_many(mut errors: Vec<ExprError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { code, .. } => *code,
            Self::Semantic { code, .. } => *code,
            Self::Evaluation { code, .. } => *code,
            Self::Multiple(errors) => errors.first().map(|e| e.code()).unwrap_or(ErrorCode::new(0)),
        }
    }

    /// Get the location if available
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Parse { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    pub fn is_parse_error(&self) -> bool {
        self.code().is_parse_error()
    }

    pub fn is_semantic_error(&self) -> bool {
        self.code().is_semantic_error()
    }

    /// Convert to diagnostics, one per underlying error
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Self::Parse { code, message, location, fragment, .. } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(loc) = location {
                    diag = diag.with_location(loc.clone());
                }
                if let Some(fragment) = fragment {
                    diag = diag.with_help(format!("near '{}'", fragment));
                }
                vec![diag]
            }
            Self::Semantic { code, message, context } | Self::Evaluation { code, message, context } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                vec![diag]
            }
            Self::Multiple(errors) => errors.iter().flat_map(|e| e.to_diagnostics()).collect(),
        }
    }
}
