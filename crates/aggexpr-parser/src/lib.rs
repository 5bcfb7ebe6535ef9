//! Parser for the aggregate expression language using winnow
//!
//! Recursive descent with precedence climbing. Any malformed input fails the
//! whole parse; there is no partial result.

mod combinators;
mod expression;

use aggexpr_ast::{Expression, ItemReference};
use aggexpr_diagnostics::{
    ErrorCode, ExprError, Result, EXP0001, EXP0002, EXP0003, EXP0004, EXP0005, EXP0006, EXP0007,
    EXP0008,
};
use combinators::{
    item_parser, ws, LABEL_ESCAPE, LABEL_EXPRESSION, LABEL_FUNCTION, LABEL_ITEM, LABEL_METRIC,
    LABEL_NUMBER, LABEL_STRING,
};
use expression::expression_parser;
use log::trace;
use winnow::error::{ContextError, ErrMode, StrContext};

/// Parse expression text into an AST
pub fn parse_expression(source: &str) -> Result<Expression> {
    let mut input: &str = source;

    let expr = expression_parser(&mut input).map_err(|e| syntax_error(e, source, input))?;
    ws(&mut input).ok();
    if !input.is_empty() {
        return Err(unexpected(source, input));
    }

    trace!("parsed '{}' into {:?}", source, expr);
    Ok(expr)
}

/// Parse a single item token such as `#{deA.cocB}`
pub fn parse_item_reference(source: &str) -> Result<ItemReference> {
    let mut input: &str = source.trim();
    let trimmed = input;

    let reference = item_parser(&mut input).map_err(|e| syntax_error(e, trimmed, input))?;
    if !input.is_empty() {
        return Err(unexpected(trimmed, input));
    }
    Ok(reference)
}

fn offset_of(source: &str, rest: &str) -> usize {
    source.len().saturating_sub(rest.len())
}

/// Error pointing at `rest`, quoting the offending fragment in the message
fn error_at(code: ErrorCode, message: &str, source: &str, rest: &str) -> ExprError {
    let fragment = rest.trim_end();
    let message = if fragment.is_empty() {
        format!("{} at end of expression '{}'", message, source)
    } else {
        format!("{} at '{}' in '{}'", message, fragment, source)
    };
    ExprError::parse_at(code, message, source, offset_of(source, rest))
}

fn unexpected(source: &str, rest: &str) -> ExprError {
    let token = rest.chars().next().unwrap_or_default();
    error_at(EXP0001, &format!("Unexpected '{}'", token), source, rest)
}

fn syntax_error(err: ErrMode<ContextError>, source: &str, rest: &str) -> ExprError {
    let ctx = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let label = ctx.context().find_map(|c| match c {
        StrContext::Label(label) => Some(*label),
        _ => None,
    });
    let at_end = rest.trim().is_empty();

    let (code, message) = match label {
        Some(LABEL_FUNCTION) if !at_end => (EXP0004, "Unknown or malformed function call"),
        Some(LABEL_ITEM) => (EXP0003, "Invalid item reference"),
        Some(LABEL_METRIC) => (EXP0008, "Unknown reporting rate metric"),
        Some(LABEL_STRING) => (EXP0006, "Unterminated string literal"),
        Some(LABEL_ESCAPE) => (EXP0005, "Invalid escape sequence in string literal"),
        Some(LABEL_NUMBER) => (EXP0007, "Invalid number"),
        Some(LABEL_EXPRESSION) | Some(LABEL_FUNCTION) | None if at_end => {
            (EXP0002, "Unexpected end of input")
        }
        _ => (EXP0001, "Syntax error"),
    };

    error_at(code, message, source, rest)
}
