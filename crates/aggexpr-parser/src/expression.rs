//! Expression parser using recursive descent with precedence climbing
//!
//! One function per precedence level, loosest first:
//! `||`, `&&`, unary `!`, `== !=`, `< > <= >=`, `+ -`, `* / %`,
//! unary `+ -`, `^` (right-associative), atoms.

use crate::combinators::{
    backtrack, boolean_parser, cut_fail, days_parser, function_name_parser, item_parser, lit,
    number_parser, string_parser, uid_parser, ws, Input, PResult, LABEL_EXPRESSION,
    LABEL_FUNCTION,
};
use aggexpr_ast::{BinaryOp, Expression, Function, UnaryOp};
use winnow::combinator::{alt, cut_err, separated};
use winnow::error::StrContext;
use winnow::prelude::*;

/// Parse an expression (entry point)
pub fn expression_parser<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    ws.parse_next(input)?;
    or_expression(input)
}

/// Right-hand operand after a consumed operator; the operator commits the parse
fn operand<'a>(
    input: &mut Input<'a>,
    level: fn(&mut Input<'a>) -> PResult<Expression>,
) -> PResult<Expression> {
    cut_err(level)
        .context(StrContext::Label(LABEL_EXPRESSION))
        .parse_next(input)
}

/// Right operand of a binary operator. A leading `!` starts a negation,
/// which then reaches as far as its own precedence allows.
fn right_operand<'a>(
    input: &mut Input<'a>,
    level: fn(&mut Input<'a>) -> PResult<Expression>,
) -> PResult<Expression> {
    ws.parse_next(input)?;
    if input.starts_with('!') && !input.starts_with("!=") {
        operand(input, not_expression)
    } else {
        operand(input, level)
    }
}

/// Parse `||`
fn or_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let mut left = and_expression(input)?;

    loop {
        ws.parse_next(input)?;
        if lit("||").parse_next(input).is_ok() {
            let right = operand(input, and_expression)?;
            left = Expression::binary(left, BinaryOp::Or, right);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse `&&`
fn and_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let mut left = not_expression(input)?;

    loop {
        ws.parse_next(input)?;
        if lit("&&").parse_next(input).is_ok() {
            let right = operand(input, not_expression)?;
            left = Expression::binary(left, BinaryOp::And, right);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse unary `!`, which binds looser than equality
fn not_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    ws.parse_next(input)?;

    let checkpoint = *input;
    if lit("!").parse_next(input).is_ok() {
        if input.starts_with('=') {
            // `!=` in operand position is not a negation
            *input = checkpoint;
            return backtrack(input);
        }
        let inner = operand(input, not_expression)?;
        return Ok(Expression::unary(UnaryOp::Not, inner));
    }

    equality_expression(input)
}

/// Parse `==` and `!=`
fn equality_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let mut left = relational_expression(input)?;

    loop {
        ws.parse_next(input)?;

        let op = if lit("==").parse_next(input).is_ok() {
            Some(BinaryOp::Equal)
        } else if lit("!=").parse_next(input).is_ok() {
            Some(BinaryOp::NotEqual)
        } else {
            None
        };

        if let Some(op) = op {
            let right = right_operand(input, relational_expression)?;
            left = Expression::binary(left, op, right);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse `<`, `>`, `<=`, `>=`
fn relational_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let mut left = additive_expression(input)?;

    loop {
        ws.parse_next(input)?;

        let op = if lit("<=").parse_next(input).is_ok() {
            Some(BinaryOp::LessOrEqual)
        } else if lit(">=").parse_next(input).is_ok() {
            Some(BinaryOp::GreaterOrEqual)
        } else if lit("<").parse_next(input).is_ok() {
            Some(BinaryOp::Less)
        } else if lit(">").parse_next(input).is_ok() {
            Some(BinaryOp::Greater)
        } else {
            None
        };

        if let Some(op) = op {
            let right = right_operand(input, additive_expression)?;
            left = Expression::binary(left, op, right);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse binary `+` and `-`
fn additive_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let mut left = multiplicative_expression(input)?;

    loop {
        ws.parse_next(input)?;

        let op = if lit("+").parse_next(input).is_ok() {
            Some(BinaryOp::Add)
        } else if lit("-").parse_next(input).is_ok() {
            Some(BinaryOp::Subtract)
        } else {
            None
        };

        if let Some(op) = op {
            let right = right_operand(input, multiplicative_expression)?;
            left = Expression::binary(left, op, right);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse `*`, `/`, `%`
fn multiplicative_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let mut left = unary_expression(input)?;

    loop {
        ws.parse_next(input)?;

        let op = if lit("*").parse_next(input).is_ok() {
            Some(BinaryOp::Multiply)
        } else if lit("/").parse_next(input).is_ok() {
            Some(BinaryOp::Divide)
        } else if lit("%").parse_next(input).is_ok() {
            Some(BinaryOp::Modulo)
        } else {
            None
        };

        if let Some(op) = op {
            let right = right_operand(input, unary_expression)?;
            left = Expression::binary(left, op, right);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse unary `+` and `-`
fn unary_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    ws.parse_next(input)?;

    if lit("-").parse_next(input).is_ok() {
        let inner = operand(input, unary_expression)?;
        return Ok(Expression::unary(UnaryOp::Negate, inner));
    }

    if lit("+").parse_next(input).is_ok() {
        let inner = operand(input, unary_expression)?;
        return Ok(Expression::unary(UnaryOp::Plus, inner));
    }

    power_expression(input)
}

/// Parse `^`. The exponent may carry a sign, so `2 ^ -2` parses.
fn power_expression<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let base = atom(input)?;

    ws.parse_next(input)?;
    if lit("^").parse_next(input).is_ok() {
        let exponent = operand(input, unary_expression)?;
        Ok(Expression::binary(base, BinaryOp::Power, exponent))
    } else {
        Ok(base)
    }
}

fn atom<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    ws.parse_next(input)?;
    let checkpoint = *input;

    let result = alt((
        number_parser.map(Expression::number),
        string_parser.map(Expression::string),
        boolean_parser.map(Expression::boolean),
        item_parser.map(Expression::Item),
        days_parser.map(|_| Expression::Days),
        parenthesized,
        function_call,
    ))
    .parse_next(input);

    if result.is_err() && !matches!(result, Err(winnow::error::ErrMode::Cut(_))) {
        *input = checkpoint;
    }
    result
}

fn parenthesized<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    lit("(").parse_next(input)?;
    let expr = operand(input, expression_parser)?;
    ws.parse_next(input)?;
    cut_err(lit(")"))
        .context(StrContext::Label(LABEL_EXPRESSION))
        .parse_next(input)?;
    Ok(expr)
}

fn function_call<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    let start = *input;
    let name = function_name_parser(input)?;
    ws.parse_next(input)?;
    if lit("(").parse_next(input).is_err() {
        *input = start;
        return backtrack(input);
    }

    let Some(function) = Function::from_name(name) else {
        *input = start;
        return cut_fail(input, LABEL_FUNCTION);
    };

    ws.parse_next(input)?;
    let arguments: Vec<Expression> = if function.takes_uid_arguments() {
        cut_err(separated(1.., uid_argument, (ws, lit(","), ws)))
            .context(StrContext::Label(LABEL_FUNCTION))
            .parse_next(input)?
    } else if input.starts_with(')') {
        Vec::new()
    } else {
        separated(1.., |i: &mut Input<'a>| operand(i, expression_parser), lit(","))
            .parse_next(input)?
    };

    ws.parse_next(input)?;
    cut_err(lit(")"))
        .context(StrContext::Label(LABEL_FUNCTION))
        .parse_next(input)?;

    Ok(Expression::call(function, arguments))
}

/// Bare uid argument of `orgUnit.group` / `orgUnit.ancestor`, kept as a string literal
fn uid_argument<'a>(input: &mut Input<'a>) -> PResult<Expression> {
    uid_parser.map(Expression::string).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggexpr_ast::ItemReference;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Expression {
        let mut input = text;
        let expr = expression_parser(&mut input)
            .unwrap_or_else(|e| panic!("Failed to parse '{}': {:?}", text, e));
        assert_eq!(input.trim(), "", "unparsed input for '{}'", text);
        expr
    }

    #[test]
    fn test_not_is_looser_than_equality() {
        assert_eq!(
            parse("!true == false"),
            Expression::unary(
                UnaryOp::Not,
                Expression::binary(Expression::boolean(true), BinaryOp::Equal, Expression::boolean(false)),
            )
        );
    }

    #[test]
    fn test_not_equal_is_not_negation() {
        assert_eq!(
            parse("1 != 2"),
            Expression::binary(Expression::number(1.0), BinaryOp::NotEqual, Expression::number(2.0))
        );
    }

    #[test]
    fn test_org_unit_arguments_are_uids() {
        assert_eq!(
            parse("orgUnit.group(a1, b2)"),
            Expression::call(
                Function::OrgUnitGroup,
                vec![Expression::string("a1"), Expression::string("b2")],
            )
        );
    }

    #[test]
    fn test_item_atom() {
        assert_eq!(
            parse("#{deA}"),
            Expression::item(ItemReference::data_element("deA"))
        );
    }

    #[test]
    fn test_empty_argument_list() {
        assert_eq!(parse("greatest()"), Expression::call(Function::Greatest, vec![]));
    }
}
