//! Token-level parsers

use aggexpr_ast::{ItemKind, ItemReference, ItemSlot, ReportingRateMetric};
use winnow::ascii::{digit0, digit1, multispace0};
use winnow::combinator::{alt, cut_err, fail, not, opt, separated, terminated};
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::prelude::*;
use winnow::token::{any, literal, one_of, take_while};

pub type Input<'a> = &'a str;
pub type PResult<O> = ModalResult<O>;

// Labels attached to failures. The entry point maps them to error codes.
pub const LABEL_FUNCTION: &str = "function";
pub const LABEL_ITEM: &str = "item reference";
pub const LABEL_METRIC: &str = "reporting rate metric";
pub const LABEL_STRING: &str = "string literal";
pub const LABEL_ESCAPE: &str = "escape sequence";
pub const LABEL_NUMBER: &str = "number";
pub const LABEL_EXPRESSION: &str = "expression";

/// Skip whitespace
pub fn ws<'a>(input: &mut Input<'a>) -> PResult<()> {
    multispace0.void().parse_next(input)
}

pub fn lit<'a>(s: &'static str) -> impl Parser<Input<'a>, &'a str, ErrMode<ContextError>> {
    literal(s)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Keyword not followed by an identifier character
pub fn keyword<'a>(kw: &'static str) -> impl Parser<Input<'a>, &'a str, ErrMode<ContextError>> {
    terminated(literal(kw), not(one_of(is_ident_char)))
}

/// Recoverable failure, lets `alt` try the next branch
pub fn backtrack<'a, O>(input: &mut Input<'a>) -> PResult<O> {
    fail(input)
}

/// Committed failure labelled with what was being parsed
pub fn cut_fail<'a, O>(input: &mut Input<'a>, label: &'static str) -> PResult<O> {
    let mut failing = cut_err(fail::<_, O, _>).context(StrContext::Label(label));
    failing.parse_next(input)
}

/// `true` / `false`
pub fn boolean_parser<'a>(input: &mut Input<'a>) -> PResult<bool> {
    alt((keyword("true").value(true), keyword("false").value(false))).parse_next(input)
}

fn exponent<'a>(input: &mut Input<'a>) -> PResult<()> {
    (
        one_of(['e', 'E']),
        opt(one_of(['+', '-'])),
        cut_err(digit1).context(StrContext::Label(LABEL_NUMBER)),
    )
        .void()
        .parse_next(input)
}

/// Numeric literal: `2`, `2.`, `.2`, `2.5E-3`. Signs are unary operators.
pub fn number_parser<'a>(input: &mut Input<'a>) -> PResult<f64> {
    let text = alt((
        (digit1, opt(('.', digit0)), opt(exponent)).take(),
        ('.', digit1, opt(exponent)).take(),
    ))
    .parse_next(input)?;

    match text.parse::<f64>() {
        Ok(value) => Ok(value),
        Err(_) => cut_fail(input, LABEL_NUMBER),
    }
}

/// Single-quoted string with backslash escapes
pub fn string_parser<'a>(input: &mut Input<'a>) -> PResult<String> {
    lit("'").parse_next(input)?;
    let mut out = String::new();
    loop {
        let c = match any::<_, ErrMode<ContextError>>(input) {
            Ok(c) => c,
            Err(_) => return cut_fail(input, LABEL_STRING),
        };
        match c {
            '\'' => return Ok(out),
            '\\' => {
                let escaped = match any::<_, ErrMode<ContextError>>(input) {
                    Ok(c) => c,
                    Err(_) => return cut_fail(input, LABEL_STRING),
                };
                out.push(match escaped {
                    '\'' => '\'',
                    '"' => '"',
                    '\\' => '\\',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    _ => return cut_fail(input, LABEL_ESCAPE),
                });
            }
            other => out.push(other),
        }
    }
}

/// Metadata uid (alphanumeric, as generated by the server)
pub fn uid_parser<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    take_while(1.., is_ident_char).parse_next(input)
}

/// Function name, optionally dotted (`orgUnit.group`)
pub fn function_name_parser<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic()),
        take_while(0.., is_ident_char),
        opt(('.', take_while(1.., is_ident_char))),
    )
        .take()
        .parse_next(input)
}

/// `[days]`
pub fn days_parser<'a>(input: &mut Input<'a>) -> PResult<()> {
    (lit("["), ws, keyword("days"), ws, lit("]")).void().parse_next(input)
}

fn item_prefix<'a>(input: &mut Input<'a>) -> PResult<ItemKind> {
    terminated(
        alt((
            lit("OUG").value(ItemKind::OrgUnitGroup),
            lit("#").value(ItemKind::DataElement),
            lit("D").value(ItemKind::ProgramDataElement),
            lit("A").value(ItemKind::ProgramAttribute),
            lit("I").value(ItemKind::ProgramIndicator),
            lit("R").value(ItemKind::ReportingRate),
            lit("C").value(ItemKind::Constant),
            lit("N").value(ItemKind::Indicator),
        )),
        lit("{"),
    )
    .parse_next(input)
}

fn slot_parser<'a>(input: &mut Input<'a>) -> PResult<ItemSlot> {
    alt((
        lit("*").value(ItemSlot::Wildcard),
        uid_parser.map(ItemSlot::uid),
    ))
    .parse_next(input)
}

/// Item reference token such as `#{de.coc}`, `R{ds.REPORTING_RATE}`, `OUG{grp}`
pub fn item_parser<'a>(input: &mut Input<'a>) -> PResult<ItemReference> {
    let start = *input;
    let kind = item_prefix(input)?;

    let slots: Vec<ItemSlot> = cut_err(separated(1..=3, slot_parser, '.'))
        .context(StrContext::Label(LABEL_ITEM))
        .parse_next(input)?;
    cut_err(lit("}"))
        .context(StrContext::Label(LABEL_ITEM))
        .parse_next(input)?;

    let first_is_uid = slots.first().is_some_and(|s| !s.is_wildcard());
    let valid = match kind {
        ItemKind::DataElement => first_is_uid,
        ItemKind::ProgramDataElement | ItemKind::ProgramAttribute => {
            slots.len() == 2 && slots.iter().all(|s| !s.is_wildcard())
        }
        ItemKind::ReportingRate => slots.len() == 2 && first_is_uid,
        _ => slots.len() == 1 && first_is_uid,
    };
    if !valid {
        *input = start;
        return cut_fail(input, LABEL_ITEM);
    }

    let reference = match kind {
        ItemKind::DataElement if slots.len() > 1 => {
            ItemReference::new(ItemKind::DataElementOperand, slots)
        }
        ItemKind::ReportingRate => {
            let metric = slots[1].as_uid().and_then(ReportingRateMetric::from_name);
            if metric.is_none() {
                *input = start;
                return cut_fail(input, LABEL_METRIC);
            }
            ItemReference::new(kind, slots)
        }
        _ => ItemReference::new(kind, slots),
    };
    Ok(reference)
}
