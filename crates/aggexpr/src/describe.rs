//! Human-readable descriptions
//!
//! Re-renders an expression with item references replaced by display names.
//! Parentheses are emitted only where the tree needs them, so the output
//! follows the operator structure of the tree rather than the caller's
//! original spelling. With no names known, items render as their tokens and
//! the description parses back to the same tree.

use aggexpr_ast::{
    BinaryOpExpr, Expression, Function, FunctionCall, ItemKind, ItemReference, ItemSlot, Literal,
    UnaryOpExpr,
};
use aggexpr_types::{MetadataKind, MetadataLookup};

/// Text used for the `[days]` keyword
pub const DAYS_DESCRIPTION: &str = "[Number of days]";

/// Describe an expression using `names` for display names
pub fn describe(expr: &Expression, names: &dyn MetadataLookup) -> String {
    let mut out = String::new();
    Describer { names }.write(expr, &mut out);
    out
}

struct Describer<'a> {
    names: &'a dyn MetadataLookup,
}

impl Describer<'_> {
    fn write(&self, expr: &Expression, out: &mut String) {
        match expr {
            Expression::Literal(literal) => write_literal(literal, out),
            Expression::Item(reference) => out.push_str(&self.item(reference)),
            Expression::Days => out.push_str(DAYS_DESCRIPTION),
            Expression::UnaryOp(unary) => self.write_unary(unary, out),
            Expression::BinaryOp(binary) => self.write_binary(binary, out),
            Expression::FunctionCall(call) => self.write_call(call, out),
        }
    }

    fn write_grouped(&self, expr: &Expression, grouped: bool, out: &mut String) {
        if grouped {
            out.push_str("( ");
            self.write(expr, out);
            out.push_str(" )");
        } else {
            self.write(expr, out);
        }
    }

    fn write_unary(&self, unary: &UnaryOpExpr, out: &mut String) {
        out.push_str(unary.op.symbol());
        let grouped = unary.operand.precedence() < unary.op.precedence();
        self.write_grouped(&unary.operand, grouped, out);
    }

    fn write_binary(&self, binary: &BinaryOpExpr, out: &mut String) {
        let precedence = binary.op.precedence();
        let right_assoc = binary.op.is_right_associative();

        let left = binary.left.precedence();
        self.write_grouped(&binary.left, left < precedence || (left == precedence && right_assoc), out);

        out.push(' ');
        out.push_str(binary.op.symbol());
        out.push(' ');

        let right = binary.right.precedence();
        self.write_grouped(&binary.right, right < precedence || (right == precedence && !right_assoc), out);
    }

    fn write_call(&self, call: &FunctionCall, out: &mut String) {
        let uid_kind = match call.function {
            Function::OrgUnitAncestor => Some(MetadataKind::OrgUnit),
            Function::OrgUnitGroup => Some(MetadataKind::OrgUnitGroup),
            _ => None,
        };

        out.push_str(call.function.name());
        out.push('(');
        for (i, arg) in call.arguments.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            match (uid_kind, arg) {
                (Some(kind), Expression::Literal(Literal::String(uid))) => {
                    out.push_str(&self.name_or(kind, uid, uid));
                }
                _ => self.write(arg, out),
            }
        }
        out.push(')');
    }

    fn name_or(&self, kind: MetadataKind, uid: &str, fallback: &str) -> String {
        self.names
            .display_name(kind, uid)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Display form of an item. An unknown leading object falls back to the
    /// token as written; unknown trailing parts fall back to their uid.
    fn item(&self, reference: &ItemReference) -> String {
        let token = reference.to_string();
        let lead = |kind| self.names.display_name(kind, reference.uid());
        let slot = |index: usize, kind| match reference.slot(index) {
            Some(ItemSlot::Uid(uid)) => self.name_or(kind, uid, uid),
            Some(ItemSlot::Wildcard) => "*".to_string(),
            None => String::new(),
        };

        match reference.kind {
            ItemKind::DataElement | ItemKind::DataElementOperand => {
                let Some(mut text) = lead(MetadataKind::DataElement) else {
                    return token;
                };
                // Trailing wildcards add nothing to the name
                let last = (1..3)
                    .rev()
                    .find(|&i| matches!(reference.slot(i), Some(ItemSlot::Uid(_))))
                    .unwrap_or(0);
                for index in 1..=last {
                    text.push(' ');
                    text.push_str(&slot(index, MetadataKind::CategoryOptionCombo));
                }
                text
            }
            ItemKind::ProgramDataElement | ItemKind::ProgramAttribute => {
                let Some(program) = lead(MetadataKind::Program) else {
                    return token;
                };
                let kind = if reference.kind == ItemKind::ProgramDataElement {
                    MetadataKind::DataElement
                } else {
                    MetadataKind::TrackedEntityAttribute
                };
                format!("{} {}", program, slot(1, kind))
            }
            ItemKind::ReportingRate => {
                let Some(data_set) = lead(MetadataKind::DataSet) else {
                    return token;
                };
                match reference.metric() {
                    Some(metric) => format!("{} - {}", data_set, metric.label()),
                    None => data_set,
                }
            }
            ItemKind::ProgramIndicator => lead(MetadataKind::ProgramIndicator).unwrap_or(token),
            ItemKind::Constant => lead(MetadataKind::Constant).unwrap_or(token),
            ItemKind::OrgUnitGroup => lead(MetadataKind::OrgUnitGroup).unwrap_or(token),
            ItemKind::Indicator => lead(MetadataKind::Indicator).unwrap_or(token),
        }
    }
}

fn write_literal(literal: &Literal, out: &mut String) {
    match literal {
        Literal::Number(n) => out.push_str(&n.to_string()),
        Literal::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Literal::String(s) => {
            out.push('\'');
            for c in s.chars() {
                match c {
                    '\'' => out.push_str("\\'"),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    '\r' => out.push_str("\\r"),
                    c => out.push(c),
                }
            }
            out.push('\'');
        }
    }
}
