//! Tree walking and reference collection

use crate::{Expression, Function, ItemKind, ItemReference, Literal};
use indexmap::IndexSet;

/// Pre-order walk over every node
pub fn walk<'a>(expr: &'a Expression, f: &mut impl FnMut(&'a Expression)) {
    f(expr);
    for child in expr.children() {
        walk(child, f);
    }
}

/// Walk every item reference, flagging those inside a sample-period aggregate
pub fn walk_items<'a>(expr: &'a Expression, f: &mut impl FnMut(&'a ItemReference, bool)) {
    fn go<'a>(expr: &'a Expression, in_aggregate: bool, f: &mut impl FnMut(&'a ItemReference, bool)) {
        match expr {
            Expression::Item(reference) => f(reference, in_aggregate),
            Expression::FunctionCall(call) => {
                let last = call.arguments.len().saturating_sub(1);
                for (i, arg) in call.arguments.iter().enumerate() {
                    // percentileCont's fraction is evaluated outside the samples
                    let sampled = call.function.is_aggregate()
                        && (i == last || call.function != Function::PercentileCont);
                    go(arg, in_aggregate || sampled, f);
                }
            }
            other => {
                for child in other.children() {
                    go(child, in_aggregate, f);
                }
            }
        }
    }
    go(expr, false, f);
}

/// Every item reference in the tree, wildcards kept as written.
/// Items in both branches of `if` are included.
pub fn collect_item_references(expr: &Expression) -> IndexSet<ItemReference> {
    let mut refs = IndexSet::new();
    walk_items(expr, &mut |reference, _| {
        refs.insert(reference.clone());
    });
    refs
}

/// Org unit group uids from `OUG{..}` items and `orgUnit.group(..)` arguments
pub fn collect_org_unit_group_references(expr: &Expression) -> IndexSet<String> {
    let mut groups = IndexSet::new();
    walk(expr, &mut |node| match node {
        Expression::Item(reference) if reference.kind == ItemKind::OrgUnitGroup => {
            groups.insert(reference.uid().to_string());
        }
        Expression::FunctionCall(call) if call.function == Function::OrgUnitGroup => {
            groups.extend(uid_arguments(call.arguments.iter()));
        }
        _ => {}
    });
    groups
}

/// Org unit uids passed to `orgUnit.ancestor(..)`
pub fn collect_org_unit_references(expr: &Expression) -> IndexSet<String> {
    let mut org_units = IndexSet::new();
    walk(expr, &mut |node| {
        if let Expression::FunctionCall(call) = node {
            if call.function == Function::OrgUnitAncestor {
                org_units.extend(uid_arguments(call.arguments.iter()));
            }
        }
    });
    org_units
}

/// Indicator uids referenced through `N{..}`
pub fn collect_indicator_references(expr: &Expression) -> IndexSet<String> {
    collect_item_references(expr)
        .into_iter()
        .filter(|r| r.kind == ItemKind::Indicator)
        .map(|r| r.uid().to_string())
        .collect()
}

/// Whether any sample-period aggregate appears in the tree
pub fn contains_aggregate(expr: &Expression) -> bool {
    let mut found = false;
    walk(expr, &mut |node| {
        if let Expression::FunctionCall(call) = node {
            found |= call.function.is_aggregate();
        }
    });
    found
}

fn uid_arguments<'a>(args: impl Iterator<Item = &'a Expression>) -> impl Iterator<Item = String> {
    args.filter_map(|arg| match arg {
        Expression::Literal(Literal::String(uid)) => Some(uid.clone()),
        _ => None,
    })
}
