//! Item reference resolution
//!
//! Maps the references found in an expression to their canonical ids and,
//! through a caller-supplied lookup, to metadata objects. A dangling
//! reference is not an error here; it maps to `None`.

use aggexpr_ast::visit::collect_item_references;
use aggexpr_ast::{DimensionalItemId, Expression, ItemReference};
use indexmap::{IndexMap, IndexSet};
use log::warn;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Lookup of the metadata object behind a dimensional item
pub trait ObjectLookup {
    type Object;

    fn lookup(&self, id: &DimensionalItemId) -> Option<Self::Object>;
}

impl<O: Clone, S: BuildHasher> ObjectLookup for HashMap<DimensionalItemId, O, S> {
    type Object = O;

    fn lookup(&self, id: &DimensionalItemId) -> Option<O> {
        self.get(id).cloned()
    }
}

impl<O: Clone> ObjectLookup for IndexMap<DimensionalItemId, O> {
    type Object = O;

    fn lookup(&self, id: &DimensionalItemId) -> Option<O> {
        self.get(id).cloned()
    }
}

/// Canonical ids of every item in the expression, in order of appearance
pub fn dimensional_item_ids(expr: &Expression) -> IndexSet<DimensionalItemId> {
    collect_item_references(expr)
        .iter()
        .map(ItemReference::dimensional_id)
        .collect()
}

/// Resolve references to objects. References with the same canonical id
/// collapse into one entry.
pub fn resolve<'a, L: ObjectLookup + ?Sized>(
    refs: impl IntoIterator<Item = &'a ItemReference>,
    lookup: &L,
) -> IndexMap<DimensionalItemId, Option<L::Object>> {
    let mut resolved = IndexMap::new();
    for reference in refs {
        let id = reference.dimensional_id();
        if resolved.contains_key(&id) {
            continue;
        }
        let object = lookup.lookup(&id);
        if object.is_none() {
            warn!("no object found for {} (written {})", id, reference);
        }
        resolved.insert(id, object);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggexpr_ast::{ItemKind, ItemSlot};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_equivalent_spellings_collapse() {
        let refs = [
            ItemReference::new(
                ItemKind::DataElementOperand,
                [ItemSlot::uid("deA"), ItemSlot::uid("cocB"), ItemSlot::Wildcard],
            ),
            ItemReference::new(
                ItemKind::DataElementOperand,
                [ItemSlot::uid("deA"), ItemSlot::uid("cocB")],
            ),
            ItemReference::data_element("missing"),
        ];
        let objects: HashMap<DimensionalItemId, &str> = HashMap::from([(
            DimensionalItemId::new(ItemKind::DataElementOperand, ["deA", "cocB"]),
            "DeA CocB",
        )]);

        let resolved = resolve(&refs, &objects);
        assert_eq!(resolved.len(), 2);
        assert_eq!(
            resolved.values().cloned().collect::<Vec<_>>(),
            vec![Some("DeA CocB"), None]
        );
    }
}
