//! Metadata collaborator: display names and value types of referenced objects

use crate::DataType;
use aggexpr_ast::{DimensionalItemId, ItemKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kinds of metadata object an expression can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataKind {
    DataElement,
    CategoryOptionCombo,
    Program,
    TrackedEntityAttribute,
    ProgramIndicator,
    DataSet,
    Constant,
    OrgUnitGroup,
    OrgUnit,
    Indicator,
}

/// Read access to metadata names and value types
///
/// Implementations are supplied by the caller; the expression service never
/// stores metadata itself.
pub trait MetadataLookup {
    /// Display name of an object, `None` when the uid is unknown
    fn display_name(&self, kind: MetadataKind, uid: &str) -> Option<String>;

    /// Declared value type of a data item, `None` when untyped
    fn value_type(&self, _id: &DimensionalItemId) -> Option<DataType> {
        None
    }
}

impl<T: MetadataLookup + ?Sized> MetadataLookup for &T {
    fn display_name(&self, kind: MetadataKind, uid: &str) -> Option<String> {
        (**self).display_name(kind, uid)
    }

    fn value_type(&self, id: &DimensionalItemId) -> Option<DataType> {
        (**self).value_type(id)
    }
}

/// Lookup that knows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataLookup for NoMetadata {
    fn display_name(&self, _kind: MetadataKind, _uid: &str) -> Option<String> {
        None
    }
}

/// Metadata held in memory, loadable from JSON
///
/// Value types are keyed by the uid of the underlying data element or
/// tracked entity attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InMemoryMetadata {
    pub names: HashMap<MetadataKind, HashMap<String, String>>,
    pub value_types: HashMap<String, DataType>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(
        mut self,
        kind: MetadataKind,
        uid: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.insert_name(kind, uid, name);
        self
    }

    pub fn with_value_type(mut self, uid: impl Into<String>, data_type: DataType) -> Self {
        self.value_types.insert(uid.into(), data_type);
        self
    }

    pub fn insert_name(&mut self, kind: MetadataKind, uid: impl Into<String>, name: impl Into<String>) {
        self.names
            .entry(kind)
            .or_default()
            .insert(uid.into(), name.into());
    }
}

impl MetadataLookup for InMemoryMetadata {
    fn display_name(&self, kind: MetadataKind, uid: &str) -> Option<String> {
        self.names.get(&kind)?.get(uid).cloned()
    }

    fn value_type(&self, id: &DimensionalItemId) -> Option<DataType> {
        let uid = match id.kind {
            ItemKind::DataElement | ItemKind::DataElementOperand => id.ids.first(),
            ItemKind::ProgramDataElement | ItemKind::ProgramAttribute => id.ids.get(1),
            _ => None,
        }?;
        self.value_types.get(uid).copied()
    }
}
