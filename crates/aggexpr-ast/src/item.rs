//! Item references and their canonical identities
//!
//! An [`ItemReference`] is what the text says (`#{de.*.aoc}`); a
//! [`DimensionalItemId`] is what it means. Several spellings can map to one
//! id, e.g. `#{de.coc.*}` and `#{de.coc}`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Kind of metadata object an item reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    /// `#{dataElement}`
    DataElement,
    /// `#{dataElement.categoryOptionCombo[.attributeOptionCombo]}`
    DataElementOperand,
    /// `D{program.dataElement}`
    ProgramDataElement,
    /// `A{program.attribute}`
    ProgramAttribute,
    /// `I{programIndicator}`
    ProgramIndicator,
    /// `R{dataSet.metric}`
    ReportingRate,
    /// `C{constant}`
    Constant,
    /// `OUG{orgUnitGroup}`
    OrgUnitGroup,
    /// `N{indicator}`
    Indicator,
}

impl ItemKind {
    /// Token prefix in front of the braces
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::DataElement | Self::DataElementOperand => "#",
            Self::ProgramDataElement => "D",
            Self::ProgramAttribute => "A",
            Self::ProgramIndicator => "I",
            Self::ReportingRate => "R",
            Self::Constant => "C",
            Self::OrgUnitGroup => "OUG",
            Self::Indicator => "N",
        }
    }

    /// Kinds whose absence degrades to a missing value. Constants and
    /// indicators are a hard failure instead.
    pub const fn is_data_item(&self) -> bool {
        !matches!(self, Self::Constant | Self::Indicator)
    }
}

/// One identifier slot inside the braces
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemSlot {
    Uid(String),
    /// `*`
    Wildcard,
}

impl ItemSlot {
    pub fn uid(uid: impl Into<String>) -> Self {
        Self::Uid(uid.into())
    }

    pub fn as_uid(&self) -> Option<&str> {
        match self {
            Self::Uid(uid) => Some(uid),
            Self::Wildcard => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Uid(uid) => uid,
            Self::Wildcard => "*",
        }
    }
}

impl fmt::Display for ItemSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metrics available on `R{dataSet.metric}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportingRateMetric {
    ReportingRate,
    ReportingRateOnTime,
    ActualReports,
    ActualReportsOnTime,
    ExpectedReports,
}

impl ReportingRateMetric {
    pub const ALL: [ReportingRateMetric; 5] = [
        Self::ReportingRate,
        Self::ReportingRateOnTime,
        Self::ActualReports,
        Self::ActualReportsOnTime,
        Self::ExpectedReports,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::ReportingRate => "REPORTING_RATE",
            Self::ReportingRateOnTime => "REPORTING_RATE_ON_TIME",
            Self::ActualReports => "ACTUAL_REPORTS",
            Self::ActualReportsOnTime => "ACTUAL_REPORTS_ON_TIME",
            Self::ExpectedReports => "EXPECTED_REPORTS",
        }
    }

    /// Human readable label used in descriptions
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ReportingRate => "Reporting rate",
            Self::ReportingRateOnTime => "Reporting rate on time",
            Self::ActualReports => "Actual reports",
            Self::ActualReportsOnTime => "Actual reports on time",
            Self::ExpectedReports => "Expected reports",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }
}

/// A symbolic reference exactly as written in the expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemReference {
    pub kind: ItemKind,
    /// One to three slots. Wildcards are kept as written.
    pub slots: SmallVec<[ItemSlot; 3]>,
}

impl ItemReference {
    pub fn new(kind: ItemKind, slots: impl IntoIterator<Item = ItemSlot>) -> Self {
        Self {
            kind,
            slots: slots.into_iter().collect(),
        }
    }

    /// Reference with a single uid slot (`I{..}`, `C{..}`, `OUG{..}`, `N{..}`, `#{..}`)
    pub fn single(kind: ItemKind, uid: impl Into<String>) -> Self {
        Self::new(kind, [ItemSlot::uid(uid)])
    }

    pub fn data_element(uid: impl Into<String>) -> Self {
        Self::single(ItemKind::DataElement, uid)
    }

    pub fn reporting_rate(data_set: impl Into<String>, metric: ReportingRateMetric) -> Self {
        Self::new(
            ItemKind::ReportingRate,
            [ItemSlot::uid(data_set), ItemSlot::uid(metric.name())],
        )
    }

    /// The first slot, which is never a wildcard
    pub fn uid(&self) -> &str {
        self.slots.first().map(ItemSlot::as_str).unwrap_or_default()
    }

    pub fn slot(&self, index: usize) -> Option<&ItemSlot> {
        self.slots.get(index)
    }

    /// Metric of a reporting rate reference
    pub fn metric(&self) -> Option<ReportingRateMetric> {
        match self.kind {
            ItemKind::ReportingRate => self
                .slot(1)
                .and_then(ItemSlot::as_uid)
                .and_then(ReportingRateMetric::from_name),
            _ => None,
        }
    }

    /// Canonical identity of this reference
    pub fn dimensional_id(&self) -> DimensionalItemId {
        let mut ids: SmallVec<[String; 3]> =
            self.slots.iter().map(|s| s.as_str().to_string()).collect();

        let mut kind = self.kind;
        if matches!(kind, ItemKind::DataElement | ItemKind::DataElementOperand) {
            while ids.len() > 1 && ids.last().is_some_and(|id| id == "*") {
                ids.pop();
            }
            kind = if ids.len() == 1 {
                ItemKind::DataElement
            } else {
                ItemKind::DataElementOperand
            };
        }

        DimensionalItemId { kind, ids }
    }
}

impl fmt::Display for ItemReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.kind.prefix())?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(slot.as_str())?;
        }
        f.write_str("}")
    }
}

/// Canonical, hashable identity of a dimensional item
///
/// Trailing wildcards of a data element operand are dropped, and an operand
/// left with only its data element becomes a plain data element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DimensionalItemId {
    pub kind: ItemKind,
    pub ids: SmallVec<[String; 3]>,
}

impl DimensionalItemId {
    pub fn new<S: Into<String>>(kind: ItemKind, ids: impl IntoIterator<Item = S>) -> Self {
        ItemReference::new(
            kind,
            ids.into_iter().map(|id| {
                let id = id.into();
                if id == "*" { ItemSlot::Wildcard } else { ItemSlot::Uid(id) }
            }),
        )
        .dimensional_id()
    }

    pub fn data_element(uid: impl Into<String>) -> Self {
        Self::new(ItemKind::DataElement, [uid.into()])
    }

    pub fn indicator(uid: impl Into<String>) -> Self {
        Self::new(ItemKind::Indicator, [uid.into()])
    }

    pub fn uid(&self) -> &str {
        self.ids.first().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for DimensionalItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{{}}}", self.kind.prefix(), self.ids.join("."))
    }
}
