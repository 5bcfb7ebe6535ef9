//! Value context supplied by the caller for one evaluation

use aggexpr_ast::DimensionalItemId;
use aggexpr_types::{DataType, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Policy for items that have no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissingValueStrategy {
    /// Absent items take the default of their type (0, "", false)
    NeverSkip,
    /// No value when any referenced item is absent
    SkipIfAnyValueMissing,
    /// No value when every referenced item is absent
    #[default]
    SkipIfAllValuesMissing,
}

impl MissingValueStrategy {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NeverSkip => "NEVER_SKIP",
            Self::SkipIfAnyValueMissing => "SKIP_IF_ANY_VALUE_MISSING",
            Self::SkipIfAllValuesMissing => "SKIP_IF_ALL_VALUES_MISSING",
        }
    }
}

impl fmt::Display for MissingValueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MissingValueStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "NEVER_SKIP" => Ok(Self::NeverSkip),
            "SKIP_IF_ANY_VALUE_MISSING" | "SKIP_IF_ANY" => Ok(Self::SkipIfAnyValueMissing),
            "SKIP_IF_ALL_VALUES_MISSING" | "SKIP_IF_ALL" => Ok(Self::SkipIfAllValuesMissing),
            other => Err(format!("unknown missing value strategy '{}'", other)),
        }
    }
}

/// The org unit an expression is evaluated for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrgUnitInfo {
    pub uid: String,
    /// Ancestor uids, root first
    #[serde(default)]
    pub ancestors: Vec<String>,
    /// Uids of the groups the org unit belongs to
    #[serde(default)]
    pub groups: Vec<String>,
}

impl OrgUnitInfo {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ..Self::default()
        }
    }

    pub fn with_ancestors<S: Into<String>>(mut self, ancestors: impl IntoIterator<Item = S>) -> Self {
        self.ancestors = ancestors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_groups<S: Into<String>>(mut self, groups: impl IntoIterator<Item = S>) -> Self {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Equal to, or a descendant of, `uid`
    pub fn is_or_descends_from(&self, uid: &str) -> bool {
        self.uid == uid || self.ancestors.iter().any(|a| a == uid)
    }

    pub fn is_member_of(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

/// Item values for one sample period of a predictor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplePeriod {
    pub period: String,
    pub values: HashMap<DimensionalItemId, Value>,
}

impl SamplePeriod {
    pub fn new(period: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            values: HashMap::new(),
        }
    }

    pub fn with_value(mut self, id: DimensionalItemId, value: impl Into<Value>) -> Self {
        self.values.insert(id, value.into());
        self
    }
}

/// Everything an evaluation reads. Built by the caller, never mutated by the engine.
#[derive(Debug, Clone, Default)]
pub struct ValueContext {
    pub values: HashMap<DimensionalItemId, Value>,
    pub constants: HashMap<String, f64>,
    /// Member counts keyed by org unit group uid
    pub org_unit_group_counts: HashMap<String, f64>,
    pub org_unit: Option<OrgUnitInfo>,
    /// Days in the evaluated period, for `[days]`
    pub days: Option<u32>,
    pub missing_value_strategy: MissingValueStrategy,
    /// Predictor sample periods, oldest first
    pub samples: Vec<SamplePeriod>,
    /// Declared types of data items, used for missing-value defaults
    pub item_types: HashMap<DimensionalItemId, DataType>,
}

impl ValueContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, id: DimensionalItemId, value: impl Into<Value>) -> Self {
        self.values.insert(id, value.into());
        self
    }

    pub fn with_constant(mut self, uid: impl Into<String>, value: f64) -> Self {
        self.constants.insert(uid.into(), value);
        self
    }

    pub fn with_org_unit_group_count(mut self, uid: impl Into<String>, count: f64) -> Self {
        self.org_unit_group_counts.insert(uid.into(), count);
        self
    }

    pub fn with_org_unit(mut self, org_unit: OrgUnitInfo) -> Self {
        self.org_unit = Some(org_unit);
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    pub fn with_strategy(mut self, strategy: MissingValueStrategy) -> Self {
        self.missing_value_strategy = strategy;
        self
    }

    pub fn with_sample(mut self, sample: SamplePeriod) -> Self {
        self.samples.push(sample);
        self
    }

    pub fn with_item_type(mut self, id: DimensionalItemId, data_type: DataType) -> Self {
        self.item_types.insert(id, data_type);
        self
    }

    /// Declared type of an item, numeric unless stated otherwise
    pub fn item_type(&self, id: &DimensionalItemId) -> DataType {
        self.item_types.get(id).copied().unwrap_or_default()
    }
}
