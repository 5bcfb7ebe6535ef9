//! Built-in functions

use crate::UsageContext;
use serde::{Deserialize, Serialize};

/// Every function the grammar accepts. Unknown names are syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    If,
    IsNull,
    IsNotNull,
    FirstNonNull,
    Greatest,
    Least,
    Log,
    Log10,
    /// `orgUnit.ancestor(uid, ...)`
    OrgUnitAncestor,
    /// `orgUnit.group(uid, ...)`
    OrgUnitGroup,

    // Predictor aggregates over sample periods
    Avg,
    Count,
    Max,
    Median,
    Min,
    PercentileCont,
    StdDev,
    StdDevPop,
    StdDevSamp,
    Sum,
    Variance,
}

impl Function {
    pub const ALL: [Function; 21] = [
        Self::If,
        Self::IsNull,
        Self::IsNotNull,
        Self::FirstNonNull,
        Self::Greatest,
        Self::Least,
        Self::Log,
        Self::Log10,
        Self::OrgUnitAncestor,
        Self::OrgUnitGroup,
        Self::Avg,
        Self::Count,
        Self::Max,
        Self::Median,
        Self::Min,
        Self::PercentileCont,
        Self::StdDev,
        Self::StdDevPop,
        Self::StdDevSamp,
        Self::Sum,
        Self::Variance,
    ];

    /// Name as written in expression text
    pub const fn name(&self) -> &'static str {
        match self {
            Self::If => "if",
            Self::IsNull => "isNull",
            Self::IsNotNull => "isNotNull",
            Self::FirstNonNull => "firstNonNull",
            Self::Greatest => "greatest",
            Self::Least => "least",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::OrgUnitAncestor => "orgUnit.ancestor",
            Self::OrgUnitGroup => "orgUnit.group",
            Self::Avg => "avg",
            Self::Count => "count",
            Self::Max => "max",
            Self::Median => "median",
            Self::Min => "min",
            Self::PercentileCont => "percentileCont",
            Self::StdDev => "stddev",
            Self::StdDevPop => "stddevPop",
            Self::StdDevSamp => "stddevSamp",
            Self::Sum => "sum",
            Self::Variance => "variance",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Accepted argument count as (min, max); `None` means unbounded
    pub const fn arity(&self) -> (usize, Option<usize>) {
        match self {
            Self::If => (3, Some(3)),
            Self::IsNull | Self::IsNotNull | Self::Log10 => (1, Some(1)),
            Self::Log => (1, Some(2)),
            Self::FirstNonNull | Self::Greatest | Self::Least => (1, None),
            Self::OrgUnitAncestor | Self::OrgUnitGroup => (1, None),
            Self::PercentileCont => (2, Some(2)),
            Self::Avg
            | Self::Count
            | Self::Max
            | Self::Median
            | Self::Min
            | Self::StdDev
            | Self::StdDevPop
            | Self::StdDevSamp
            | Self::Sum
            | Self::Variance => (1, Some(1)),
        }
    }

    pub fn accepts_arity(&self, count: usize) -> bool {
        let (min, max) = self.arity();
        count >= min && max.is_none_or(|max| count <= max)
    }

    /// Aggregates evaluate their (last) argument once per sample period
    pub const fn is_aggregate(&self) -> bool {
        matches!(
            self,
            Self::Avg
                | Self::Count
                | Self::Max
                | Self::Median
                | Self::Min
                | Self::PercentileCont
                | Self::StdDev
                | Self::StdDevPop
                | Self::StdDevSamp
                | Self::Sum
                | Self::Variance
        )
    }

    /// Functions whose arguments are bare org unit or group uids
    pub const fn takes_uid_arguments(&self) -> bool {
        matches!(self, Self::OrgUnitAncestor | Self::OrgUnitGroup)
    }

    /// Functions that see absent items as null rather than a substituted default
    pub const fn sees_missing_values(&self) -> bool {
        matches!(
            self,
            Self::IsNull | Self::IsNotNull | Self::FirstNonNull | Self::Greatest | Self::Least
        )
    }

    /// Per-usage allowlist
    pub const fn is_allowed_in(&self, usage: UsageContext) -> bool {
        !self.is_aggregate() || usage.has_samples()
    }
}
