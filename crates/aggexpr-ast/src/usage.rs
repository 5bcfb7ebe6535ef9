//! Usage contexts gating which functions an expression may call

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of metadata object owning an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsageContext {
    Indicator,
    ValidationRule,
    Predictor,
}

impl UsageContext {
    pub const ALL: [UsageContext; 3] = [Self::Indicator, Self::ValidationRule, Self::Predictor];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Indicator => "INDICATOR",
            Self::ValidationRule => "VALIDATION_RULE",
            Self::Predictor => "PREDICTOR",
        }
    }

    /// Whether sample-period aggregates are available
    pub const fn has_samples(&self) -> bool {
        matches!(self, Self::Predictor)
    }
}

impl fmt::Display for UsageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UsageContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "INDICATOR" => Ok(Self::Indicator),
            "VALIDATION_RULE" => Ok(Self::ValidationRule),
            "PREDICTOR" => Ok(Self::Predictor),
            other => Err(format!("unknown usage context '{}'", other)),
        }
    }
}
