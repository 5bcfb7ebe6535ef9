//! JSON context files for the `eval` and `indicator` commands
//!
//! Values are keyed by item token as written in expressions:
//!
//! ```json
//! {
//!   "strategy": "NEVER_SKIP",
//!   "period": "202201",
//!   "values": { "#{deA}": 3, "#{deB.cocA}": 4 },
//!   "constants": { "piHalf": 1.5708 },
//!   "orgUnit": { "uid": "ouC", "ancestors": ["ouA"], "groups": ["ougA"] },
//!   "samples": [ { "period": "202101", "values": { "#{deA}": 1 } } ]
//! }
//! ```

use crate::Indicator;
use aggexpr_ast::DimensionalItemId;
use aggexpr_eval::{MissingValueStrategy, OrgUnitInfo, Period, SamplePeriod, ValueContext};
use aggexpr_parser::parse_item_reference;
use aggexpr_types::{DataType, InMemoryMetadata, Value};
use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContextFile {
    pub strategy: Option<MissingValueStrategy>,
    pub values: HashMap<String, Value>,
    pub item_types: HashMap<String, DataType>,
    pub constants: HashMap<String, f64>,
    pub org_unit_group_counts: HashMap<String, f64>,
    pub org_unit: Option<OrgUnitInfo>,
    pub days: Option<u32>,
    pub period: Option<String>,
    pub samples: Vec<SampleEntry>,
    pub metadata: InMemoryMetadata,
    pub indicators: Vec<Indicator>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SampleEntry {
    pub period: String,
    pub values: HashMap<String, Value>,
}

impl ContextFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read context file: {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid context file: {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Period named by the file, if it parses
    pub fn period(&self) -> Result<Option<Period>> {
        self.period
            .as_deref()
            .map(|iso| Period::parse(iso).with_context(|| format!("Unrecognised period '{}'", iso)))
            .transpose()
    }

    /// Build a value context. `fallback` applies when the file names no strategy.
    pub fn to_value_context(&self, fallback: MissingValueStrategy) -> Result<ValueContext> {
        let mut ctx = ValueContext::new().with_strategy(self.strategy.unwrap_or(fallback));
        ctx.values = item_values(&self.values)?;
        for (token, data_type) in &self.item_types {
            ctx.item_types.insert(item_id(token)?, *data_type);
        }
        ctx.constants = self.constants.clone();
        ctx.org_unit_group_counts = self.org_unit_group_counts.clone();
        ctx.org_unit = self.org_unit.clone();
        // Explicit days win over the period length
        ctx.days = match (self.days, self.period()?) {
            (Some(days), _) => Some(days),
            (None, Some(period)) => Some(period.days()),
            (None, None) => None,
        };
        for entry in &self.samples {
            let mut sample = SamplePeriod::new(entry.period.clone());
            sample.values = item_values(&entry.values)?;
            ctx.samples.push(sample);
        }
        debug!(
            "context: {} value(s), {} sample period(s), strategy {}",
            ctx.values.len(),
            ctx.samples.len(),
            ctx.missing_value_strategy
        );
        Ok(ctx)
    }
}

fn item_id(token: &str) -> Result<DimensionalItemId> {
    let reference =
        parse_item_reference(token).with_context(|| format!("Invalid item key '{}'", token))?;
    Ok(reference.dimensional_id())
}

fn item_values(values: &HashMap<String, Value>) -> Result<HashMap<DimensionalItemId, Value>> {
    values
        .iter()
        .map(|(token, value)| Ok((item_id(token)?, value.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_values_keyed_by_token() {
        let file = ContextFile::from_json(
            r##"{"values": {"#{deA}": 3, "#{deA.cocB.*}": "x"}, "strategy": "NEVER_SKIP"}"##,
        )
        .unwrap();
        let ctx = file
            .to_value_context(MissingValueStrategy::SkipIfAllValuesMissing)
            .unwrap();
        assert_eq!(ctx.missing_value_strategy, MissingValueStrategy::NeverSkip);
        assert_eq!(
            ctx.values.get(&DimensionalItemId::data_element("deA")),
            Some(&Value::Number(3.0))
        );
        let operand = parse_item_reference("#{deA.cocB}").unwrap().dimensional_id();
        assert_eq!(ctx.values.get(&operand), Some(&Value::from("x")));
    }

    #[test]
    fn test_days_from_period() {
        let file = ContextFile::from_json(r#"{"period": "202202"}"#).unwrap();
        let ctx = file.to_value_context(MissingValueStrategy::NeverSkip).unwrap();
        assert_eq!(ctx.days, Some(28));

        let file = ContextFile::from_json(r#"{"period": "202202", "days": 10}"#).unwrap();
        let ctx = file.to_value_context(MissingValueStrategy::NeverSkip).unwrap();
        assert_eq!(ctx.days, Some(10));
    }

    #[test]
    fn test_bad_item_key() {
        let file = ContextFile::from_json(r#"{"values": {"deA": 1}}"#).unwrap();
        assert!(file.to_value_context(MissingValueStrategy::NeverSkip).is_err());
    }
}
