//! Indicators and their references
//!
//! An indicator pairs a numerator and a denominator expression. `N{..}`
//! items point at other indicators; expansion follows those chains through
//! a caller-supplied [`IndicatorSource`].

use crate::service::ExpressionService;
use aggexpr_ast::visit::{collect_item_references, collect_org_unit_group_references};
use aggexpr_ast::{ItemKind, ItemReference, UsageContext};
use aggexpr_diagnostics::{ExprError, Result, EXP0106, EXP0107};
use aggexpr_eval::{IndicatorFactor, IndicatorValue, Period, ValueContext};
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::BuildHasher;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub uid: String,
    pub numerator: String,
    pub denominator: String,
    #[serde(default)]
    pub factor: IndicatorFactor,
    #[serde(default)]
    pub annualized: bool,
}

impl Indicator {
    pub fn new(
        uid: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            numerator: numerator.into(),
            denominator: denominator.into(),
            factor: IndicatorFactor::default(),
            annualized: false,
        }
    }

    pub fn with_factor(mut self, factor: IndicatorFactor) -> Self {
        self.factor = factor;
        self
    }

    pub fn annualized(mut self) -> Self {
        self.annualized = true;
        self
    }

    fn expressions(&self) -> [&str; 2] {
        [&self.numerator, &self.denominator]
    }
}

/// Lookup of indicators by uid
pub trait IndicatorSource {
    fn indicator(&self, uid: &str) -> Option<Indicator>;
}

impl<S: BuildHasher> IndicatorSource for HashMap<String, Indicator, S> {
    fn indicator(&self, uid: &str) -> Option<Indicator> {
        self.get(uid).cloned()
    }
}

impl IndicatorSource for [Indicator] {
    fn indicator(&self, uid: &str) -> Option<Indicator> {
        self.iter().find(|i| i.uid == uid).cloned()
    }
}

/// Everything reachable from a set of indicators
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorExpansion {
    /// Reached indicators, dependencies before dependants
    pub indicators: IndexMap<String, Indicator>,
    /// Non-indicator items of every reached indicator
    pub items: IndexSet<ItemReference>,
    /// `N{..}` uids the source did not know
    pub missing: IndexSet<String>,
}

impl ExpressionService {
    /// Union of the item references of numerators and denominators
    pub fn indicator_item_references(&self, indicators: &[Indicator]) -> Result<IndexSet<ItemReference>> {
        let mut refs = IndexSet::new();
        for indicator in indicators {
            for text in indicator.expressions() {
                refs.extend(collect_item_references(&*self.parse(text, UsageContext::Indicator)?));
            }
        }
        Ok(refs)
    }

    /// Union of the org unit groups used by numerators and denominators
    pub fn indicator_org_unit_groups(&self, indicators: &[Indicator]) -> Result<IndexSet<String>> {
        let mut groups = IndexSet::new();
        for indicator in indicators {
            for text in indicator.expressions() {
                groups.extend(collect_org_unit_group_references(
                    &*self.parse(text, UsageContext::Indicator)?,
                ));
            }
        }
        Ok(groups)
    }

    /// Follow `N{..}` chains from `roots`. Fails on a cycle or when a chain
    /// is deeper than the configured depth.
    pub fn expand_indicator_references<S: IndicatorSource + ?Sized>(
        &self,
        roots: &[Indicator],
        source: &S,
    ) -> Result<IndicatorExpansion> {
        let mut expansion = IndicatorExpansion::default();
        let mut path = Vec::new();
        for root in roots {
            self.expand(root, source, &mut path, &mut expansion)?;
        }
        debug!(
            "expanded {} indicator(s) into {} indicator(s) and {} item(s)",
            roots.len(),
            expansion.indicators.len(),
            expansion.items.len()
        );
        Ok(expansion)
    }

    fn expand<S: IndicatorSource + ?Sized>(
        &self,
        indicator: &Indicator,
        source: &S,
        path: &mut Vec<String>,
        out: &mut IndicatorExpansion,
    ) -> Result<()> {
        if path.contains(&indicator.uid) {
            let chain = path
                .iter()
                .chain(std::iter::once(&indicator.uid))
                .map(|uid| format!("N{{{}}}", uid))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ExprError::semantic(
                EXP0106,
                format!("Circular indicator reference: {}", chain),
            ));
        }
        if out.indicators.contains_key(&indicator.uid) {
            return Ok(());
        }
        if path.len() >= self.config().max_indicator_depth {
            return Err(ExprError::semantic(
                EXP0107,
                format!(
                    "Indicator N{{{}}} is nested deeper than {}",
                    indicator.uid,
                    self.config().max_indicator_depth
                ),
            ));
        }

        path.push(indicator.uid.clone());
        for text in indicator.expressions() {
            let expr = self.parse(text, UsageContext::Indicator)?;
            for reference in collect_item_references(&expr) {
                if reference.kind != ItemKind::Indicator {
                    out.items.insert(reference);
                    continue;
                }
                match source.indicator(reference.uid()) {
                    Some(child) => self.expand(&child, source, path, out)?,
                    None => {
                        warn!("indicator {} references unknown {}", indicator.uid, reference);
                        out.missing.insert(reference.uid().to_string());
                    }
                }
            }
        }
        path.pop();

        out.indicators.insert(indicator.uid.clone(), indicator.clone());
        Ok(())
    }

    /// Value of `indicator`, annualized by the type of `period` when the
    /// indicator asks for it
    pub fn indicator_value(
        &self,
        indicator: &Indicator,
        ctx: &ValueContext,
        period: Option<&Period>,
    ) -> Result<IndicatorValue> {
        let periods_in_year = period.map_or(1, |p| p.period_type.periods_per_year());
        self.compute_indicator_value(
            &indicator.numerator,
            &indicator.denominator,
            ctx,
            &indicator.factor,
            indicator.annualized,
            periods_in_year,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slice_source() {
        let indicators = [Indicator::new("a", "1", "1"), Indicator::new("b", "2", "1")];
        assert_eq!(indicators[..].indicator("b").map(|i| i.numerator), Some("2".to_string()));
        assert_eq!(indicators[..].indicator("c"), None);
    }

    #[test]
    fn test_self_reference_is_circular() {
        let service = ExpressionService::default();
        let a = Indicator::new("a", "N{a} + 1", "1");
        let err = service
            .expand_indicator_references(&[a.clone()], &[a][..])
            .unwrap_err();
        assert_eq!(err.code(), EXP0106);
        assert!(err.to_string().contains("N{a} -> N{a}"));
    }
}
