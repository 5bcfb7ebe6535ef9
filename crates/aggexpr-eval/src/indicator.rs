//! Indicator value calculation
//!
//! An indicator is `numerator / denominator * factor`, where the factor
//! comes from the indicator type (or an explicit multiplier and divisor)
//! and, for annualized indicators, the number of periods in a year.

use crate::context::ValueContext;
use crate::engine::ExpressionEngine;
use crate::error::{EvalError, EvalResult};
use aggexpr_ast::Expression;
use aggexpr_types::Value;
use log::debug;
use serde::{Deserialize, Serialize};

/// Factor of an indicator type, optionally overridden per indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorFactor {
    pub base_factor: f64,
    /// Explicit `(multiplier, divisor)`
    #[serde(default)]
    pub explicit: Option<(f64, f64)>,
}

impl Default for IndicatorFactor {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl IndicatorFactor {
    pub fn new(base_factor: f64) -> Self {
        Self {
            base_factor,
            explicit: None,
        }
    }

    pub fn with_explicit(mut self, multiplier: f64, divisor: f64) -> Self {
        self.explicit = Some((multiplier, divisor));
        self
    }
}

/// Computed indicator value with the parts it was built from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorValue {
    pub numerator_value: Option<f64>,
    pub denominator_value: Option<f64>,
    pub multiplier: f64,
    pub divisor: f64,
    pub annualization_factor: f64,
    /// `multiplier / divisor`
    pub factor: f64,
    /// `None` when either side has no value or the denominator is zero
    pub value: Option<f64>,
}

impl ExpressionEngine {
    /// Evaluate numerator and denominator in `ctx` and combine them
    pub fn compute_indicator_value(
        &self,
        numerator: &Expression,
        denominator: &Expression,
        ctx: &ValueContext,
        factor: &IndicatorFactor,
        annualize: bool,
        periods_in_year: u32,
    ) -> EvalResult<IndicatorValue> {
        let numerator_value = indicator_part("numerator", self.evaluate(numerator, ctx)?)?;
        let denominator_value = indicator_part("denominator", self.evaluate(denominator, ctx)?)?;

        let annualization_factor = if annualize {
            f64::from(periods_in_year)
        } else {
            1.0
        };
        let (multiplier, divisor) = match factor.explicit {
            Some((multiplier, divisor)) => (multiplier * annualization_factor, divisor),
            None => (factor.base_factor * annualization_factor, 1.0),
        };
        let combined = multiplier / divisor;

        let value = match (numerator_value, denominator_value) {
            (Some(num), Some(den)) if den != 0.0 => {
                Some(num / den * combined).filter(|v| v.is_finite())
            }
            _ => None,
        };
        debug!(
            "indicator {:?} / {:?} * {} => {:?}",
            numerator_value, denominator_value, combined, value
        );

        Ok(IndicatorValue {
            numerator_value,
            denominator_value,
            multiplier,
            divisor,
            annualization_factor,
            factor: combined,
            value,
        })
    }
}

fn indicator_part(part: &'static str, value: Value) -> EvalResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(n)),
        other => Err(EvalError::type_mismatch(part, "number", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_explicit_factor_is_annualized() {
        let engine = ExpressionEngine::new();
        let factor = IndicatorFactor::new(100.0).with_explicit(10.0, 4.0);
        let result = engine
            .compute_indicator_value(
                &Expression::number(3.0),
                &Expression::number(1.0),
                &ValueContext::new(),
                &factor,
                true,
                12,
            )
            .unwrap();
        assert_eq!(result.multiplier, 120.0);
        assert_eq!(result.divisor, 4.0);
        assert_eq!(result.factor, 30.0);
        assert_eq!(result.value, Some(90.0));
    }

    #[test]
    fn test_zero_denominator_has_no_value() {
        let result = ExpressionEngine::new()
            .compute_indicator_value(
                &Expression::number(3.0),
                &Expression::number(0.0),
                &ValueContext::new(),
                &IndicatorFactor::new(100.0),
                false,
                1,
            )
            .unwrap();
        assert_eq!(result.denominator_value, Some(0.0));
        assert_eq!(result.value, None);
    }

    #[test]
    fn test_text_numerator_is_rejected() {
        let err = ExpressionEngine::new()
            .compute_indicator_value(
                &Expression::string("abc"),
                &Expression::number(1.0),
                &ValueContext::new(),
                &IndicatorFactor::default(),
                false,
                1,
            )
            .unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { .. }));
    }
}
