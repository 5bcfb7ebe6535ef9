//! Predictor aggregates over sample periods
//!
//! The argument is evaluated once per sample period against that period's
//! values, with the missing-value strategy applied per period. Periods that
//! yield no value are left out of the reduction; with nothing left the
//! aggregate has no value.

use super::functions::number_arg;
use crate::engine::{decide, Decision, ExpressionEngine, Frame};
use crate::error::{EvalError, EvalResult};
use aggexpr_ast::{Function, FunctionCall};
use aggexpr_types::Value;
use log::trace;

impl ExpressionEngine {
    pub(crate) fn eval_aggregate(&self, call: &FunctionCall, frame: &mut Frame<'_>) -> EvalResult<Value> {
        let function = call.function;
        let (fraction, arg) = match (function, call.arguments.as_slice()) {
            (Function::PercentileCont, [fraction, arg]) => {
                let fraction = number_arg(function, self.eval(fraction, frame)?)?;
                match fraction {
                    Some(f) if (0.0..=1.0).contains(&f) => (Some(f), arg),
                    Some(f) => {
                        return Err(EvalError::invalid_argument(
                            function.name(),
                            format!("fraction {} is outside 0..1", f),
                        ));
                    }
                    None => return Ok(Value::Null),
                }
            }
            (_, [arg]) => (None, arg),
            (_, args) => {
                return Err(EvalError::invalid_argument(
                    function.name(),
                    format!("unexpected argument count {}", args.len()),
                ));
            }
        };

        let ctx = frame.ctx;
        let mut samples = Vec::with_capacity(ctx.samples.len());
        for sample in &ctx.samples {
            let decision = decide(arg, &sample.values, ctx, ctx.missing_value_strategy);
            let mut period_frame = Frame {
                ctx,
                values: &sample.values,
                substitute: decision == Decision::Evaluate,
                depth: frame.depth,
            };
            let value = self.eval(arg, &mut period_frame)?;
            trace!("{}() sample {} => {:?} ({:?})", function.name(), sample.period, value, decision);
            if decision == Decision::Evaluate && !value.is_null() {
                samples.push(value);
            }
        }

        if function == Function::Count {
            return Ok(match samples.len() {
                0 => Value::Null,
                n => Value::Number(n as f64),
            });
        }

        let mut numbers = Vec::with_capacity(samples.len());
        for value in samples {
            if let Some(n) = number_arg(function, value)? {
                numbers.push(n);
            }
        }
        Ok(reduce(function, numbers, fraction).into())
    }
}

fn reduce(function: Function, mut values: Vec<f64>, fraction: Option<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    match function {
        Function::Sum => Some(values.iter().sum()),
        Function::Avg => Some(mean(&values)),
        Function::Min => values.iter().copied().reduce(f64::min),
        Function::Max => values.iter().copied().reduce(f64::max),
        Function::Median => {
            values.sort_by(f64::total_cmp);
            Some(percentile(&values, 0.5))
        }
        Function::PercentileCont => {
            values.sort_by(f64::total_cmp);
            Some(percentile(&values, fraction.unwrap_or(0.5)))
        }
        Function::StdDev | Function::StdDevPop => Some((sum_sq_diff(&values) / n).sqrt()),
        Function::StdDevSamp if values.len() > 1 => Some((sum_sq_diff(&values) / (n - 1.0)).sqrt()),
        Function::Variance if values.len() > 1 => Some(sum_sq_diff(&values) / (n - 1.0)),
        _ => None,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sum_sq_diff(values: &[f64]) -> f64 {
    let mean = mean(values);
    values.iter().map(|x| (x - mean).powi(2)).sum()
}

/// Linear interpolation between closest ranks of sorted values
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let rank = fraction * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let (Some(lo), Some(hi)) = (sorted.get(lower), sorted.get(upper)) else {
        return f64::NAN;
    };
    lo + (hi - lo) * (rank - lower as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const VALUES: [f64; 4] = [4.0, 1.0, 3.0, 2.0];

    #[rstest]
    #[case(Function::Sum, Some(10.0))]
    #[case(Function::Avg, Some(2.5))]
    #[case(Function::Min, Some(1.0))]
    #[case(Function::Max, Some(4.0))]
    #[case(Function::Median, Some(2.5))]
    #[case(Function::Variance, Some(5.0 / 3.0))]
    fn test_reduce(#[case] function: Function, #[case] expected: Option<f64>) {
        assert_eq!(reduce(function, VALUES.to_vec(), None), expected);
    }

    #[test]
    fn test_standard_deviations() {
        let population = reduce(Function::StdDev, VALUES.to_vec(), None).unwrap();
        assert!((population - 1.25_f64.sqrt()).abs() < 1e-12);
        assert_eq!(reduce(Function::StdDevPop, VALUES.to_vec(), None), Some(population));

        let sample = reduce(Function::StdDevSamp, VALUES.to_vec(), None).unwrap();
        assert!((sample - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(reduce(Function::StdDevSamp, vec![1.0], None), None);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 1.0), 4.0);
        assert_eq!(percentile(&sorted, 0.5), 2.5);
        assert_eq!(percentile(&[7.0], 0.3), 7.0);
    }

    #[test]
    fn test_empty_has_no_value() {
        assert_eq!(reduce(Function::Sum, Vec::new(), None), None);
    }
}
