//! Scalar functions and the call dispatcher

use crate::engine::{ExpressionEngine, Frame};
use crate::error::{EvalError, EvalResult};
use aggexpr_ast::{Expression, Function, FunctionCall};
use aggexpr_types::Value;
use std::cmp::Ordering;

impl ExpressionEngine {
    pub(crate) fn eval_call(&self, call: &FunctionCall, frame: &mut Frame<'_>) -> EvalResult<Value> {
        let function = call.function;
        let args = call.arguments.as_slice();
        if !function.accepts_arity(args.len()) {
            return Err(EvalError::invalid_argument(
                function.name(),
                format!("unexpected argument count {}", args.len()),
            ));
        }

        match function {
            Function::If => self.eval_if(args, frame),
            Function::IsNull => Ok(Value::Boolean(self.eval_raw(&args[0], frame)?.is_null())),
            Function::IsNotNull => Ok(Value::Boolean(!self.eval_raw(&args[0], frame)?.is_null())),
            Function::FirstNonNull => self.eval_first_non_null(args, frame),
            Function::Greatest => self.eval_extreme(function, args, frame, Ordering::Greater),
            Function::Least => self.eval_extreme(function, args, frame, Ordering::Less),
            Function::Log => self.eval_log(args, frame),
            Function::Log10 => Ok(number_arg(function, self.eval(&args[0], frame)?)?
                .map(f64::log10)
                .into()),
            Function::OrgUnitAncestor => Ok(self.eval_org_unit_ancestor(args, frame)),
            Function::OrgUnitGroup => Ok(self.eval_org_unit_group(args, frame)),
            _ => self.eval_aggregate(call, frame),
        }
    }

    /// Only the selected branch is evaluated. A null condition gives no value.
    fn eval_if(&self, args: &[Expression], frame: &mut Frame<'_>) -> EvalResult<Value> {
        match self.eval(&args[0], frame)? {
            Value::Null => Ok(Value::Null),
            Value::Boolean(true) => self.eval(&args[1], frame),
            Value::Boolean(false) => self.eval(&args[2], frame),
            other => Err(EvalError::type_mismatch("if", "boolean", other.type_name())),
        }
    }

    fn eval_first_non_null(&self, args: &[Expression], frame: &mut Frame<'_>) -> EvalResult<Value> {
        for arg in args {
            let value = self.eval_raw(arg, frame)?;
            if !value.is_null() {
                return Ok(value);
            }
        }
        Ok(Value::Null)
    }

    /// `greatest` / `least`: absent arguments are ignored
    fn eval_extreme(
        &self,
        function: Function,
        args: &[Expression],
        frame: &mut Frame<'_>,
        wanted: Ordering,
    ) -> EvalResult<Value> {
        let mut best = Value::Null;
        for arg in args {
            let value = self.eval_raw(arg, frame)?;
            if value.is_null() {
                continue;
            }
            if best.is_null() {
                best = value;
                continue;
            }
            match value.compare(&best) {
                Some(ordering) if ordering == wanted => best = value,
                Some(_) => {}
                None if value.data_type() == best.data_type() => {}
                None => {
                    return Err(EvalError::type_mismatch(
                        function.name(),
                        best.type_name(),
                        value.type_name(),
                    ));
                }
            }
        }
        Ok(best)
    }

    /// Natural log, or change of base. A zero base gives 0, a negative base NaN.
    fn eval_log(&self, args: &[Expression], frame: &mut Frame<'_>) -> EvalResult<Value> {
        let Some(x) = number_arg(Function::Log, self.eval(&args[0], frame)?)? else {
            return Ok(Value::Null);
        };
        let Some(base_expr) = args.get(1) else {
            return Ok(Value::Number(x.ln()));
        };
        let Some(base) = number_arg(Function::Log, self.eval(base_expr, frame)?)? else {
            return Ok(Value::Null);
        };

        let result = if base == 0.0 {
            0.0
        } else if base < 0.0 {
            f64::NAN
        } else {
            x.ln() / base.ln()
        };
        Ok(Value::Number(result))
    }
}

/// Numeric argument, `None` when absent
pub(super) fn number_arg(function: Function, value: Value) -> EvalResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(n)),
        other => Err(EvalError::type_mismatch(function.name(), "number", other.type_name())),
    }
}
