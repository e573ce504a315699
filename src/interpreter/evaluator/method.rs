use std::rc::Rc;

use crate::{
    ast::{Bound, Method, Range},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            scope::Scope,
        },
        value::Value,
    },
    util::num::int_to_size,
};

impl Context {
    /// Applies a postfix method to a value.
    ///
    /// The built-in methods are:
    /// - `append(x)`: concatenation; the result length is the sum of both
    ///   lengths.
    /// - `sqrt()`: elementwise integer square root, truncated.
    /// - `size()`: a one-element array holding the current length.
    ///
    /// # Parameters
    /// - `value`: The receiver.
    /// - `method`: The parsed method call.
    /// - `scope`: The scope the argument expressions evaluate in.
    ///
    /// # Errors
    /// `UnknownMethod` for any other name; `ArgumentCountMismatch` when
    /// the arity is wrong.
    pub(crate) fn eval_method(&mut self,
                              value: &Value,
                              method: &Method,
                              scope: &Rc<Scope>)
                              -> EvalResult<Value> {
        let mut arguments = Vec::with_capacity(method.arguments.len());
        for argument in &method.arguments {
            arguments.push(self.eval_expression(argument, scope)?);
        }

        match method.name.as_str() {
            "append" => {
                check_method_arity(method, &arguments, 1)?;
                let left = value.as_ints(method.line)?;
                let right = arguments[0].as_ints(method.line)?;

                let mut values = Vec::with_capacity(left.len() + right.len());
                values.extend_from_slice(left);
                values.extend_from_slice(right);
                Ok(Value::fixed(values))
            },
            "sqrt" => {
                check_method_arity(method, &arguments, 0)?;
                let values = value.as_ints(method.line)?
                                  .iter()
                                  .map(|&element| isqrt(element))
                                  .collect();
                Ok(Value::fixed(values))
            },
            "size" => {
                check_method_arity(method, &arguments, 0)?;
                let length =
                    crate::util::num::size_to_int(value.len(),
                                                  RuntimeError::InvalidArgument {
                        details: format!("array length {} does not fit an integer", value.len()),
                        line: method.line,
                    })?;
                Ok(Value::fixed(vec![length]))
            },
            _ => Err(RuntimeError::UnknownMethod { name: method.name.clone(),
                                                   line: method.line, }),
        }
    }

    /// Applies a slice to a value, producing a fresh fixed-size copy of
    /// the selected elements.
    ///
    /// A missing lower bound is 0; a missing upper bound is the current
    /// length. Expression bounds must evaluate to a single non-negative
    /// element. The bounds must satisfy `start <= end <= length`.
    pub(crate) fn eval_range(&mut self,
                             value: &Value,
                             range: &Range,
                             scope: &Rc<Scope>,
                             line: usize)
                             -> EvalResult<Value> {
        let length = value.len();

        let start = match &range.start {
            Some(bound) => self.resolve_bound(bound, scope, line)?,
            None => 0,
        };
        let end = match &range.end {
            Some(bound) => self.resolve_bound(bound, scope, line)?,
            None => length,
        };

        if end < start {
            return Err(RuntimeError::InvalidRange { start, end, line });
        }
        if end > length {
            return Err(RuntimeError::RangeOutOfBounds { end, length, line });
        }

        Ok(Value::fixed(value.as_ints(line)?[start..end].to_vec()))
    }

    fn resolve_bound(&mut self,
                     bound: &Bound,
                     scope: &Rc<Scope>,
                     line: usize)
                     -> EvalResult<usize> {
        match bound {
            Bound::Literal(index) => Ok(*index),
            Bound::Expression(expression) => {
                let value = self.eval_expression(expression, scope)?;
                let values = value.as_ints(expression.line)?;
                if values.len() != 1 || values[0] < 0 {
                    return Err(RuntimeError::ExpectedSingleElement { context: "Array range bound",
                                                                     found: value.to_string(),
                                                                     line });
                }
                int_to_size(values[0],
                            RuntimeError::ExpectedSingleElement { context: "Array range bound",
                                                                  found: value.to_string(),
                                                                  line })
            },
        }
    }
}

fn check_method_arity(method: &Method, arguments: &[Value], expected: usize) -> EvalResult<()> {
    if arguments.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCountMismatch { name: method.name.clone(),
                                                  expected,
                                                  found: arguments.len(),
                                                  line: method.line, })
    }
}

/// Truncated integer square root. Negative inputs saturate to 0.
#[allow(clippy::cast_possible_truncation)]
fn isqrt(value: i32) -> i32 {
    f64::from(value).sqrt() as i32
}
