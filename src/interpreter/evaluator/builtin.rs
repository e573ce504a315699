use std::io::Write;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{Value, is_displayable, to_bytes},
    },
    util::term,
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the context (for output and host access), the
/// already-evaluated argument values, and the call's line number.
type BuiltinFn = fn(&mut Context, &[Value], usize) -> EvalResult<Value>;

/// Defines builtin functions by generating a lookup table.
///
/// Each entry provides a name, the exact number of arguments, and a
/// function pointer implementing the builtin.
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: usize,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
    };
}

builtin_functions! {
    "print"   => { arity: 1, func: print },
    "read"    => { arity: 1, func: read },
    "getchar" => { arity: 0, func: getchar },
    "clear"   => { arity: 0, func: clear },
    "range"   => { arity: 1, func: range },
    "exit"    => { arity: 1, func: exit },
}

/// Dispatches a call to a builtin, when one matches.
///
/// Builtins are only consulted for names with no user binding, so user
/// definitions shadow them.
///
/// # Returns
/// `Ok(None)` when `name` is not a builtin; otherwise the builtin's
/// result after an arity check.
pub fn dispatch(context: &mut Context,
                name: &str,
                arguments: &[Value],
                line: usize)
                -> EvalResult<Option<Value>> {
    let Some(builtin) = BUILTIN_TABLE.iter().find(|b| b.name == name) else {
        return Ok(None);
    };

    if arguments.len() != builtin.arity {
        return Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                         expected: builtin.arity,
                                                         found: arguments.len(),
                                                         line });
    }

    (builtin.func)(context, arguments, line).map(Some)
}

/// Writes the argument to the context's output.
///
/// Arrays made purely of displayable bytes are written as raw text; any
/// other array is written in the canonical `[ e0, e1, … ]` form.
fn print(context: &mut Context, arguments: &[Value], line: usize) -> EvalResult<Value> {
    let values = arguments[0].as_ints(line)?;

    let io_error = |error: std::io::Error| {
        RuntimeError::Io { details: error.to_string(),
                           line }
    };

    if is_displayable(values) {
        context.out.write_all(&to_bytes(values)).map_err(io_error)?;
    } else {
        write!(context.out, "{}", arguments[0]).map_err(io_error)?;
    }
    context.out.flush().map_err(io_error)?;

    Ok(Value::empty())
}

/// Reads a whole file, named by the argument's bytes, into a byte array.
fn read(_context: &mut Context, arguments: &[Value], line: usize) -> EvalResult<Value> {
    let filename_bytes = to_bytes(arguments[0].as_ints(line)?);
    let filename = String::from_utf8_lossy(&filename_bytes).into_owned();

    let contents = std::fs::read(&filename).map_err(|_| {
                                               RuntimeError::FileOpen { path: filename.clone(),
                                                                        line }
                                           })?;

    Ok(Value::growable(contents.into_iter().map(i32::from).collect()))
}

/// Reads one key from the controlling terminal in raw mode.
fn getchar(_context: &mut Context, _arguments: &[Value], line: usize) -> EvalResult<Value> {
    let key = term::read_key().map_err(|error| {
                                  RuntimeError::Io { details: error.to_string(),
                                                     line }
                              })?;
    Ok(Value::fixed(vec![i32::from(key)]))
}

/// Clears the host terminal.
fn clear(context: &mut Context, _arguments: &[Value], line: usize) -> EvalResult<Value> {
    context.out.flush().map_err(|error| {
                           RuntimeError::Io { details: error.to_string(),
                                              line }
                       })?;
    term::clear_screen().map_err(|error| {
                            RuntimeError::Io { details: error.to_string(),
                                               line }
                        })?;
    Ok(Value::empty())
}

/// Produces `[0, 1, …, N-1]` from a one-element non-negative argument.
fn range(_context: &mut Context, arguments: &[Value], line: usize) -> EvalResult<Value> {
    let values = arguments[0].as_ints(line)?;

    if values.len() != 1 {
        return Err(RuntimeError::ExpectedSingleElement { context: "range",
                                                         found: arguments[0].to_string(),
                                                         line });
    }

    let length = values[0];
    if length < 0 {
        return Err(RuntimeError::InvalidArgument {
            details: format!("range expects a non-negative length, received {length}"),
            line,
        });
    }

    Ok(Value::fixed((0..length).collect()))
}

/// Terminates the process with the argument's first element as status.
fn exit(context: &mut Context, arguments: &[Value], line: usize) -> EvalResult<Value> {
    let values = arguments[0].as_ints(line)?;
    let status = values.first().copied().ok_or(RuntimeError::ExpectedSingleElement {
        context: "exit",
        found: arguments[0].to_string(),
        line,
    })?;

    let _ = context.out.flush();
    std::process::exit(status);
}
