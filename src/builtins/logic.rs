//! Logical wrappers: and, or
//!
//! Both fold the host bitwise operator over their operands: AND/OR of the
//! bits for integers, of the truth values for booleans. There is no
//! short-circuiting; operands are already evaluated on entry.

use super::{as_number, Num};
use crate::env::Environment;
use crate::error::{LispError, ARITY_AT_LEAST_ONE};
use crate::value::{Builtin, BuiltinFn, Native, Value};
use std::rc::Rc;

static AND: Builtin = Builtin {
    name: "and",
    func: BuiltinFn::Native(builtin_and),
};
static OR: Builtin = Builtin {
    name: "or",
    func: BuiltinFn::Native(builtin_or),
};

pub fn builtin_and(args: &[Native]) -> Result<Value, LispError> {
    fold_bitwise("and", args, |a, b| a & b, |a, b| a & b)
}

pub fn builtin_or(args: &[Native]) -> Result<Value, LispError> {
    fold_bitwise("or", args, |a, b| a | b, |a, b| a | b)
}

fn fold_bitwise(
    function: &str,
    args: &[Native],
    int_op: fn(i64, i64) -> i64,
    bool_op: fn(bool, bool) -> bool,
) -> Result<Value, LispError> {
    match args.first() {
        None => Err(LispError::arity(function, ARITY_AT_LEAST_ONE, 0)),
        Some(Native::Bool(first)) => {
            let mut acc = *first;
            for (i, arg) in args[1..].iter().enumerate() {
                match arg {
                    Native::Bool(b) => acc = bool_op(acc, *b),
                    other => {
                        return Err(LispError::type_mismatch(function, "a bool", other, i + 2));
                    }
                }
            }
            Ok(Value::Bool(acc))
        }
        Some(first) => {
            let mut acc = as_int(function, first, 1)?;
            for (i, arg) in args[1..].iter().enumerate() {
                acc = int_op(acc, as_int(function, arg, i + 2)?);
            }
            Ok(Value::Int(acc))
        }
    }
}

fn as_int(function: &str, arg: &Native, position: usize) -> Result<i64, LispError> {
    match as_number(function, arg, position)? {
        Num::Int(n) => Ok(n),
        Num::Float(_) => Err(LispError::type_mismatch(function, "an int", arg, position)),
    }
}

/// Register all logic builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define("and".to_string(), Value::Builtin(&AND));
    env.define("or".to_string(), Value::Builtin(&OR));
}
