//! Arithmetic operations: +, -, *, /
//!
//! Each is a left fold over its operands. A single operand is returned as
//! supplied; no operands is an arity error. Integer folds stay integral,
//! and any float operand coerces the rest of the fold to float.

use super::{as_number, Num};
use crate::env::Environment;
use crate::error::{LispError, ARITY_AT_LEAST_ONE};
use crate::value::{Builtin, BuiltinFn, Native, Value};
use std::rc::Rc;

static ADD: Builtin = Builtin {
    name: "+",
    func: BuiltinFn::Native(builtin_add),
};
static SUB: Builtin = Builtin {
    name: "-",
    func: BuiltinFn::Native(builtin_sub),
};
static MUL: Builtin = Builtin {
    name: "*",
    func: BuiltinFn::Native(builtin_mul),
};
static DIV: Builtin = Builtin {
    name: "/",
    func: BuiltinFn::Native(builtin_div),
};

pub fn builtin_add(args: &[Native]) -> Result<Value, LispError> {
    fold_numeric("+", args, |a, b| Ok(a + b), |a, b| a + b)
}

pub fn builtin_sub(args: &[Native]) -> Result<Value, LispError> {
    fold_numeric("-", args, |a, b| Ok(a - b), |a, b| a - b)
}

pub fn builtin_mul(args: &[Native]) -> Result<Value, LispError> {
    fold_numeric("*", args, |a, b| Ok(a * b), |a, b| a * b)
}

pub fn builtin_div(args: &[Native]) -> Result<Value, LispError> {
    fold_numeric(
        "/",
        args,
        |a, b| {
            if b == 0 {
                Err(LispError::Type("division by zero".to_string()))
            } else {
                Ok(a / b)
            }
        },
        |a, b| a / b,
    )
}

/// Left fold with int/float pairing: two ints use the integer operation,
/// anything else drops to float
fn fold_numeric(
    function: &str,
    args: &[Native],
    int_op: fn(i64, i64) -> Result<i64, LispError>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, LispError> {
    if args.is_empty() {
        return Err(LispError::arity(function, ARITY_AT_LEAST_ONE, 0));
    }

    let mut acc = as_number(function, &args[0], 1)?;
    for (i, arg) in args[1..].iter().enumerate() {
        let operand = as_number(function, arg, i + 2)?;
        acc = match (acc, operand) {
            (Num::Int(a), Num::Int(b)) => Num::Int(int_op(a, b)?),
            (a, b) => Num::Float(float_op(a.as_f64(), b.as_f64())),
        };
    }

    Ok(acc.into())
}

/// Register all arithmetic builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define("+".to_string(), Value::Builtin(&ADD));
    env.define("-".to_string(), Value::Builtin(&SUB));
    env.define("*".to_string(), Value::Builtin(&MUL));
    env.define("/".to_string(), Value::Builtin(&DIV));
}
