//! Comparison operations: <, >, <=, >=, =
//!
//! All are binary and return a boolean. The ordering operators want
//! numbers and coerce a mixed int/float pair to float; `=` additionally
//! compares strings, booleans, and nil, and is false across kinds.

use super::{as_number, Num};
use crate::env::Environment;
use crate::error::{LispError, ARITY_TWO};
use crate::value::{Builtin, BuiltinFn, Native, Value};
use std::cmp::Ordering;
use std::rc::Rc;

static LT: Builtin = Builtin {
    name: "<",
    func: BuiltinFn::Native(builtin_lt),
};
static GT: Builtin = Builtin {
    name: ">",
    func: BuiltinFn::Native(builtin_gt),
};
static LE: Builtin = Builtin {
    name: "<=",
    func: BuiltinFn::Native(builtin_le),
};
static GE: Builtin = Builtin {
    name: ">=",
    func: BuiltinFn::Native(builtin_ge),
};
static EQ: Builtin = Builtin {
    name: "=",
    func: BuiltinFn::Native(builtin_eq),
};

pub fn builtin_lt(args: &[Native]) -> Result<Value, LispError> {
    compare("<", args).map(|ord| Value::Bool(ord == Some(Ordering::Less)))
}

pub fn builtin_gt(args: &[Native]) -> Result<Value, LispError> {
    compare(">", args).map(|ord| Value::Bool(ord == Some(Ordering::Greater)))
}

pub fn builtin_le(args: &[Native]) -> Result<Value, LispError> {
    compare("<=", args).map(|ord| Value::Bool(matches!(ord, Some(Ordering::Less | Ordering::Equal))))
}

pub fn builtin_ge(args: &[Native]) -> Result<Value, LispError> {
    compare(">=", args)
        .map(|ord| Value::Bool(matches!(ord, Some(Ordering::Greater | Ordering::Equal))))
}

pub fn builtin_eq(args: &[Native]) -> Result<Value, LispError> {
    match args {
        [a, b] => Ok(Value::Bool(native_eq(a, b))),
        _ => Err(LispError::arity("=", ARITY_TWO, args.len())),
    }
}

/// Numeric ordering of exactly two operands; `None` only when a NaN is
/// involved
fn compare(function: &str, args: &[Native]) -> Result<Option<Ordering>, LispError> {
    match args {
        [a, b] => {
            let a = as_number(function, a, 1)?;
            let b = as_number(function, b, 2)?;
            Ok(match (a, b) {
                (Num::Int(x), Num::Int(y)) => Some(x.cmp(&y)),
                (x, y) => x.as_f64().partial_cmp(&y.as_f64()),
            })
        }
        _ => Err(LispError::arity(function, ARITY_TWO, args.len())),
    }
}

fn native_eq(a: &Native, b: &Native) -> bool {
    match (a, b) {
        (Native::Int(x), Native::Int(y)) => x == y,
        (Native::Float(x), Native::Float(y)) => x == y,
        (Native::Int(x), Native::Float(y)) | (Native::Float(y), Native::Int(x)) => *x as f64 == *y,
        (Native::Str(x), Native::Str(y)) => x == y,
        (Native::Bool(x), Native::Bool(y)) => x == y,
        (Native::Nil, Native::Nil) => true,
        _ => false,
    }
}

/// Register all comparison builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define("<".to_string(), Value::Builtin(&LT));
    env.define(">".to_string(), Value::Builtin(&GT));
    env.define("<=".to_string(), Value::Builtin(&LE));
    env.define(">=".to_string(), Value::Builtin(&GE));
    env.define("=".to_string(), Value::Builtin(&EQ));
}
