//! List operations: car, cdr, list
//!
//! `car` returns the first element as a tagged value; `cdr` the remaining
//! elements as a list (empty for a one-element list); `list` packages its
//! evaluated operands as given.

use crate::env::Environment;
use crate::error::{LispError, ARITY_ONE};
use crate::value::{Builtin, BuiltinFn, Native, Value};
use std::rc::Rc;

static CAR: Builtin = Builtin {
    name: "car",
    func: BuiltinFn::Native(builtin_car),
};
static CDR: Builtin = Builtin {
    name: "cdr",
    func: BuiltinFn::Native(builtin_cdr),
};
static LIST: Builtin = Builtin {
    name: "list",
    func: BuiltinFn::Values(builtin_list),
};

pub fn builtin_car(args: &[Native]) -> Result<Value, LispError> {
    match args {
        [Native::List(items)] => items
            .first()
            .cloned()
            .ok_or_else(|| LispError::Type("car of empty list".to_string())),
        [other] => Err(LispError::type_mismatch("car", "a list", other, 1)),
        _ => Err(LispError::arity("car", ARITY_ONE, args.len())),
    }
}

pub fn builtin_cdr(args: &[Native]) -> Result<Value, LispError> {
    match args {
        [Native::List(items)] => Ok(Value::List(items.get(1..).unwrap_or(&[]).to_vec())),
        [other] => Err(LispError::type_mismatch("cdr", "a list", other, 1)),
        _ => Err(LispError::arity("cdr", ARITY_ONE, args.len())),
    }
}

pub fn builtin_list(args: &[Value]) -> Result<Value, LispError> {
    Ok(Value::List(args.to_vec()))
}

/// Register all list builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define("car".to_string(), Value::Builtin(&CAR));
    env.define("cdr".to_string(), Value::Builtin(&CDR));
    env.define("list".to_string(), Value::Builtin(&LIST));
}
