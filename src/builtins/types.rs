//! Type predicates: list?, symbol?, int?, float?, string?
//!
//! Each inspects the variant of its single evaluated operand. Operands
//! arrive unprojected, so `(symbol? (quote howdy))` sees the symbol itself.

use crate::env::Environment;
use crate::error::{LispError, ARITY_ONE};
use crate::value::{Builtin, BuiltinFn, Value};
use std::rc::Rc;

static LIST_Q: Builtin = Builtin {
    name: "list?",
    func: BuiltinFn::Values(builtin_list_q),
};
static SYMBOL_Q: Builtin = Builtin {
    name: "symbol?",
    func: BuiltinFn::Values(builtin_symbol_q),
};
static INT_Q: Builtin = Builtin {
    name: "int?",
    func: BuiltinFn::Values(builtin_int_q),
};
static FLOAT_Q: Builtin = Builtin {
    name: "float?",
    func: BuiltinFn::Values(builtin_float_q),
};
static STRING_Q: Builtin = Builtin {
    name: "string?",
    func: BuiltinFn::Values(builtin_string_q),
};

pub fn builtin_list_q(args: &[Value]) -> Result<Value, LispError> {
    one_arg("list?", args).map(|value| Value::Bool(matches!(value, Value::List(_))))
}

pub fn builtin_symbol_q(args: &[Value]) -> Result<Value, LispError> {
    one_arg("symbol?", args).map(|value| Value::Bool(matches!(value, Value::Sym(_))))
}

pub fn builtin_int_q(args: &[Value]) -> Result<Value, LispError> {
    one_arg("int?", args).map(|value| Value::Bool(matches!(value, Value::Int(_))))
}

pub fn builtin_float_q(args: &[Value]) -> Result<Value, LispError> {
    one_arg("float?", args).map(|value| Value::Bool(matches!(value, Value::Float(_))))
}

pub fn builtin_string_q(args: &[Value]) -> Result<Value, LispError> {
    one_arg("string?", args).map(|value| Value::Bool(matches!(value, Value::Str(_))))
}

fn one_arg<'a>(function: &str, args: &'a [Value]) -> Result<&'a Value, LispError> {
    match args {
        [value] => Ok(value),
        _ => Err(LispError::arity(function, ARITY_ONE, args.len())),
    }
}

/// Register all predicate builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define("list?".to_string(), Value::Builtin(&LIST_Q));
    env.define("symbol?".to_string(), Value::Builtin(&SYMBOL_Q));
    env.define("int?".to_string(), Value::Builtin(&INT_Q));
    env.define("float?".to_string(), Value::Builtin(&FLOAT_Q));
    env.define("string?".to_string(), Value::Builtin(&STRING_Q));
}
