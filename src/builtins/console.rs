//! Textual output: print, format
//!
//! `print` writes one value in printable form without a trailing newline.
//! `format` builds a string from a template where each `~A` placeholder
//! consumes the next argument.

use crate::env::Environment;
use crate::error::{LispError, ARITY_AT_LEAST_ONE, ARITY_ONE};
use crate::value::{Builtin, BuiltinFn, Native, Value};
use std::rc::Rc;

static PRINT: Builtin = Builtin {
    name: "print",
    func: BuiltinFn::Native(builtin_print),
};
static FORMAT: Builtin = Builtin {
    name: "format",
    func: BuiltinFn::Native(builtin_format),
};

pub fn builtin_print(args: &[Native]) -> Result<Value, LispError> {
    match args {
        [value] => {
            print!("{}", value);
            Ok(Value::Nil)
        }
        _ => Err(LispError::arity("print", ARITY_ONE, args.len())),
    }
}

pub fn builtin_format(args: &[Native]) -> Result<Value, LispError> {
    let [template, fills @ ..] = args else {
        return Err(LispError::arity("format", ARITY_AT_LEAST_ONE, args.len()));
    };
    let Native::Str(template) = template else {
        return Err(LispError::type_mismatch("format", "a string", template, 1));
    };

    let mut parts = template.split("~A");
    let mut result = parts.next().unwrap_or("").to_string();
    let mut fills = fills.iter();

    for part in parts {
        let fill = fills
            .next()
            .ok_or_else(|| LispError::syntax("too few arguments for format template"))?;
        result.push_str(&fill.to_string());
        result.push_str(part);
    }

    Ok(Value::Str(result))
}

/// Register all console builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define("print".to_string(), Value::Builtin(&PRINT));
    env.define("format".to_string(), Value::Builtin(&FORMAT));
}
