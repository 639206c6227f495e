//! Meta and process primitives: eval, load, debug, exit
//!
//! `eval` and `load` re-enter the evaluator with the calling environment;
//! `debug` moves the runtime log level; `exit` says goodbye and terminates.

use crate::env::Environment;
use crate::error::{LispError, ARITY_ONE, ARITY_ZERO};
use crate::eval::eval;
use crate::reader::parse;
use crate::value::{Builtin, BuiltinFn, Native, Value};
use log::LevelFilter;
use std::fs;
use std::rc::Rc;

static EVAL: Builtin = Builtin {
    name: "eval",
    func: BuiltinFn::ValuesEnv(builtin_eval),
};
static LOAD: Builtin = Builtin {
    name: "load",
    func: BuiltinFn::NativeEnv(builtin_load),
};
static DEBUG: Builtin = Builtin {
    name: "debug",
    func: BuiltinFn::Native(builtin_debug),
};
static EXIT: Builtin = Builtin {
    name: "exit",
    func: BuiltinFn::Native(builtin_exit),
};

/// Evaluate the (already evaluated) operand once more, in the calling
/// environment. `(eval (quote E))` therefore behaves like `E`.
pub fn builtin_eval(env: &Rc<Environment>, args: &[Value]) -> Result<Value, LispError> {
    match args {
        [term] => eval(term, env),
        _ => Err(LispError::arity("eval", ARITY_ONE, args.len())),
    }
}

/// Read, parse, and evaluate a file in the calling environment
pub fn builtin_load(env: &Rc<Environment>, args: &[Native]) -> Result<Value, LispError> {
    match args {
        [Native::Str(filename)] => {
            let program = fs::read_to_string(filename)
                .map_err(|e| LispError::Io(format!("file open error on {}: {}", filename, e)))?;
            for term in parse(&program)? {
                eval(&term, env)?;
            }
            Ok(Value::Nil)
        }
        [other] => Err(LispError::type_mismatch("load", "a file name", other, 1)),
        _ => Err(LispError::arity("load", ARITY_ONE, args.len())),
    }
}

pub fn builtin_debug(args: &[Native]) -> Result<Value, LispError> {
    const LEVEL_HINT: &str = "log level must be CRITICAL, ERROR, WARNING, INFO, or DEBUG";

    match args {
        [Native::Str(level)] => {
            let filter = match level.to_uppercase().as_str() {
                "CRITICAL" | "ERROR" => LevelFilter::Error,
                "WARNING" => LevelFilter::Warn,
                "INFO" => LevelFilter::Info,
                "DEBUG" => LevelFilter::Debug,
                _ => return Err(LispError::syntax(LEVEL_HINT)),
            };
            log::set_max_level(filter);
            Ok(Value::Int(0))
        }
        [_] => Err(LispError::syntax(LEVEL_HINT)),
        _ => Err(LispError::arity("debug", ARITY_ONE, args.len())),
    }
}

pub fn builtin_exit(args: &[Native]) -> Result<Value, LispError> {
    if !args.is_empty() {
        return Err(LispError::arity("exit", ARITY_ZERO, args.len()));
    }
    println!("Bye!");
    std::process::exit(0);
}

/// Register all meta builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.define("eval".to_string(), Value::Builtin(&EVAL));
    env.define("load".to_string(), Value::Builtin(&LOAD));
    env.define("debug".to_string(), Value::Builtin(&DEBUG));
    env.define("exit".to_string(), Value::Builtin(&EXIT));
}
