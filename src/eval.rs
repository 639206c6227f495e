// ABOUTME: Evaluator dispatching over AST terms, special forms included

use crate::env::Environment;
use crate::error::LispError;
use crate::value::{BuiltinFn, Lambda, Native, Value};
use log::{debug, info};
use std::rc::Rc;

/// Evaluate one term against an environment.
///
/// Constants and function values evaluate to themselves, symbols by lookup,
/// and lists by the application rule: a head symbol naming a special form is
/// dispatched with its operands unevaluated, anything else is a call.
pub fn eval(term: &Value, env: &Rc<Environment>) -> Result<Value, LispError> {
    match term {
        Value::Int(_)
        | Value::Float(_)
        | Value::Str(_)
        | Value::Bool(_)
        | Value::Nil
        | Value::Lambda(_)
        | Value::Builtin(_) => Ok(term.clone()),

        Value::Sym(name) => env.lookup(name),

        Value::List(items) => eval_form(items, env),
    }
}

/// The closed table of special forms, with fall-through to application
fn eval_form(items: &[Value], env: &Rc<Environment>) -> Result<Value, LispError> {
    let Some(head) = items.first() else {
        return Ok(Value::Nil);
    };

    if let Value::Sym(name) = head {
        match name.as_str() {
            "quote" => {
                return match &items[1..] {
                    [term] => Ok(term.clone()),
                    _ => Err(LispError::syntax("wrong arity for \"quote\"")),
                };
            }
            "quasiquote" => {
                return match &items[1..] {
                    [template] => match quasiquote(template, env)? {
                        Quasi::Term(value) => Ok(value),
                        Quasi::Splice(values) => Ok(Value::List(values)),
                    },
                    _ => Err(LispError::syntax("wrong arity for \"quasiquote\"")),
                };
            }
            "unquote" => return Err(LispError::syntax("unquote outside quasiquote")),
            "unquote-splicing" => {
                return Err(LispError::syntax("unquote-splicing outside quasiquote"));
            }
            "if" => return eval_if(&items[1..], env),
            "define" => return eval_define(&items[1..], env),
            "set!" => return eval_set(&items[1..], env),
            "let" => return eval_let("let", &items[1..], env),
            "let*" => return eval_let("let*", &items[1..], env),
            "begin" => return eval_begin(&items[1..], env),
            "lambda" => return eval_lambda(&items[1..], env),
            _ => {}
        }
    }

    apply(items, env)
}

fn eval_if(args: &[Value], env: &Rc<Environment>) -> Result<Value, LispError> {
    match args {
        [test, if_true, if_false] => {
            let condition = eval(test, env)?;
            if is_truthy(&condition, env)? {
                eval(if_true, env)
            } else {
                eval(if_false, env)
            }
        }
        _ => Err(LispError::syntax("wrong arity for \"if\"")),
    }
}

/// Truthiness of an evaluated test, by native projection: false, zero of
/// either kind, the empty string, the empty list, and nil are falsy.
/// Function values never project, so they count as truthy outright.
fn is_truthy(value: &Value, env: &Rc<Environment>) -> Result<bool, LispError> {
    if matches!(value, Value::Lambda(_) | Value::Builtin(_)) {
        return Ok(true);
    }
    Ok(match value.project(env)? {
        Native::Bool(b) => b,
        Native::Int(n) => n != 0,
        Native::Float(x) => x != 0.0,
        Native::Str(s) => !s.is_empty(),
        Native::List(items) => !items.is_empty(),
        Native::Nil => false,
    })
}

fn eval_define(args: &[Value], env: &Rc<Environment>) -> Result<Value, LispError> {
    match args {
        [Value::Sym(name), term] => {
            if !env.is_root() {
                return Err(LispError::syntax("can only define at top level"));
            }
            debug!("defining {}", name);
            let value = eval(term, env)?;
            env.define(name.clone(), value);
            Ok(Value::Nil)
        }
        [_, _] => Err(LispError::syntax("define expects a symbol to bind")),
        _ => Err(LispError::syntax("wrong arity for \"define\"")),
    }
}

fn eval_set(args: &[Value], env: &Rc<Environment>) -> Result<Value, LispError> {
    match args {
        [Value::Sym(name), term] => {
            let value = eval(term, env)?;
            env.assign(name, value)?;
            Ok(Value::Nil)
        }
        [_, _] => Err(LispError::syntax("set! expects a symbol to assign")),
        _ => Err(LispError::syntax("wrong arity for \"set!\"")),
    }
}

/// `let` evaluates every initializer in the enclosing scope before binding;
/// `let*` evaluates each one in the new frame, so later initializers see
/// earlier bindings.
fn eval_let(form: &str, args: &[Value], env: &Rc<Environment>) -> Result<Value, LispError> {
    let [bindings, body] = args else {
        return Err(LispError::Syntax(format!("wrong arity for \"{}\"", form)));
    };
    let Value::List(pairs) = bindings else {
        return Err(LispError::Syntax(format!("{} bindings must be a list", form)));
    };

    let sequential = form == "let*";
    let frame = env.extend();

    for pair in pairs {
        let Value::List(pair) = pair else {
            return Err(LispError::Syntax(format!(
                "{} binding must be a (symbol value) pair",
                form
            )));
        };
        match pair.as_slice() {
            [Value::Sym(name), init] => {
                let value = if sequential {
                    eval(init, &frame)?
                } else {
                    eval(init, env)?
                };
                frame.define(name.clone(), value);
            }
            _ => {
                return Err(LispError::Syntax(format!(
                    "{} binding must be a (symbol value) pair",
                    form
                )));
            }
        }
    }

    eval(body, &frame)
}

fn eval_begin(args: &[Value], env: &Rc<Environment>) -> Result<Value, LispError> {
    let mut result = Value::Nil;
    for term in args {
        result = eval(term, env)?;
    }
    Ok(result)
}

fn eval_lambda(args: &[Value], env: &Rc<Environment>) -> Result<Value, LispError> {
    let [formals, body] = args else {
        return Err(LispError::syntax("wrong arity for \"lambda\""));
    };
    let Value::List(formals) = formals else {
        return Err(LispError::syntax("lambda formals must be a list"));
    };

    let formals = formals
        .iter()
        .map(|formal| match formal {
            Value::Sym(name) => Ok(name.clone()),
            _ => Err(LispError::syntax("lambda formals must be symbols")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Value::Lambda(Rc::new(Lambda {
        formals,
        body: body.clone(),
        env: env.clone(),
    })))
}

/// General application: evaluate the head to a callable and invoke it
fn apply(items: &[Value], env: &Rc<Environment>) -> Result<Value, LispError> {
    let head = &items[0];
    let operands = &items[1..];

    match eval(head, env)? {
        Value::Lambda(lambda) => {
            if operands.len() != lambda.formals.len() {
                return Err(LispError::arity(
                    "#fn#",
                    lambda.formals.len().to_string(),
                    operands.len(),
                ));
            }
            // Operands evaluate in the caller's scope; the body runs in a
            // child of the captured scope
            let frame = lambda.env.extend();
            for (formal, operand) in lambda.formals.iter().zip(operands) {
                frame.define(formal.clone(), eval(operand, env)?);
            }
            eval(&lambda.body, &frame)
        }
        Value::Builtin(builtin) => {
            let values = operands
                .iter()
                .map(|operand| eval(operand, env))
                .collect::<Result<Vec<_>, _>>()?;
            info!("calling builtin \"{}\"", builtin.name);
            match builtin.func {
                BuiltinFn::Values(f) => f(&values),
                BuiltinFn::ValuesEnv(f) => f(env, &values),
                BuiltinFn::Native(f) => f(&project_all(&values, env)?),
                BuiltinFn::NativeEnv(f) => f(env, &project_all(&values, env)?),
            }
        }
        _ => Err(LispError::Type(format!("{} is not a function", head))),
    }
}

fn project_all(values: &[Value], env: &Rc<Environment>) -> Result<Vec<Native>, LispError> {
    values.iter().map(|value| value.project(env)).collect()
}

/// A quasiquote step yields either one term or a run of terms to splice
/// into the enclosing list.
enum Quasi {
    Term(Value),
    Splice(Vec<Value>),
}

/// Walk a template, copying it except where `unquote` marks a hole to fill
/// with an evaluated term and `unquote-splicing` a hole to fill with the
/// elements of an evaluated list.
fn quasiquote(template: &Value, env: &Rc<Environment>) -> Result<Quasi, LispError> {
    let Value::List(items) = template else {
        return Ok(Quasi::Term(template.clone()));
    };

    match items.first() {
        Some(Value::Sym(name)) if name == "unquote" => match &items[1..] {
            [term] => Ok(Quasi::Term(eval(term, env)?)),
            _ => Err(LispError::syntax("wrong arity for \"unquote\"")),
        },
        Some(Value::Sym(name)) if name == "unquote-splicing" => match &items[1..] {
            [term] => match eval(term, env)? {
                Value::List(values) => Ok(Quasi::Splice(values)),
                _ => Err(LispError::syntax("unquote-splicing result is not a list")),
            },
            _ => Err(LispError::syntax("wrong arity for \"unquote-splicing\"")),
        },
        _ => {
            let mut result = Vec::new();
            for item in items {
                match quasiquote(item, env)? {
                    Quasi::Term(value) => result.push(value),
                    Quasi::Splice(values) => result.extend(values),
                }
            }
            Ok(Quasi::Term(Value::List(result)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse;

    fn eval_source(source: &str, env: &Rc<Environment>) -> Result<Value, LispError> {
        let mut result = Value::Nil;
        for term in parse(source)? {
            result = eval(&term, env)?;
        }
        Ok(result)
    }

    #[test]
    fn test_constants_self_evaluate() {
        let env = Environment::new();
        assert!(matches!(eval(&Value::Int(42), &env), Ok(Value::Int(42))));
        assert!(matches!(eval(&Value::Nil, &env), Ok(Value::Nil)));
        assert!(matches!(
            eval(&Value::Str("hi".to_string()), &env),
            Ok(Value::Str(s)) if s == "hi"
        ));
    }

    #[test]
    fn test_symbol_lookup() {
        let env = Environment::new();
        env.define("x".to_string(), Value::Int(42));
        assert!(matches!(
            eval(&Value::Sym("x".to_string()), &env),
            Ok(Value::Int(42))
        ));
    }

    #[test]
    fn test_unbound_symbol() {
        let env = Environment::new();
        assert!(matches!(
            eval(&Value::Sym("ghost".to_string()), &env),
            Err(LispError::UnboundSymbol(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_quote_returns_term_unevaluated() {
        let env = Environment::new();
        let result = eval_source("(quote (1 2 3))", &env).unwrap();
        assert_eq!(result.to_string(), "(1 2 3)");
    }

    #[test]
    fn test_quote_arity() {
        let env = Environment::new();
        assert!(matches!(
            eval_source("(quote 1 2 3)", &env),
            Err(LispError::Syntax(_))
        ));
    }

    #[test]
    fn test_if_evaluates_one_branch() {
        let env = Environment::new();
        env.define("t".to_string(), Value::Bool(true));
        env.define("f".to_string(), Value::Bool(false));
        assert!(matches!(eval_source("(if t 1 2)", &env), Ok(Value::Int(1))));
        assert!(matches!(eval_source("(if f 1 2)", &env), Ok(Value::Int(2))));
        // The untaken branch is never evaluated, so its unbound symbol
        // cannot fail
        assert!(matches!(
            eval_source("(if t 1 never-bound)", &env),
            Ok(Value::Int(1))
        ));
    }

    #[test]
    fn test_if_truthiness_follows_projection() {
        let env = Environment::new();
        env.define("zero".to_string(), Value::Int(0));
        env.define("empty".to_string(), Value::Str(String::new()));
        assert!(matches!(eval_source("(if zero 1 2)", &env), Ok(Value::Int(2))));
        assert!(matches!(eval_source("(if empty 1 2)", &env), Ok(Value::Int(2))));
        assert!(matches!(eval_source("(if 7 1 2)", &env), Ok(Value::Int(1))));
        assert!(matches!(
            eval_source("(if (quote ()) 1 2)", &env),
            Ok(Value::Int(2))
        ));
    }

    #[test]
    fn test_define_binds_at_top_level() {
        let env = Environment::new();
        assert!(matches!(
            eval_source("(define x 1)", &env),
            Ok(Value::Nil)
        ));
        assert!(matches!(eval_source("x", &env), Ok(Value::Int(1))));
    }

    #[test]
    fn test_define_rejected_below_top_level() {
        let env = Environment::new();
        let result = eval_source("((lambda () (define x 1)))", &env);
        assert!(matches!(result, Err(LispError::Syntax(_))));
    }

    #[test]
    fn test_set_mutates_nearest_binding() {
        let env = Environment::new();
        eval_source("(define x 1)", &env).unwrap();
        assert!(matches!(eval_source("(set! x 2)", &env), Ok(Value::Nil)));
        assert!(matches!(eval_source("x", &env), Ok(Value::Int(2))));
    }

    #[test]
    fn test_set_unbound_fails() {
        let env = Environment::new();
        assert!(matches!(
            eval_source("(set! ghost 1)", &env),
            Err(LispError::UnboundSymbol(_))
        ));
    }

    #[test]
    fn test_let_binds_simultaneously() {
        let env = Environment::new();
        eval_source("(define x 10)", &env).unwrap();
        // y's initializer sees the outer x, not the new binding
        assert!(matches!(
            eval_source("(let ((x 1) (y x)) y)", &env),
            Ok(Value::Int(10))
        ));
    }

    #[test]
    fn test_let_star_binds_sequentially() {
        let env = Environment::new();
        assert!(matches!(
            eval_source("(let* ((x 1) (y x)) y)", &env),
            Ok(Value::Int(1))
        ));
    }

    #[test]
    fn test_let_frame_does_not_leak() {
        let env = Environment::new();
        eval_source("(define x 1)", &env).unwrap();
        eval_source("(let ((x 2)) x)", &env).unwrap();
        assert!(matches!(eval_source("x", &env), Ok(Value::Int(1))));
    }

    #[test]
    fn test_begin_returns_last() {
        let env = Environment::new();
        assert!(matches!(
            eval_source("(begin 1 2 3)", &env),
            Ok(Value::Int(3))
        ));
        assert!(matches!(eval_source("(begin)", &env), Ok(Value::Nil)));
    }

    #[test]
    fn test_lambda_identity() {
        let env = Environment::new();
        assert!(matches!(
            eval_source("((lambda (x) x) 1)", &env),
            Ok(Value::Int(1))
        ));
    }

    #[test]
    fn test_lambda_arity_mismatch() {
        let env = Environment::new();
        assert!(matches!(
            eval_source("((lambda (x) x) 1 2)", &env),
            Err(LispError::Arity { .. })
        ));
    }

    #[test]
    fn test_closure_captures_defining_scope() {
        let env = Environment::new();
        eval_source("(define x 1)", &env).unwrap();
        let result = eval_source("(let ((x 2)) ((lambda () x)))", &env).unwrap();
        assert!(matches!(result, Value::Int(2)));
    }

    #[test]
    fn test_closure_captures_by_reference() {
        let env = Environment::new();
        eval_source("(define x 1)", &env).unwrap();
        eval_source("(define f (lambda () x))", &env).unwrap();
        eval_source("(set! x 2)", &env).unwrap();
        assert!(matches!(eval_source("(f)", &env), Ok(Value::Int(2))));
    }

    #[test]
    fn test_applying_a_non_function_fails() {
        let env = Environment::new();
        eval_source("(define x 1)", &env).unwrap();
        assert!(matches!(
            eval_source("(x 1 2)", &env),
            Err(LispError::Type(_))
        ));
    }

    #[test]
    fn test_empty_form_is_nil() {
        let env = Environment::new();
        assert!(matches!(eval_source("()", &env), Ok(Value::Nil)));
    }

    #[test]
    fn test_quasiquote_without_holes_is_quote() {
        let env = Environment::new();
        let result = eval_source("`(1 2 3)", &env).unwrap();
        assert_eq!(result.to_string(), "(1 2 3)");
    }

    #[test]
    fn test_quasiquote_fills_unquote_holes() {
        let env = Environment::new();
        eval_source("(define x 3)", &env).unwrap();
        let result = eval_source("`(1 ,x)", &env).unwrap();
        assert_eq!(result.to_string(), "(1 3)");
    }

    #[test]
    fn test_quasiquote_unquote_at_depth() {
        let env = Environment::new();
        eval_source("(define x 3)", &env).unwrap();
        let result = eval_source("`(+ 1 (+ 1 ,x))", &env).unwrap();
        assert_eq!(result.to_string(), "(+ 1 (+ 1 3))");
    }

    #[test]
    fn test_quasiquote_splices_lists() {
        let env = Environment::new();
        eval_source("(define x (quote (1 2)))", &env).unwrap();
        let result = eval_source("`(+ @x)", &env).unwrap();
        assert_eq!(result.to_string(), "(+ 1 2)");
    }

    #[test]
    fn test_splicing_a_non_list_fails() {
        let env = Environment::new();
        eval_source("(define x 1)", &env).unwrap();
        assert!(matches!(
            eval_source("`(+ @x)", &env),
            Err(LispError::Syntax(_))
        ));
    }

    #[test]
    fn test_unquote_outside_quasiquote_fails() {
        let env = Environment::new();
        eval_source("(define x 3)", &env).unwrap();
        assert!(matches!(
            eval_source("(unquote x)", &env),
            Err(LispError::Syntax(_))
        ));
        assert!(matches!(
            eval_source("(unquote-splicing x)", &env),
            Err(LispError::Syntax(_))
        ));
    }
}
