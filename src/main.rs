// ABOUTME: CLI entry point and interactive REPL around the interpreter core

use clap::Parser;
use lispy::builtins::global_env;
use lispy::env::Environment;
use lispy::error::LispError;
use lispy::eval::eval;
use lispy::reader::parse;
use lispy::value::{Native, Value};
use log::LevelFilter;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::rc::Rc;

/// A small Scheme-flavored Lisp interpreter
#[derive(Parser, Debug)]
#[command(name = "lispy")]
#[command(version)]
#[command(about = "A small Scheme-flavored Lisp interpreter")]
struct CliArgs {
    /// Evaluate PROGRAM and print the final result
    #[arg(short = 'e', value_name = "PROGRAM")]
    program: Option<String>,

    /// Evaluate the contents of FILE and print the final result
    #[arg(short = 'f', value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print the final result as a projected host value instead of Lisp syntax
    #[arg(short = 'p')]
    print_native: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // The logger itself stays permissive; the global max level is the knob
    // the (debug ...) primitive turns at run time
    SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .without_timestamps()
        .init()?;
    log::set_max_level(LevelFilter::Error);

    if args.program.is_some() && args.file.is_some() {
        eprintln!("Cannot use both -e and -f options");
        std::process::exit(1);
    }

    let env = global_env();

    let source = if let Some(program) = &args.program {
        Some(program.clone())
    } else if let Some(path) = &args.file {
        Some(std::fs::read_to_string(path).map_err(|e| {
            format!("Cannot read script file {}: {}", path.display(), e)
        })?)
    } else {
        None
    };

    if let Some(source) = source {
        if let Err(e) = run_program(&source, &env, args.print_native) {
            eprintln!("{}", format_error(&e));
            std::process::exit(1);
        }
        return Ok(());
    }

    repl(&env)
}

/// Evaluate every top-level term in order and print the last non-nil result
fn run_program(source: &str, env: &Rc<Environment>, print_native: bool) -> Result<(), LispError> {
    let mut result = Value::Nil;
    for term in parse(source)? {
        result = eval(&term, env)?;
    }

    if !matches!(result, Value::Nil) {
        if print_native {
            println!("{}", render_native(&result, env)?);
        } else {
            println!("{}", result);
        }
    }

    Ok(())
}

/// Deep projection rendering for the -p flag: lists become `[a, b, c]`,
/// scalars print bare
fn render_native(value: &Value, env: &Rc<Environment>) -> Result<String, LispError> {
    match value.project(env)? {
        Native::List(items) => {
            let parts = items
                .iter()
                .map(|item| render_native(item, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("[{}]", parts.join(", ")))
        }
        scalar => Ok(scalar.to_string()),
    }
}

/// Failures of the current top-level term unwind to here; syntax-level
/// problems and host-level faults print with different prefixes
fn format_error(error: &LispError) -> String {
    match error {
        LispError::Type(_) | LispError::TypeMismatch { .. } => {
            format!("Internal Error: {}", error)
        }
        _ => format!("Error: {}", error),
    }
}

fn repl(env: &Rc<Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = DefaultEditor::with_config(config)?;

    let history_file = ".lispy_history";
    let _ = rl.load_history(history_file);

    loop {
        match rl.readline("lispy> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                match parse(&line) {
                    Ok(terms) => {
                        for term in &terms {
                            match eval(term, env) {
                                Ok(Value::Nil) => {}
                                Ok(result) => println!("{}", result),
                                Err(e) => {
                                    eprintln!("{}", format_error(&e));
                                    break;
                                }
                            }
                        }
                    }
                    Err(e) => eprintln!("{}", format_error(&e)),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nBye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_native_list() {
        let env = global_env();
        let value = Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(render_native(&value, &env).unwrap(), "[1, 2, 3]");
    }

    #[test]
    fn test_render_native_nested() {
        let env = global_env();
        let value = Value::List(vec![
            Value::Int(1),
            Value::List(vec![Value::Str("a".to_string()), Value::Float(2.5)]),
        ]);
        assert_eq!(render_native(&value, &env).unwrap(), "[1, [a, 2.5]]");
    }

    #[test]
    fn test_render_native_scalar() {
        let env = global_env();
        assert_eq!(render_native(&Value::Int(7), &env).unwrap(), "7");
        assert_eq!(
            render_native(&Value::Bool(true), &env).unwrap(),
            "true"
        );
    }

    #[test]
    fn test_error_prefixes() {
        assert!(format_error(&LispError::UnboundSymbol("x".to_string())).starts_with("Error:"));
        assert!(format_error(&LispError::Type("boom".to_string()))
            .starts_with("Internal Error:"));
    }
}
