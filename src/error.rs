// ABOUTME: Error types for lexing, reading, and evaluation failures

use crate::value::Native;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ZERO: &str = "0";
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";

#[derive(Error, Debug, Clone)]
pub enum LispError {
    /// Characters the lexer could not match to any token
    #[error("unrecognized input: {0}")]
    Lex(String),

    /// Structural problems in the token stream (unbalanced or stray parens)
    #[error("{0}")]
    Parse(String),

    /// Ill-formed special form
    #[error("{0}")]
    Syntax(String),

    #[error("unknown symbol: {0}")]
    UnboundSymbol(String),

    /// Callable invoked with the wrong number of arguments
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    Arity {
        function: String,
        expected: String, // "1", "2", "at least 1"
        actual: usize,
    },

    /// Argument of the wrong kind, with function context
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Value of the wrong kind for an operation
    #[error("{0}")]
    Type(String),

    #[error("{0}")]
    Io(String),
}

impl LispError {
    /// Create a syntax error
    pub fn syntax(message: impl Into<String>) -> Self {
        LispError::Syntax(message.into())
    }

    /// Create an arity error with expected and actual counts
    pub fn arity(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        LispError::Arity {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a type mismatch error with full context
    pub fn type_mismatch(function: &str, expected: &str, actual: &Native, position: usize) -> Self {
        LispError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
            position,
        }
    }
}
