// ABOUTME: Reader consuming tokens and producing AST terms

use crate::error::LispError;
use crate::lexer::{tokenize, Token};
use crate::value::Value;
use std::iter::Peekable;
use std::vec::IntoIter;

/// Recursive-descent reader over the token stream. The reader reserves no
/// names: the prefix tokens desugar to `quote`, `quasiquote`, `unquote`, and
/// `unquote-splicing` forms, which acquire meaning only at evaluation.
pub struct Reader {
    tokens: Peekable<IntoIter<Token>>,
}

impl Reader {
    pub fn new(source: &str) -> Result<Self, LispError> {
        Ok(Reader {
            tokens: tokenize(source)?.into_iter().peekable(),
        })
    }

    pub fn at_eof(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    fn scan(&mut self) -> Result<Token, LispError> {
        self.tokens
            .next()
            .ok_or_else(|| LispError::Parse("premature end of input (missing paren?)".to_string()))
    }

    /// Read one term
    pub fn read(&mut self) -> Result<Value, LispError> {
        match self.scan()? {
            Token::Int(n) => Ok(Value::Int(n)),
            Token::Float(x) => Ok(Value::Float(x)),
            Token::Str(s) => Ok(Value::Str(s)),
            Token::Sym(name) => Ok(Value::Sym(name)),
            Token::Open => {
                let mut items = Vec::new();
                loop {
                    match self.tokens.peek() {
                        Some(Token::Close) => {
                            self.tokens.next();
                            return Ok(Value::List(items));
                        }
                        Some(_) => items.push(self.read()?),
                        None => {
                            return Err(LispError::Parse(
                                "unbalanced list (missing paren?)".to_string(),
                            ))
                        }
                    }
                }
            }
            Token::Close => Err(LispError::Parse("unexpected ')'".to_string())),
            Token::Quote => self.desugar("quote"),
            Token::Quasiquote => self.desugar("quasiquote"),
            Token::Unquote => self.desugar("unquote"),
            Token::Splice => self.desugar("unquote-splicing"),
        }
    }

    /// Rewrite a reader-macro prefix: 'X becomes (quote X), and so on
    fn desugar(&mut self, form: &str) -> Result<Value, LispError> {
        Ok(Value::List(vec![Value::Sym(form.to_string()), self.read()?]))
    }

    /// Read terms until the stream is exhausted
    pub fn program(&mut self) -> Result<Vec<Value>, LispError> {
        let mut terms = Vec::new();
        while !self.at_eof() {
            terms.push(self.read()?);
        }
        Ok(terms)
    }
}

/// Parse a whole source text into its top-level terms
pub fn parse(source: &str) -> Result<Vec<Value>, LispError> {
    Reader::new(source)?.program()
}
