// ABOUTME: Lexer turning source text into a stream of typed tokens

use crate::error::LispError;
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{anychar, char, digit1, none_of},
    combinator::{map, map_res, recognize, value},
    IResult, Parser,
};

/// One lexical token. The reader consumes these; exhaustion of the token
/// stream is the EOF marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Sym(String),
    Open,
    Close,
    Quote,
    Quasiquote,
    Unquote,
    Splice,
}

/// Interword whitespace; anything else is token material
const WHITESPACE: [char; 3] = [' ', '\t', '\n'];

/// Tokenize a whole source text.
///
/// Recognizer order matters: floats before ints so `1.5` is not split, and
/// strings before symbols so parens inside string literals stay literal.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LispError> {
    let mut rest = input.trim_start_matches(WHITESPACE);
    let mut tokens = Vec::new();

    while !rest.is_empty() {
        match lex_token(rest) {
            Ok((next, token)) => {
                tokens.push(token);
                rest = next.trim_start_matches(WHITESPACE);
            }
            Err(_) => return Err(LispError::Lex(rest.to_string())),
        }
    }

    Ok(tokens)
}

fn lex_token(input: &str) -> IResult<&str, Token> {
    alt((lex_float, lex_int, lex_string, lex_punct, lex_symbol)).parse(input)
}

/// Parse a float: digits on both sides of the dot are required
fn lex_float(input: &str) -> IResult<&str, Token> {
    map_res(recognize((digit1, char('.'), digit1)), |text: &str| {
        text.parse::<f64>().map(Token::Float)
    })
    .parse(input)
}

fn lex_int(input: &str) -> IResult<&str, Token> {
    map_res(digit1, |text: &str| text.parse::<i64>().map(Token::Int)).parse(input)
}

/// Parse a string literal, atomically, with `\"` and `\n` substitution
fn lex_string(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('"')(input)?;

    // Handle empty strings
    if let Ok((input, _)) = char::<_, nom::error::Error<_>>('"')(input) {
        return Ok((input, Token::Str(String::new())));
    }

    let (input, content) =
        nom::bytes::complete::escaped(none_of("\"\\"), '\\', anychar).parse(input)?;
    let (input, _) = char('"')(input)?;

    let unescaped = content.replace("\\\"", "\"").replace("\\n", "\n");
    Ok((input, Token::Str(unescaped)))
}

fn lex_punct(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Open, char('(')),
        value(Token::Close, char(')')),
        value(Token::Quote, char('\'')),
        value(Token::Quasiquote, char('`')),
        value(Token::Unquote, char(',')),
        value(Token::Splice, char('@')),
    ))
    .parse(input)
}

/// Symbols are maximal runs of anything that is not whitespace or punctuation
fn lex_symbol(input: &str) -> IResult<&str, Token> {
    map(take_while1(is_symbol_char), |text: &str| {
        Token::Sym(text.to_string())
    })
    .parse(input)
}

fn is_symbol_char(c: char) -> bool {
    !matches!(c, ' ' | '\t' | '\n' | '(' | ')' | '\'' | '`' | ',' | '@')
}
