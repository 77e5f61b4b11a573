mod interpreter;
mod parser;

pub use interpreter::{evaluate, evaluate_expr, evaluate_program, Environment, RuntimeError, Value};
pub use parser::ast;
pub use parser::tokenizer::{Token, TokenType, Tokenizer};
pub use parser::{parse, tokenize, LexError, Locatable, Location, ParseError, Span};

use thiserror::Error;

/// Any failure of a tokenize, parse and evaluate cycle.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Runs `source` as one program against `env` and returns the value of its
/// last statement. Bindings made before a failure stay in `env`.
pub fn run(source: &str, env: &mut Environment) -> Result<Value, Error> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    Ok(evaluate_program(&program, env)?)
}
