pub mod ast;
mod error;
mod grammar;
mod locations;
pub mod tokenizer;

pub use error::{LexError, ParseError};
pub use grammar::parse;
pub use locations::{Locatable, Location, Span};
pub use tokenizer::tokenize;
