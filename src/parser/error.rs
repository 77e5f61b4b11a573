use super::locations::{Location, Span};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("Malformed numeric literal '{literal}' at {location}")]
    MalformedNumber { literal: String, location: Location },
    #[error("Block comment starting at {location} is never closed with '<<<'")]
    UnterminatedComment { location: Location },
    #[error("Unrecognized character '{character}' at {location}")]
    UnrecognizedCharacter { character: char, location: Location },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("{message} Found {found} at {span}, expected {expected}.")]
    UnexpectedToken {
        message: String,
        found: String,
        expected: String,
        span: Span,
    },
    #[error("{message} Reached end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        message: String,
        expected: String,
    },
    #[error("Constant '{name}' must be initialized with a value ({span}).")]
    UninitializedConstant { name: String, span: Span },
    #[error("Literal '{literal}' cannot be represented ({span}).")]
    InvalidLiteral { literal: String, span: Span },
    #[error("{message} ({span}).")]
    InvalidSyntax { message: String, span: Span },
}
