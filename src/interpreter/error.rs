use crate::parser::ast::Operator;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Cannot declare '{name}': it is already defined in this scope")]
    Redeclaration { name: String },
    #[error("Cannot resolve '{name}': no enclosing scope defines it")]
    UnresolvedName { name: String },
    #[error("Cannot reassign constant '{name}'")]
    ConstReassignment { name: String },
    #[error("Unsupported operand types for '{operator}': {left} and {right}")]
    UnsupportedOperands {
        operator: Operator,
        left: &'static str,
        right: &'static str,
    },
    #[error("Invalid assignment target: expected an identifier, found {target}")]
    InvalidAssignmentTarget { target: &'static str },
    #[error("Division by zero in '{dividend} {operator} 0'")]
    DivisionByZero { dividend: String, operator: Operator },
    #[error("Evaluating {construct} is not supported")]
    UnsupportedConstruct { construct: &'static str },
}
