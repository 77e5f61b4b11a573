mod environment;
mod error;
mod value;

pub use environment::Environment;
pub use error::RuntimeError;
pub use value::Value;

use crate::parser::ast::{Expression, Operator, Program, Property, Statement};


type EvalResult = Result<Value, RuntimeError>;

/// Evaluates every top-level statement in order and yields the value of the
/// last one, or `Null` for an empty program.
pub fn evaluate_program(program: &Program, env: &mut Environment) -> EvalResult {
    let mut last = Value::Null;
    for statement in program.body.iter() {
        last = evaluate(statement, env)?;
    }
    Ok(last)
}

pub fn evaluate(statement: &Statement, env: &mut Environment) -> EvalResult {
    match statement {
        Statement::VariableDeclaration(decl) => {
            let value = match &decl.value {
                Some(expr) => evaluate_expr(expr, env)?,
                None => Value::Null,
            };
            env.declare_var(decl.identifier.as_str(), value, decl.constant)
        }
        Statement::Expression(expr) => evaluate_expr(expr, env),
        Statement::FunctionDeclaration(_)
        | Statement::If(_)
        | Statement::For(_)
        | Statement::While(_)
        | Statement::TryCatch(_) => Err(unsupported(statement.kind())),
    }
}

pub fn evaluate_expr(expression: &Expression, env: &mut Environment) -> EvalResult {
    match expression {
        Expression::Int(value) => Ok(Value::Int(*value)),
        Expression::Float(value) => Ok(Value::Float(*value)),
        Expression::Bool(value) => Ok(Value::Bool(*value)),
        Expression::Null => Ok(Value::Null),
        Expression::Name(name) => env.lookup_var(name.as_str()),
        Expression::Array(elements) => {
            let values = elements
                .iter()
                .map(|element| evaluate_expr(element, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::array(values))
        }
        Expression::Object(properties) => evaluate_object(properties, env),
        Expression::Assignment(operands) => {
            let (assignee, value) = operands.as_ref();
            let Expression::Name(name) = assignee else {
                return Err(RuntimeError::InvalidAssignmentTarget {
                    target: assignee.kind(),
                });
            };
            let value = evaluate_expr(value, env)?;
            env.assign_var(name.as_str(), value)
        }
        Expression::BinaryOperation(op, operands) => {
            let (left, right) = operands.as_ref();
            let left = evaluate_expr(left, env)?;
            let right = evaluate_expr(right, env)?;
            binary_operation(*op, &left, &right)
        }
        Expression::Call(_, _) | Expression::Member(_, _) | Expression::String(_) => {
            Err(unsupported(expression.kind()))
        }
    }
}

// A repeated key keeps the position of its first occurrence and the value of
// its last one.
fn evaluate_object(properties: &[Property], env: &mut Environment) -> EvalResult {
    let mut entries: Vec<(String, Value)> = vec![];
    for property in properties {
        let value = match &property.value {
            Some(expr) => evaluate_expr(expr, env)?,
            None => env.lookup_var(property.key.as_str())?,
        };
        let key = property.key.as_str();
        match entries.iter_mut().find(|(existing, _)| existing.as_str() == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key.to_string(), value)),
        }
    }
    Ok(Value::object(entries))
}

fn binary_operation(op: Operator, left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => int_operation(op, *l, *r).map(Value::Int),
        (Value::Int(l), Value::Float(r)) => float_operation(op, *l as f32, *r).map(Value::Float),
        (Value::Float(l), Value::Int(r)) => float_operation(op, *l, *r as f32).map(Value::Float),
        (Value::Float(l), Value::Float(r)) => float_operation(op, *l, *r).map(Value::Float),
        _ => Err(RuntimeError::UnsupportedOperands {
            operator: op,
            left: left.kind(),
            right: right.kind(),
        }),
    }
}

// 32-bit two's complement semantics: overflow wraps, division truncates.
fn int_operation(op: Operator, l: i32, r: i32) -> Result<i32, RuntimeError> {
    Ok(match op {
        Operator::Plus => l.wrapping_add(r),
        Operator::Minus => l.wrapping_sub(r),
        Operator::Times => l.wrapping_mul(r),
        Operator::Divide | Operator::Modulo if r == 0 => {
            return Err(division_by_zero(Value::Int(l), op))
        }
        Operator::Divide => l.wrapping_div(r),
        Operator::Modulo => l.wrapping_rem(r),
    })
}

fn float_operation(op: Operator, l: f32, r: f32) -> Result<f32, RuntimeError> {
    Ok(match op {
        Operator::Plus => l + r,
        Operator::Minus => l - r,
        Operator::Times => l * r,
        Operator::Divide | Operator::Modulo if r == 0.0 => {
            return Err(division_by_zero(Value::Float(l), op))
        }
        Operator::Divide => l / r,
        Operator::Modulo => l % r,
    })
}

fn division_by_zero(dividend: Value, operator: Operator) -> RuntimeError {
    RuntimeError::DivisionByZero {
        dividend: dividend.to_string(),
        operator,
    }
}

fn unsupported(construct: &'static str) -> RuntimeError {
    RuntimeError::UnsupportedConstruct { construct }
}
