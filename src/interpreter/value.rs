use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Result of evaluating a node. Arrays and objects are shared containers:
/// cloning a `Value` aliases them instead of copying their contents.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i32),
    Float(f32),
    Bool(bool),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Vec<(String, Value)>>>),
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(elements)))
    }

    /// Keys must be unique; they are kept in insertion order for display.
    pub fn object(entries: Vec<(String, Value)>) -> Self {
        Self::Object(Rc::new(RefCell::new(entries)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(value) => write!(f, "{value}"),
            // `{:?}` keeps the fractional part of whole numbers: 2.0, not 2
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Array(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            Self::Object(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_scalars() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Int(-12).to_string(), "-12");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }

    #[test]
    fn display_containers() {
        let nested = Value::object(vec![
            ("a".to_string(), Value::Int(1)),
            ("b".to_string(), Value::array(vec![Value::Float(0.5), Value::Null])),
        ]);
        assert_eq!(nested.to_string(), "{a: 1, b: [0.5, null]}");
        assert_eq!(Value::array(vec![]).to_string(), "[]");
        assert_eq!(Value::object(vec![]).to_string(), "{}");
    }

    #[test]
    fn clones_share_containers() {
        let original = Value::array(vec![Value::Int(1)]);
        let alias = original.clone();
        if let Value::Array(elements) = &original {
            elements.borrow_mut().push(Value::Int(2));
        }
        assert_eq!(alias.to_string(), "[1, 2]");
    }
}
