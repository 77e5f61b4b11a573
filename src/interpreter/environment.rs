use super::error::RuntimeError;
use super::value::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// One lexical scope. Names resolve innermost-first through `parent`.
#[derive(Debug, Default)]
pub struct Environment {
    parent: Option<Rc<RefCell<Environment>>>,
    bindings: HashMap<String, Value>,
    constants: HashSet<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enclosed(parent: Rc<RefCell<Environment>>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Shadowing a binding of an outer scope is allowed, redeclaring one of
    /// this scope is not.
    pub fn declare_var(
        &mut self,
        name: &str,
        value: Value,
        constant: bool,
    ) -> Result<Value, RuntimeError> {
        if self.bindings.contains_key(name) {
            return Err(RuntimeError::Redeclaration {
                name: name.to_string(),
            });
        }
        if constant {
            self.constants.insert(name.to_string());
        }
        self.bindings.insert(name.to_string(), value.clone());
        Ok(value)
    }

    pub fn lookup_var(&self, name: &str) -> Result<Value, RuntimeError> {
        if let Some(value) = self.bindings.get(name) {
            return Ok(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.borrow().lookup_var(name),
            None => Err(unresolved(name)),
        }
    }

    /// Assigns in the innermost scope that defines `name`.
    pub fn assign_var(&mut self, name: &str, value: Value) -> Result<Value, RuntimeError> {
        if let Some(slot) = self.bindings.get_mut(name) {
            if self.constants.contains(name) {
                return Err(RuntimeError::ConstReassignment {
                    name: name.to_string(),
                });
            }
            *slot = value.clone();
            return Ok(value);
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign_var(name, value),
            None => Err(unresolved(name)),
        }
    }
}

fn unresolved(name: &str) -> RuntimeError {
    RuntimeError::UnresolvedName {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(env: Environment) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(env))
    }

    #[test]
    fn declare_and_lookup() {
        let mut env = Environment::new();
        assert_eq!(env.declare_var("x", Value::Int(1), false), Ok(Value::Int(1)));
        assert_eq!(env.lookup_var("x"), Ok(Value::Int(1)));
        assert_eq!(
            env.declare_var("x", Value::Int(2), false),
            Err(RuntimeError::Redeclaration { name: "x".into() })
        );
        assert_eq!(env.lookup_var("x"), Ok(Value::Int(1)));
    }

    #[test]
    fn unresolved_names() {
        let mut env = Environment::new();
        assert_eq!(
            env.lookup_var("y"),
            Err(RuntimeError::UnresolvedName { name: "y".into() })
        );
        assert_eq!(
            env.assign_var("y", Value::Null),
            Err(RuntimeError::UnresolvedName { name: "y".into() })
        );
    }

    #[test]
    fn constants_reject_assignment() {
        let mut env = Environment::new();
        env.declare_var("c", Value::Int(5), true).unwrap();
        assert_eq!(
            env.assign_var("c", Value::Int(6)),
            Err(RuntimeError::ConstReassignment { name: "c".into() })
        );
        assert_eq!(env.lookup_var("c"), Ok(Value::Int(5)));
    }

    #[test]
    fn lookup_and_assignment_walk_outwards() {
        let root = shared(Environment::new());
        root.borrow_mut()
            .declare_var("y", Value::Int(1), false)
            .unwrap();
        let mut child = Environment::enclosed(root.clone());
        assert_eq!(child.lookup_var("y"), Ok(Value::Int(1)));
        assert_eq!(child.assign_var("y", Value::Int(9)), Ok(Value::Int(9)));
        assert_eq!(root.borrow().lookup_var("y"), Ok(Value::Int(9)));
    }

    #[test]
    fn shadowing_a_constant_creates_a_distinct_binding() {
        let root = shared(Environment::new());
        root.borrow_mut()
            .declare_var("x", Value::Int(5), true)
            .unwrap();

        let mut inner = Environment::enclosed(root.clone());
        assert_eq!(
            inner.assign_var("x", Value::Int(0)),
            Err(RuntimeError::ConstReassignment { name: "x".into() })
        );
        inner.declare_var("x", Value::Int(1), false).unwrap();
        assert_eq!(inner.assign_var("x", Value::Int(2)), Ok(Value::Int(2)));
        assert_eq!(inner.lookup_var("x"), Ok(Value::Int(2)));
        assert_eq!(root.borrow().lookup_var("x"), Ok(Value::Int(5)));
    }
}
