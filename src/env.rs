// ABOUTME: Environment frames implementing the lexical scope chain

use crate::error::LispError;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One frame in the scope chain: a mutable binding table plus an optional
/// parent. Frames are shared by reference; every closure holding a frame
/// sees mutations made through any other holder.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a root frame with no parent
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Returns a fresh child frame parented at this one
    pub fn extend(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(self.clone()),
        })
    }

    /// True for the topmost frame; `define` is only legal there
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Binds a name in THIS frame, shadowing any outer binding
    pub fn define(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Walks the chain and returns the first binding of `name`
    pub fn lookup(&self, name: &str) -> Result<Value, LispError> {
        debug!("looking up symbol {}", name);
        if let Some(value) = self.bindings.borrow().get(name) {
            return Ok(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.lookup(name),
            None => Err(LispError::UnboundSymbol(name.to_string())),
        }
    }

    /// Walks the chain and mutates the first binding of `name`
    pub fn assign(&self, name: &str, value: Value) -> Result<(), LispError> {
        debug!("setting symbol {}", name);
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(LispError::UnboundSymbol(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let env = Environment::new();
        env.define("x".to_string(), Value::Int(42));

        match env.lookup("x") {
            Ok(Value::Int(n)) => assert_eq!(n, 42),
            other => panic!("Expected Int(42), got {:?}", other),
        }
    }

    #[test]
    fn test_unbound_symbol() {
        let env = Environment::new();
        assert!(matches!(
            env.lookup("undefined"),
            Err(LispError::UnboundSymbol(name)) if name == "undefined"
        ));
    }

    #[test]
    fn test_shadowing() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Int(42));

        let child = parent.extend();
        child.define("x".to_string(), Value::Int(100));

        assert!(matches!(child.lookup("x"), Ok(Value::Int(100))));
        assert!(matches!(parent.lookup("x"), Ok(Value::Int(42))));
    }

    #[test]
    fn test_parent_lookup() {
        let parent = Environment::new();
        parent.define("x".to_string(), Value::Int(42));

        let child = parent.extend();
        assert!(matches!(child.lookup("x"), Ok(Value::Int(42))));
    }

    #[test]
    fn test_assign_mutates_enclosing_frame() {
        let root = Environment::new();
        root.define("x".to_string(), Value::Int(1));

        let child = root.extend();
        child.assign("x", Value::Int(2)).unwrap();

        // The mutation landed in the root frame, not the child
        assert!(matches!(root.lookup("x"), Ok(Value::Int(2))));
        assert!(child.bindings.borrow().is_empty());
    }

    #[test]
    fn test_assign_unbound_fails() {
        let env = Environment::new();
        assert!(matches!(
            env.assign("ghost", Value::Int(1)),
            Err(LispError::UnboundSymbol(_))
        ));
    }

    #[test]
    fn test_is_root() {
        let root = Environment::new();
        assert!(root.is_root());
        assert!(!root.extend().is_root());
    }

    #[test]
    fn test_multiple_levels() {
        let grandparent = Environment::new();
        grandparent.define("a".to_string(), Value::Int(1));

        let parent = grandparent.extend();
        parent.define("b".to_string(), Value::Int(2));

        let child = parent.extend();
        child.define("c".to_string(), Value::Int(3));

        assert!(matches!(child.lookup("a"), Ok(Value::Int(1))));
        assert!(matches!(child.lookup("b"), Ok(Value::Int(2))));
        assert!(matches!(child.lookup("c"), Ok(Value::Int(3))));
    }
}
