use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::lexer::Token;
use crate::interpreter::value::Value;
use crate::util::ensure_sufficient_stack;

/// One scope frame. Frames point at their enclosing frame, never the other
/// way, and are shared between blocks and the closures created in them.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new_global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_with_parent(parent: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(parent),
        }))
    }

    pub fn enclosing(&self) -> Option<Rc<RefCell<Environment>>> {
        self.enclosing.as_ref().map(Rc::clone)
    }

    /// Binds `name` in this frame, replacing any earlier binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_owned(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(name.source()) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(enclosing) => ensure_sufficient_stack(|| enclosing.borrow().get(name)),
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }

    /// Overwrites the nearest existing binding of `name`. Never declares.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(name.source()) {
            *slot = value;
            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => ensure_sufficient_stack(|| enclosing.borrow_mut().assign(name, value)),
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }
}
