use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    eval::prelude::{RuntimeError, RuntimeErrorType},
    lexer::prelude::Token
};

use super::prelude::{Callable, NativeFunction, Value};

/// One lexical scope. Children share their parent, so closures keep it alive.
#[derive(Default, Debug)]
pub struct Environment {
    pub store: HashMap<String, Value>,
    pub enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            enclosing: None
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Self {
            store: HashMap::new(),
            enclosing: Some(enclosing)
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    /// Binds `name` in this frame only.
    pub fn define(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.contains(&name.lexeme) {
            return Err(RuntimeError::new(
                RuntimeErrorType::DuplicateDefinition { name: name.lexeme.clone() },
                name
            ));
        }

        self.store.insert(name.lexeme.clone(), value);

        Ok(())
    }

    pub fn define_native(&mut self, native: NativeFunction) {
        let name = native.name.to_string();

        self.store.insert(name, Value::function(Callable::native(native)));
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.store.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get(name),
            None => Err(RuntimeError::new(
                RuntimeErrorType::UndefinedVariable { name: name.lexeme.clone() },
                name
            ))
        }
    }

    /// Replaces the payload of the nearest binding of `name`. The slot keeps its name.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.store.get_mut(&name.lexeme) {
            slot.payload = value.payload;

            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => Err(RuntimeError::new(
                RuntimeErrorType::UndefinedAssignment { name: name.lexeme.clone() },
                name
            ))
        }
    }
}
