use std::{cell::RefCell, fmt, io::Write, rc::Rc};

use crate::{
    eval::prelude::RuntimeError,
    lexer::prelude::Token,
    parser::prelude::FunctionDecl
};

use super::{environment::Environment, value::Value};

/// What a native body gets to see of the interpreter.
pub struct NativeContext<'a> {
    pub out: &'a mut dyn Write,
    /// Closing paren of the call, for error locations.
    pub paren: &'a Token,
}

pub type NativeBody = Box<dyn Fn(&mut NativeContext<'_>, Vec<Value>) -> Result<Value, RuntimeError>>;

pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub body: NativeBody,
}

impl NativeFunction {
    pub fn new(
        name: &'static str,
        arity: usize,
        body: impl Fn(&mut NativeContext<'_>, Vec<Value>) -> Result<Value, RuntimeError> + 'static
    ) -> Self {
        Self { name, arity, body: Box::new(body) }
    }
}

pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,
}

#[derive(Clone)]
pub enum Callable {
    Function(Rc<Function>),
    Native(Rc<NativeFunction>),
}

impl Callable {
    pub fn function(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>) -> Self {
        Self::Function(Rc::new(Function { declaration, closure }))
    }

    pub fn native(native: NativeFunction) -> Self {
        Self::Native(Rc::new(native))
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::Function(function) => function.declaration.arity(),
            Self::Native(native) => native.arity
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Function(function) => &function.declaration.name.lexeme,
            Self::Native(native) => native.name
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            _ => false
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(function) => write!(f, "<fn {}>", function.declaration.name.lexeme),
            Self::Native(_) => write!(f, "<native fn>")
        }
    }
}

// Closures point back at environments that may hold this very function.
impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(function) => f.debug_struct("Function")
                .field("name", &function.declaration.name.lexeme)
                .field("arity", &function.declaration.arity())
                .finish_non_exhaustive(),
            Self::Native(native) => f.debug_struct("Native")
                .field("name", &native.name)
                .field("arity", &native.arity)
                .finish_non_exhaustive()
        }
    }
}
