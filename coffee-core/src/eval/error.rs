use thiserror::Error;

use crate::{environment::prelude::ValueType, lexer::prelude::Token};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorType {
    #[error("Operand is not a Number it is {found}.")]
    OperandNotNumber { found: ValueType },
    #[error("Operands must be numbers or strings.")]
    InvalidPlusOperands,
    #[error("Unsupported operator {op}.")]
    UnsupportedOperator { op: String },
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Integer overflow.")]
    IntegerOverflow,
    #[error("Can only call functions.")]
    NotCallable,
    #[error("Expected {expected} arguments but got {found}.")]
    ArityMismatch { expected: usize, found: usize },
    #[error("Undefined variable to retrieve {name}.")]
    UndefinedVariable { name: String },
    #[error("Undefined variable to assign {name}.")]
    UndefinedAssignment { name: String },
    #[error("Duplicate definition of {name} in this scope.")]
    DuplicateDefinition { name: String },
    #[error("{found} does not support . access")]
    UnsupportedDotAccess { found: ValueType },
    #[error("{found} does not support [] access")]
    UnsupportedIndexAccess { found: ValueType },
    #[error("Undefined variable {member} in {owner}")]
    UndefinedMember { member: String, owner: String },
    #[error("Unable to index {owner}, {index} need to be of integer type")]
    IndexNotInt { owner: String, index: String },
    #[error("Index out of bounds {owner} index {index}, size is {len}")]
    IndexOutOfBounds { owner: String, index: i64, len: usize },
    #[error("{found} does not support . assignment")]
    UnsupportedMemberAssignment { found: ValueType },
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget,
    #[error("{function} expects a {expected} argument but got {found}.")]
    InvalidArgument { function: &'static str, expected: ValueType, found: ValueType },
    #[error("Stack overflow.")]
    StackOverflow,
    #[error("Unable to write output: {kind}.")]
    Output { kind: std::io::ErrorKind },
}

/// A failed operation and the token it is reported at.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error}\n[line {}]", .token.line)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub token: Token,
}

impl RuntimeError {
    pub fn new(error: RuntimeErrorType, token: &Token) -> Self {
        Self { error, token: token.clone() }
    }

    pub fn details(&self) -> String {
        self.error.to_string()
    }
}
