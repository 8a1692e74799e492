use std::fmt::Display;

use crate::lexer::prelude::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectExpression,
    ExpectVariableName,
    ExpectFunctionName,
    ExpectParameterName,
    ExpectMemberName,
    Expected {
        token: TokenKind,
        context: &'static str,
    },
    InvalidAssignmentTarget,
    TooManyParameters,
    ExpectDeclaration,
    TopLevelReturn,
    IntegerOutOfRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub token: Token,
}

impl ParseErrorType {
    pub fn details(&self) -> String {
        match self {
            Self::ExpectExpression => "Expect expression.".into(),
            Self::ExpectVariableName => "Expect variable name.".into(),
            Self::ExpectFunctionName => "Expect function name.".into(),
            Self::ExpectParameterName => "Expect parameter name.".into(),
            Self::ExpectMemberName => "Expect property name after '.'.".into(),
            Self::Expected { token, context } => format!("Expect '{}' {context}", token.as_literal()),
            Self::InvalidAssignmentTarget => "Invalid assignment target.".into(),
            Self::TooManyParameters => "Can't have more than 255 parameters.".into(),
            Self::ExpectDeclaration => "Expect 'var' or 'fun' declaration inside object.".into(),
            Self::TopLevelReturn => "Can't return from top-level code.".into(),
            Self::IntegerOutOfRange => "Integer literal is out of range.".into(),
        }
    }
}

impl ParseError {
    pub fn details(&self) -> String {
        self.error.details()
    }

    /// `at end` or `at 'lexeme'`
    pub fn position(&self) -> String {
        if self.token.is(TokenKind::Eof) {
            "at end".into()
        } else {
            format!("at '{}'", self.token.lexeme)
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error {}: {}", self.token.line, self.position(), self.details())
    }
}

impl std::error::Error for ParseError {}
