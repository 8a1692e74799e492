use std::{fmt::Display, rc::Rc};

use crate::{
    lexer::prelude::{Literal, Token, TokenKind},
    parser::prelude::{parse_error, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::ensure_sufficient_stack
};
use super::{join, statement::{FunctionDecl, Statement}};

// expression -> assignment
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Assign {
        target: Box<Expression>,
        value: Box<Expression>
    },
    Binary(Binary),
    Access {
        left: Box<Expression>,
        op: Token,
        member: Token
    },
    Call(Call),
    Grouping(Box<Expression>),
    Literal {
        value: Primitive,
        token: Token
    },
    List(ListLiteral),
    Unary {
        op: Token,
        operand: Box<Expression>
    },
    Variable {
        name: Token
    },
    Object(ObjectLiteral),
}

impl<T: Iterator<Item = Token>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        ensure_sufficient_stack(|| match precedence.unwrap_or(Precedence::Lowest) {
            Precedence::Lowest | Precedence::Assign => Self::parse_assignment(parser),
            Precedence::Prefix => Self::parse_unary(parser),
            Precedence::Call => Self::parse_postfix(parser),
            level => Self::parse_binary(parser, level)
        })
    }
}

impl Expression {
    pub fn is_assignable(&self) -> bool {
        matches!(self, Self::Variable { .. } | Self::Access { .. })
    }

    /// A token inside this expression that locates it in the source.
    pub fn token(&self) -> &Token {
        match self {
            Self::Assign { target, .. } => target.token(),
            Self::Binary(binary) => &binary.op,
            Self::Access { op, .. } => op,
            Self::Call(call) => &call.paren,
            Self::Grouping(inner) => inner.token(),
            Self::Literal { token, .. } => token,
            Self::List(list) => &list.bracket,
            Self::Unary { op, .. } => op,
            Self::Variable { name } => name,
            Self::Object(object) => &object.brace
        }
    }

    // assignment -> ( postfix ( "=" | "+=" | "-=" ) assignment ) | logic_or
    fn parse_assignment<T: Iterator<Item = Token>>(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let target = Self::parse(parser, Some(Precedence::Assign.next()))?;

        if !parser.eat(&[TokenKind::Equal, TokenKind::PlusEqual, TokenKind::MinusEqual]) {
            return Ok(target);
        }

        let operator = parser.previous_token.clone();
        let value = Self::parse(parser, Some(Precedence::Assign))?;

        if !target.is_assignable() {
            parser.report(ParseErrorType::InvalidAssignmentTarget, operator);

            return Ok(target);
        }

        // `a.b += c` becomes `a.b = a.b + c`, so `a` is evaluated twice.
        let value = match operator.kind {
            TokenKind::PlusEqual | TokenKind::MinusEqual => {
                let kind = if operator.is(TokenKind::PlusEqual) {
                    TokenKind::Plus
                } else {
                    TokenKind::Minus
                };

                Self::Binary(Binary {
                    left: Box::new(target.clone()),
                    op: Token::synthetic(kind, &operator),
                    right: Box::new(value)
                })
            },
            _ => value
        };

        Ok(Self::Assign {
            target: Box::new(target),
            value: Box::new(value)
        })
    }

    fn parse_binary<T: Iterator<Item = Token>>(
        parser: &mut Parser<T>,
        level: Precedence
    ) -> Result<Self, ParseError> {
        let mut left = Self::parse(parser, Some(level.next()))?;

        while parser.eat(level.operators()) {
            let op = parser.previous_token.clone();
            let right = Self::parse(parser, Some(level.next()))?;

            left = Self::Binary(Binary {
                left: Box::new(left),
                op,
                right: Box::new(right)
            });
        }

        Ok(left)
    }

    // unary -> ( "!" | "-" ) unary | postfix
    fn parse_unary<T: Iterator<Item = Token>>(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        if parser.eat(&[TokenKind::Bang, TokenKind::Minus]) {
            let op = parser.previous_token.clone();
            let operand = Self::parse(parser, Some(Precedence::Prefix))?;

            return Ok(Self::Unary {
                op,
                operand: Box::new(operand)
            });
        }

        Self::parse(parser, Some(Precedence::Call))
    }

    // postfix -> primary ( "(" arguments? ")" | "[" expression "]" | "." IDENTIFIER )*
    fn parse_postfix<T: Iterator<Item = Token>>(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let mut expression = Self::parse_primary(parser)?;

        loop {
            if parser.eat(&[TokenKind::LeftParen]) {
                expression = Self::Call(Call::finish(parser, expression)?);
            } else if parser.eat(&[TokenKind::LeftSquare]) {
                let op = parser.previous_token.clone();
                let index = Self::parse(parser, None)?;

                parser.expect(TokenKind::RightSquare, "after List access.")?;

                expression = Self::Binary(Binary {
                    left: Box::new(expression),
                    op,
                    right: Box::new(index)
                });
            } else if parser.eat(&[TokenKind::Dot]) {
                let op = parser.previous_token.clone();
                let member = parser.consume(TokenKind::Identifier, ParseErrorType::ExpectMemberName)?;

                expression = Self::Access {
                    left: Box::new(expression),
                    op,
                    member
                };
            } else {
                break;
            }
        }

        Ok(expression)
    }

    // primary -> NUMBER | STRING | "true" | "false" | "null" | IDENTIFIER
    //          | "(" expression ")" | list | object
    fn parse_primary<T: Iterator<Item = Token>>(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let token = parser.current_token.clone();

        let value = match token.kind {
            TokenKind::True => Primitive::Bool(true),
            TokenKind::False => Primitive::Bool(false),
            TokenKind::Null => Primitive::Null,
            TokenKind::String => match &token.literal {
                Some(Literal::String(text)) => Primitive::String(text.clone()),
                _ => Primitive::String(token.lexeme.replace('"', ""))
            },
            TokenKind::Number => match &token.literal {
                Some(Literal::Int(value)) => Primitive::Int(*value),
                _ => return parse_error(ParseErrorType::IntegerOutOfRange, token)
            },
            TokenKind::Identifier => {
                parser.advance();

                return Ok(Self::Variable { name: token });
            },
            TokenKind::LeftParen => {
                parser.advance();

                let inner = Self::parse(parser, None)?;
                parser.expect(TokenKind::RightParen, "after expression.")?;

                return Ok(Self::Grouping(Box::new(inner)));
            },
            TokenKind::LeftSquare => return Ok(Self::List(ListLiteral::parse(parser, None)?)),
            TokenKind::LeftBrace => return Ok(Self::Object(ObjectLiteral::parse(parser, None)?)),
            _ => return parse_error(ParseErrorType::ExpectExpression, token)
        };

        parser.advance();

        Ok(Self::Literal { value, token })
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ensure_sufficient_stack(|| match self {
            Self::Assign { target, value } => write!(f, "{target} = {value}"),
            Self::Binary(binary) => write!(f, "{binary}"),
            Self::Access { left, member, .. } => write!(f, "{left}.{}", member.lexeme),
            Self::Call(call) => write!(f, "{call}"),
            Self::Grouping(inner) => write!(f, "({inner})"),
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::List(list) => write!(f, "{list}"),
            Self::Unary { op, operand } => write!(f, "({}{operand})", op.kind),
            Self::Variable { name } => write!(f, "{}", name.lexeme),
            Self::Object(object) => write!(f, "{object}")
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Int(i64),
    Bool(bool),
    String(String),
    Null
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "\"{value}\""),
            Self::Null => write!(f, "null")
        }
    }
}

/// Infix operation. Indexing is a binary node whose operator is `[`.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expression>,
    pub op: Token,
    pub right: Box<Expression>
}

impl Binary {
    pub fn is_index(&self) -> bool {
        self.op.is(TokenKind::LeftSquare)
    }
}

impl Display for Binary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_index() {
            write!(f, "{}[{}]", self.left, self.right)
        } else {
            write!(f, "({} {} {})", self.left, self.op.kind, self.right)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expression>,
    /// Closing paren, used to locate call errors.
    pub paren: Token,
    pub args: Vec<Expression>
}

impl Call {
    fn finish<T: Iterator<Item = Token>>(
        parser: &mut Parser<T>,
        callee: Expression
    ) -> Result<Self, ParseError> {
        let mut args = vec![];

        if !parser.check(TokenKind::RightParen) {
            loop {
                args.push(Expression::parse(parser, None)?);

                if !parser.eat(&[TokenKind::Comma]) {
                    break;
                }
            }
        }

        let paren = parser.expect(TokenKind::RightParen, "after arguments.")?;

        Ok(Self {
            callee: Box::new(callee),
            paren,
            args
        })
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.callee, join(&self.args, ", "))
    }
}

// list -> "[" ( expression ( "," expression )* )? "]"
#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub bracket: Token,
    pub elements: Vec<Expression>
}

impl<T: Iterator<Item = Token>> Parse<T> for ListLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let bracket = parser.expect(TokenKind::LeftSquare, "before list elements.")?;
        let mut elements = vec![];

        if !parser.check(TokenKind::RightSquare) {
            loop {
                elements.push(Expression::parse(parser, None)?);

                if !parser.eat(&[TokenKind::Comma]) {
                    break;
                }
            }
        }

        parser.expect(TokenKind::RightSquare, "after List.")?;

        Ok(Self { bracket, elements })
    }
}

impl Display for ListLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", join(&self.elements, ", "))
    }
}

// object -> "{" ( var_declaration | function_declaration )* "}"
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub brace: Token,
    pub declarations: Vec<Statement>
}

impl<T: Iterator<Item = Token>> Parse<T> for ObjectLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let brace = parser.expect(TokenKind::LeftBrace, "before object members.")?;
        let mut declarations = vec![];

        while !parser.check(TokenKind::RightBrace) && !parser.is_at_end() {
            let declaration = if parser.eat(&[TokenKind::Var]) {
                Statement::parse_var_declaration(parser)?
            } else if parser.eat(&[TokenKind::Fun]) {
                Statement::Function(Rc::new(FunctionDecl::parse(parser, None)?))
            } else {
                return parse_error(ParseErrorType::ExpectDeclaration, parser.current_token.clone());
            };

            declarations.push(declaration);
        }

        parser.expect(TokenKind::RightBrace, "after Object.")?;

        Ok(Self { brace, declarations })
    }
}

impl Display for ObjectLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.declarations.is_empty() {
            write!(f, "{{}}")
        } else {
            write!(f, "{{ {} }}", join(&self.declarations, " "))
        }
    }
}
