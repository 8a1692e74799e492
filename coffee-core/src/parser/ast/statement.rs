use std::{fmt::Display, rc::Rc};

use crate::{
    lexer::prelude::{Token, TokenKind},
    parser::prelude::{Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::ensure_sufficient_stack
};
use super::{join, expression::{Expression, Primitive}};

// declaration -> var_declaration | function_declaration | statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Vec<Statement>),
    Expression(Expression),
    Function(Rc<FunctionDecl>),
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>
    },
    Return {
        keyword: Token,
        value: Option<Expression>
    },
    Var {
        name: Token,
        initializer: Option<Expression>
    },
    While {
        condition: Expression,
        body: Box<Statement>
    },
}

impl<T: Iterator<Item = Token>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        ensure_sufficient_stack(|| {
            if parser.eat(&[TokenKind::Var]) {
                return Self::parse_var_declaration(parser);
            }

            if parser.eat(&[TokenKind::Fun]) {
                return Ok(Self::Function(Rc::new(FunctionDecl::parse(parser, None)?)));
            }

            Self::parse_statement(parser)
        })
    }
}

impl Statement {
    // var_declaration -> "var" IDENTIFIER ( "=" expression )? ";"
    pub(crate) fn parse_var_declaration<T: Iterator<Item = Token>>(
        parser: &mut Parser<T>
    ) -> Result<Self, ParseError> {
        let name = parser.consume(TokenKind::Identifier, ParseErrorType::ExpectVariableName)?;

        let initializer = if parser.eat(&[TokenKind::Equal]) {
            Some(Expression::parse(parser, None)?)
        } else {
            None
        };

        parser.expect(TokenKind::Semicolon, "after variable declaration.")?;

        Ok(Self::Var { name, initializer })
    }

    fn parse_statement<T: Iterator<Item = Token>>(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        ensure_sufficient_stack(|| match parser.current_token.kind {
            TokenKind::LeftBrace => {
                parser.advance();

                Ok(Self::Block(parse_block(parser)?))
            },
            TokenKind::If => Self::parse_if(parser),
            TokenKind::While => Self::parse_while(parser),
            TokenKind::For => Self::parse_for(parser),
            TokenKind::Return => Self::parse_return(parser),
            _ => Self::parse_expression_statement(parser)
        })
    }

    fn parse_expression_statement<T: Iterator<Item = Token>>(
        parser: &mut Parser<T>
    ) -> Result<Self, ParseError> {
        let expression = Expression::parse(parser, None)?;

        parser.expect(TokenKind::Semicolon, "after expression.")?;

        Ok(Self::Expression(expression))
    }

    // if -> "if" "(" expression ")" statement ( "else" statement )?
    fn parse_if<T: Iterator<Item = Token>>(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        parser.advance();
        parser.expect(TokenKind::LeftParen, "after 'if'.")?;

        let condition = Expression::parse(parser, None)?;

        parser.expect(TokenKind::RightParen, "after if condition.")?;

        let then_branch = Box::new(Self::parse_statement(parser)?);

        let else_branch = if parser.eat(&[TokenKind::Else]) {
            Some(Box::new(Self::parse_statement(parser)?))
        } else {
            None
        };

        Ok(Self::If { condition, then_branch, else_branch })
    }

    // while -> "while" "(" expression ")" statement
    fn parse_while<T: Iterator<Item = Token>>(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        parser.advance();
        parser.expect(TokenKind::LeftParen, "after 'while'.")?;

        let condition = Expression::parse(parser, None)?;

        parser.expect(TokenKind::RightParen, "after while condition.")?;

        let body = Box::new(Self::parse_statement(parser)?);

        Ok(Self::While { condition, body })
    }

    // for -> "for" "(" ( var_declaration | expression_statement | ";" )
    //        expression? ";" expression? ")" statement
    //
    // Desugared into a while loop wrapped in the initializer's block.
    fn parse_for<T: Iterator<Item = Token>>(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let keyword = parser.advance().clone();
        parser.expect(TokenKind::LeftParen, "after 'for'.")?;

        let initializer = if parser.eat(&[TokenKind::Semicolon]) {
            None
        } else if parser.eat(&[TokenKind::Var]) {
            Some(Self::parse_var_declaration(parser)?)
        } else {
            Some(Self::parse_expression_statement(parser)?)
        };

        let condition = if parser.check(TokenKind::Semicolon) {
            None
        } else {
            Some(Expression::parse(parser, None)?)
        };

        parser.expect(TokenKind::Semicolon, "after loop condition.")?;

        let increment = if parser.check(TokenKind::RightParen) {
            None
        } else {
            Some(Expression::parse(parser, None)?)
        };

        parser.expect(TokenKind::RightParen, "after for clauses.")?;

        let mut body = Self::parse_statement(parser)?;

        if let Some(increment) = increment {
            body = Self::Block(vec![body, Self::Expression(increment)]);
        }

        let condition = condition.unwrap_or_else(|| Expression::Literal {
            value: Primitive::Bool(true),
            token: Token::synthetic(TokenKind::True, &keyword)
        });

        body = Self::While { condition, body: Box::new(body) };

        if let Some(initializer) = initializer {
            body = Self::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    // return -> "return" expression? ";"
    fn parse_return<T: Iterator<Item = Token>>(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let keyword = parser.advance().clone();

        if !parser.in_function() {
            parser.report(ParseErrorType::TopLevelReturn, keyword.clone());
        }

        let value = if parser.check(TokenKind::Semicolon) {
            None
        } else {
            Some(Expression::parse(parser, None)?)
        };

        parser.expect(TokenKind::Semicolon, "after return value.")?;

        Ok(Self::Return { keyword, value })
    }
}

/// Parses declarations up to the closing brace; the opening one is already consumed.
/// Each line recovers from its own errors.
pub fn parse_block<T: Iterator<Item = Token>>(parser: &mut Parser<T>) -> Result<Vec<Statement>, ParseError> {
    let mut statements = vec![];

    while !parser.check(TokenKind::RightBrace) && !parser.is_at_end() {
        if let Some(statement) = parser.recover(|parser| Statement::parse(parser, None)) {
            statements.push(statement);
        }
    }

    parser.expect(TokenKind::RightBrace, "after block.")?;

    Ok(statements)
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ensure_sufficient_stack(|| match self {
            Self::Block(statements) if statements.is_empty() => write!(f, "{{ }}"),
            Self::Block(statements) => write!(f, "{{ {} }}", join(statements, " ")),
            Self::Expression(expression) => write!(f, "{expression};"),
            Self::Function(function) => write!(f, "{function}"),
            Self::If { condition, then_branch, else_branch } => {
                write!(f, "if ({condition}) {then_branch}")?;

                match else_branch {
                    Some(else_branch) => write!(f, " else {else_branch}"),
                    None => Ok(())
                }
            },
            Self::Return { value: Some(value), .. } => write!(f, "return {value};"),
            Self::Return { value: None, .. } => write!(f, "return;"),
            Self::Var { name, initializer: Some(initializer) } => {
                write!(f, "var {} = {initializer};", name.lexeme)
            },
            Self::Var { name, initializer: None } => write!(f, "var {};", name.lexeme),
            Self::While { condition, body } => write!(f, "while ({condition}) {body}")
        })
    }
}

// function_declaration -> "fun" IDENTIFIER "(" parameters? ")" block
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Statement>
}

pub const MAX_PARAMETERS: usize = 255;

/// Expects the `fun` keyword to be consumed already.
impl<T: Iterator<Item = Token>> Parse<T> for FunctionDecl {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let name = parser.consume(TokenKind::Identifier, ParseErrorType::ExpectFunctionName)?;

        parser.expect(TokenKind::LeftParen, "after function name.")?;

        let mut params = vec![];

        if !parser.check(TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_PARAMETERS {
                    parser.report(ParseErrorType::TooManyParameters, parser.current_token.clone());
                }

                params.push(parser.consume(TokenKind::Identifier, ParseErrorType::ExpectParameterName)?);

                if !parser.eat(&[TokenKind::Comma]) {
                    break;
                }
            }
        }

        parser.expect(TokenKind::RightParen, "after parameters.")?;
        parser.expect(TokenKind::LeftBrace, "before function body.")?;

        parser.enter_function();
        let body = parse_block(parser);
        parser.leave_function();

        Ok(Self { name, params, body: body? })
    }
}

impl FunctionDecl {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Display for FunctionDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.params.iter()
            .map(|param| param.lexeme.as_str())
            .collect::<Vec<&str>>();

        write!(f, "fun {}({}) ", self.name.lexeme, params.join(", "))?;

        if self.body.is_empty() {
            write!(f, "{{ }}")
        } else {
            write!(f, "{{ {} }}", join(&self.body, " "))
        }
    }
}
