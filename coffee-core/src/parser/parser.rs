use std::mem;

use crate::{lexer::prelude::{tokenize, Token, TokenKind}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Parsed, Statement};

pub trait Parse<T: Iterator<Item = Token>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

#[derive(Debug)]
pub enum Outcome<T, E> {
    Ok(T),
    PartialFailure(T, E)
}

impl<T, E> Outcome<T, E> {
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::PartialFailure(_, errors) => Err(errors)
        }
    }
}

pub struct Parser<T: Iterator<Item = Token>> {
    pub current_token: Token,
    pub previous_token: Token,
    pub comments: Vec<SrcSpan>,
    pub errors: Vec<ParseError>,

    function_depth: usize,
    tokens: T,
}

impl<T: Iterator<Item = Token>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: Token::eof(1, 0),
            previous_token: Token::eof(1, 0),
            comments: vec![],
            errors: vec![],

            function_depth: 0,
            tokens: input,
        };

        parser.current_token = parser.next_token();

        parser
    }

    /// Pulls the next significant token, recording trivia on the way.
    fn next_token(&mut self) -> Token {
        loop {
            match self.tokens.next() {
                Some(token) if token.is(TokenKind::Comment) => {
                    self.comments.push(token.location)
                },
                Some(token) if token.is(TokenKind::Whitespace) => {},
                Some(token) if token.is(TokenKind::Invalid) => {
                    tracing::debug!(line = token.line, lexeme = %token.lexeme, "discarding invalid token");
                },
                Some(token) => return token,
                None => {
                    let SrcSpan { end, .. } = self.current_token.location;

                    return Token::eof(self.current_token.line, end)
                }
            }
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token.is(TokenKind::Eof)
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.current_token.is(kind)
    }

    pub fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            let next = self.next_token();
            self.previous_token = mem::replace(&mut self.current_token, next);
        }

        &self.previous_token
    }

    /// Advances past the current token if it is any of `kinds`.
    pub fn eat(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|kind| self.check(*kind)) {
            self.advance();
            return true;
        }

        false
    }

    pub fn consume(&mut self, kind: TokenKind, error: ParseErrorType) -> Result<Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }

        parse_error(error, self.current_token.clone())
    }

    pub fn expect(&mut self, kind: TokenKind, context: &'static str) -> Result<Token, ParseError> {
        self.consume(kind, ParseErrorType::Expected { token: kind, context })
    }

    /// Records an error that does not stop the current production.
    pub fn report(&mut self, error: ParseErrorType, token: Token) {
        self.errors.push(ParseError { error, token });
    }

    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous_token.is(TokenKind::Semicolon) || self.current_token.kind.starts_statement() {
                break;
            }

            self.advance();
        }

        tracing::debug!(line = self.current_token.line, at = %self.current_token.lexeme, "synchronized");
    }

    /// Runs one line-level production, swallowing its error after synchronizing.
    pub fn recover<S>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<S, ParseError>
    ) -> Option<S> {
        match production(self) {
            Ok(node) => Some(node),
            Err(err) => {
                self.errors.push(err);
                self.synchronize();

                None
            }
        }
    }

    pub fn in_function(&self) -> bool {
        self.function_depth > 0
    }

    pub fn enter_function(&mut self) {
        self.function_depth += 1;
    }

    pub fn leave_function(&mut self) {
        self.function_depth = self.function_depth.saturating_sub(1);
    }

    pub fn parse(&mut self) -> Outcome<Parsed, Vec<ParseError>> {
        let mut statements = vec![];

        while !self.is_at_end() {
            if let Some(statement) = self.recover(|parser| Statement::parse(parser, None)) {
                statements.push(statement);
            }
        }

        let parsed = Parsed {
            statements,
            comments: mem::take(&mut self.comments)
        };

        match mem::take(&mut self.errors) {
            errors if errors.is_empty() => Outcome::Ok(parsed),
            errors => Outcome::PartialFailure(parsed, errors)
        }
    }
}

/// Binding power of each expression level, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Assign,
    Or,
    And,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call
}

impl Precedence {
    pub fn next(self) -> Self {
        match self {
            Self::Lowest => Self::Assign,
            Self::Assign => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::Equals,
            Self::Equals => Self::LessGreater,
            Self::LessGreater => Self::Sum,
            Self::Sum => Self::Product,
            Self::Product => Self::Prefix,
            Self::Prefix | Self::Call => Self::Call
        }
    }

    /// Left-associative binary operators at this level.
    pub fn operators(self) -> &'static [TokenKind] {
        match self {
            Self::Or => &[TokenKind::Or],
            Self::And => &[TokenKind::And],
            Self::Equals => &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Self::LessGreater => &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Lesser,
                TokenKind::LesserEqual
            ],
            Self::Sum => &[TokenKind::Minus, TokenKind::Plus],
            Self::Product => &[TokenKind::Slash, TokenKind::Star, TokenKind::Percent],
            Self::Lowest | Self::Assign | Self::Prefix | Self::Call => &[]
        }
    }
}

pub fn parse<I: IntoIterator<Item = Token>>(tokens: I) -> Outcome<Parsed, Vec<ParseError>> {
    let mut parser = Parser::new(tokens.into_iter());

    parser.parse()
}

pub fn parse_source(src: &str) -> Outcome<Parsed, Vec<ParseError>> {
    parse(tokenize(src))
}

pub fn parse_error<T>(error: ParseErrorType, token: Token) -> Result<T, ParseError> {
    Err(ParseError { error, token })
}
