use std::fmt::Display;

use super::rule::{Rule, RULES};
use super::token::Token;
use crate::utils::prelude::SrcSpan;

/// Splits source text into tokens, trivia included.
///
/// The stream always ends with exactly one `Eof` token.
#[derive(Debug)]
pub struct Lexer<'a> {
	rest: &'a str,
	offset: u32,
	line: u32,
	done: bool,
}

impl<'a> Display for Lexer<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\toffset: {},\n\tline: {},\n\tremaining: {}\n}}",
			self.offset, self.line, self.rest.len()
		)
	}
}

impl<'a> Lexer<'a> {
	pub fn new(input: &'a str) -> Self {
		Self {
			rest: input,
			offset: 0,
			line: 1,
			done: false,
		}
	}

	pub fn line(&self) -> u32 {
		self.line
	}

	fn match_rule(&self) -> (&'static Rule, usize) {
		for rule in RULES {
			if let Some(len) = rule.pattern.matches(self.rest) {
				return (rule, len);
			}
		}

		unreachable!("the invalid rule matches any non-whitespace prefix")
	}

	fn next_lexeme(&mut self) -> Token {
		let (rule, len) = self.match_rule();
		let (lexeme, rest) = self.rest.split_at(len);

		let start = self.offset;
		let end = start + len as u32;

		let token = Token::new(rule.kind, lexeme, self.line, SrcSpan::from(start, end));

		self.line += lexeme.matches('\n').count() as u32;
		self.offset = end;
		self.rest = rest;

		token
	}
}

impl<'a> Iterator for Lexer<'a> {
	type Item = Token;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}

		if self.rest.trim().is_empty() {
			self.done = true;

			return Some(Token::eof(self.line, self.offset));
		}

		let token = self.next_lexeme();

		tracing::trace!(kind = ?token.kind, line = token.line, lexeme = %token.lexeme, "token");

		Some(token)
	}
}

pub fn tokenize(src: &str) -> Vec<Token> {
	Lexer::new(src).collect()
}

/// Tokens the parser consumes, trivia removed.
pub fn significant(tokens: &[Token]) -> impl Iterator<Item = &Token> {
	tokens.iter().filter(|token| !token.kind.is_trivia())
}
