use std::fmt::Display;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	// Single-character tokens
	LeftParen,
	RightParen,
	LeftSquare,
	RightSquare,
	LeftBrace,
	RightBrace,
	Comma,
	Dot,
	Minus,
	Plus,
	Percent,
	Semicolon,
	Slash,
	Star,
	Bang,

	// One or two character tokens
	BangEqual,
	Equal,
	EqualEqual,
	PlusEqual,
	MinusEqual,
	Greater,
	GreaterEqual,
	Lesser,
	LesserEqual,

	// Literals
	Identifier,
	String,
	Number,

	// Trivia, dropped by the parser
	Invalid,
	Whitespace,
	Comment,

	// Keywords
	And,
	Or,
	If,
	Else,
	True,
	False,
	Fun,
	Return,
	For,
	While,
	Null,
	Var,

	Eof,
}

impl TokenKind {
	/// Tokens the parser never sees.
	pub fn is_trivia(&self) -> bool {
		matches!(self, Self::Whitespace | Self::Comment | Self::Invalid)
	}

	/// Keywords that may open a statement; the parser resynchronizes on them.
	pub fn starts_statement(&self) -> bool {
		matches!(
			self,
			Self::Fun | Self::Var | Self::For | Self::If | Self::While | Self::Return
		)
	}

	pub fn as_literal(&self) -> &'static str {
		match self {
			Self::LeftParen => "(",
			Self::RightParen => ")",
			Self::LeftSquare => "[",
			Self::RightSquare => "]",
			Self::LeftBrace => "{",
			Self::RightBrace => "}",
			Self::Comma => ",",
			Self::Dot => ".",
			Self::Minus => "-",
			Self::Plus => "+",
			Self::Percent => "%",
			Self::Semicolon => ";",
			Self::Slash => "/",
			Self::Star => "*",
			Self::Bang => "!",
			Self::BangEqual => "!=",
			Self::Equal => "=",
			Self::EqualEqual => "==",
			Self::PlusEqual => "+=",
			Self::MinusEqual => "-=",
			Self::Greater => ">",
			Self::GreaterEqual => ">=",
			Self::Lesser => "<",
			Self::LesserEqual => "<=",
			Self::Identifier => "IDENTIFIER",
			Self::String => "STRING",
			Self::Number => "NUMBER",
			Self::Invalid => "INVALID",
			Self::Whitespace => "WHITE_SPACE",
			Self::Comment => "COMMENT",
			Self::And => "and",
			Self::Or => "or",
			Self::If => "if",
			Self::Else => "else",
			Self::True => "true",
			Self::False => "false",
			Self::Fun => "fun",
			Self::Return => "return",
			Self::For => "for",
			Self::While => "while",
			Self::Null => "null",
			Self::Var => "var",
			Self::Eof => "EOF",
		}
	}
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_literal())
	}
}

/// Decoded payload of a `NUMBER` or `STRING` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
	Int(i64),
	String(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	pub lexeme: String,
	pub line: u32,
	pub literal: Option<Literal>,
	pub location: SrcSpan,
}

impl Token {
	pub fn new(kind: TokenKind, lexeme: &str, line: u32, location: SrcSpan) -> Self {
		let literal = match kind {
			TokenKind::Number => lexeme.parse::<i64>().ok().map(Literal::Int),
			TokenKind::String => Some(Literal::String(lexeme.replace('"', ""))),
			_ => None,
		};

		Self {
			kind,
			lexeme: lexeme.to_string(),
			line,
			literal,
			location,
		}
	}

	pub fn eof(line: u32, offset: u32) -> Self {
		Self::new(TokenKind::Eof, "", line, SrcSpan::at(offset))
	}

	/// A token that never came from source text, e.g. the `+` of a desugared `+=`.
	pub fn synthetic(kind: TokenKind, like: &Token) -> Self {
		Self {
			kind,
			lexeme: kind.as_literal().to_string(),
			line: like.line,
			literal: None,
			location: like.location,
		}
	}

	pub fn is(&self, kind: TokenKind) -> bool {
		self.kind == kind
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?} : {}", self.kind, self.lexeme)
	}
}
