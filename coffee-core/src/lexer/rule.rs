use super::token::TokenKind;

/// How a rule recognises the start of the remaining input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
	/// `//` up to and including the next newline.
	LineComment,
	/// `/* ... */`, shortest match, may span lines.
	BlockComment,
	/// Case-insensitive word followed by a word boundary.
	Keyword(&'static str),
	/// Exact punctuation.
	Symbol(&'static str),
	/// `[A-Za-z_]\w*`
	Identifier,
	/// `[0-9]+`
	Number,
	/// `"[^"]*"`
	String,
	/// `\s+`
	Whitespace,
	/// `\S+\s?`
	Invalid,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
	pub kind: TokenKind,
	pub pattern: Pattern,
}

const fn rule(kind: TokenKind, pattern: Pattern) -> Rule {
	Rule { kind, pattern }
}

/// Tried top to bottom; the first rule that matches wins, not the longest.
/// Comments must come before `/`, keywords before identifiers and
/// two-character operators before their one-character prefixes.
pub const RULES: &[Rule] = &[
	rule(TokenKind::Comment, Pattern::LineComment),
	rule(TokenKind::Comment, Pattern::BlockComment),

	rule(TokenKind::And, Pattern::Keyword("and")),
	rule(TokenKind::Or, Pattern::Keyword("or")),
	rule(TokenKind::If, Pattern::Keyword("if")),
	rule(TokenKind::Else, Pattern::Keyword("else")),
	rule(TokenKind::True, Pattern::Keyword("true")),
	rule(TokenKind::False, Pattern::Keyword("false")),
	rule(TokenKind::Fun, Pattern::Keyword("fun")),
	rule(TokenKind::Return, Pattern::Keyword("return")),
	rule(TokenKind::For, Pattern::Keyword("for")),
	rule(TokenKind::While, Pattern::Keyword("while")),
	rule(TokenKind::Null, Pattern::Keyword("null")),
	rule(TokenKind::Var, Pattern::Keyword("var")),

	rule(TokenKind::BangEqual, Pattern::Symbol("!=")),
	rule(TokenKind::EqualEqual, Pattern::Symbol("==")),
	rule(TokenKind::GreaterEqual, Pattern::Symbol(">=")),
	rule(TokenKind::LesserEqual, Pattern::Symbol("<=")),
	rule(TokenKind::PlusEqual, Pattern::Symbol("+=")),
	rule(TokenKind::MinusEqual, Pattern::Symbol("-=")),

	rule(TokenKind::Equal, Pattern::Symbol("=")),
	rule(TokenKind::Greater, Pattern::Symbol(">")),
	rule(TokenKind::Lesser, Pattern::Symbol("<")),
	rule(TokenKind::LeftParen, Pattern::Symbol("(")),
	rule(TokenKind::RightParen, Pattern::Symbol(")")),
	rule(TokenKind::LeftSquare, Pattern::Symbol("[")),
	rule(TokenKind::RightSquare, Pattern::Symbol("]")),
	rule(TokenKind::LeftBrace, Pattern::Symbol("{")),
	rule(TokenKind::RightBrace, Pattern::Symbol("}")),
	rule(TokenKind::Comma, Pattern::Symbol(",")),
	rule(TokenKind::Dot, Pattern::Symbol(".")),
	rule(TokenKind::Minus, Pattern::Symbol("-")),
	rule(TokenKind::Plus, Pattern::Symbol("+")),
	rule(TokenKind::Percent, Pattern::Symbol("%")),
	rule(TokenKind::Semicolon, Pattern::Symbol(";")),
	rule(TokenKind::Slash, Pattern::Symbol("/")),
	rule(TokenKind::Star, Pattern::Symbol("*")),
	rule(TokenKind::Bang, Pattern::Symbol("!")),

	rule(TokenKind::Identifier, Pattern::Identifier),
	rule(TokenKind::Number, Pattern::Number),
	rule(TokenKind::String, Pattern::String),

	rule(TokenKind::Whitespace, Pattern::Whitespace),
	rule(TokenKind::Invalid, Pattern::Invalid),
];

pub fn is_word_char(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

impl Pattern {
	/// Byte length of the match at the start of `input`, if any.
	pub fn matches(&self, input: &str) -> Option<usize> {
		let len = match self {
			Self::LineComment => {
				let body = input.strip_prefix("//")?;
				2 + body.find('\n').map_or(body.len(), |idx| idx + 1)
			},
			Self::BlockComment => {
				let body = input.strip_prefix("/*")?;
				2 + body.find("*/")? + 2
			},
			Self::Keyword(word) => {
				let head = input.get(..word.len())?;

				if !head.eq_ignore_ascii_case(word) {
					return None;
				}

				match input[word.len()..].chars().next() {
					Some(ch) if is_word_char(ch) => return None,
					_ => word.len()
				}
			},
			Self::Symbol(symbol) => {
				if !input.starts_with(symbol) {
					return None;
				}

				symbol.len()
			},
			Self::Identifier => {
				let mut chars = input.char_indices();

				match chars.next() {
					Some((_, ch)) if ch.is_ascii_alphabetic() || ch == '_' => {},
					_ => return None
				}

				chars.find(|(_, ch)| !is_word_char(*ch))
					.map_or(input.len(), |(idx, _)| idx)
			},
			Self::Number => input.find(|ch: char| !ch.is_ascii_digit())
				.unwrap_or(input.len()),
			Self::String => {
				let body = input.strip_prefix('"')?;
				1 + body.find('"')? + 1
			},
			Self::Whitespace => input.find(|ch: char| !ch.is_whitespace())
				.unwrap_or(input.len()),
			Self::Invalid => {
				let word = input.find(char::is_whitespace).unwrap_or(input.len());

				match input[word..].chars().next() {
					Some(ch) if word > 0 => word + ch.len_utf8(),
					_ => word
				}
			}
		};

		(len > 0).then_some(len)
	}
}
