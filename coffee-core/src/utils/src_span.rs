use std::{fmt::Display, ops::Range};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SrcSpan {
	pub start: u32,
	pub end: u32,
}

impl SrcSpan {
	pub fn from(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	/// Zero-width span sitting at `offset`.
	pub fn at(offset: u32) -> Self {
		Self { start: offset, end: offset }
	}

	pub fn len(&self) -> u32 {
		self.end - self.start
	}

	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	pub fn to_range(&self) -> Range<usize> {
		(self.start as usize)..(self.end as usize)
	}
}

impl Display for SrcSpan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}
