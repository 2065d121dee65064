use std::fmt;

/// A position in line/column coordinates.
///
/// Both coordinates are 1-based. Columns count `char`s within the line, so a
/// column never points into the middle of a UTF-8 sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
	/// 1-based line number.
	pub line: u32,
	/// 1-based column.
	pub column: u32,
}

impl Position {
	/// Creates a new position.
	pub const fn new(line: u32, column: u32) -> Self {
		Self { line, column }
	}
}

impl fmt::Display for Position {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// An arbitrary range between two positions, possibly spanning lines.
///
/// A range whose start equals its end is a point (a cursor or hover location).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
	/// Start position (inclusive).
	pub start: Position,
	/// End position (exclusive for non-empty ranges).
	pub end: Position,
}

impl TextRange {
	/// Creates a range, swapping the endpoints if they are reversed.
	pub fn new(start: Position, end: Position) -> Self {
		if end < start {
			Self { start: end, end: start }
		} else {
			Self { start, end }
		}
	}

	/// Creates a zero-length range at a position.
	pub const fn point(pos: Position) -> Self {
		Self { start: pos, end: pos }
	}

	/// Returns true if the range is empty.
	pub fn is_point(&self) -> bool {
		self.start == self.end
	}
}

impl From<Span> for TextRange {
	fn from(span: Span) -> Self {
		Self {
			start: span.start(),
			end: span.end(),
		}
	}
}

/// A half-open column range on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
	/// 1-based line number.
	pub line: u32,
	/// 1-based start column (inclusive).
	pub start_column: u32,
	/// 1-based end column (exclusive).
	pub end_column: u32,
}

impl Span {
	/// Creates a span. `end_column` is clamped to be at least `start_column`.
	pub fn new(line: u32, start_column: u32, end_column: u32) -> Self {
		Self {
			line,
			start_column,
			end_column: end_column.max(start_column),
		}
	}

	/// Position of the first character.
	pub const fn start(&self) -> Position {
		Position::new(self.line, self.start_column)
	}

	/// Position just past the last character.
	pub const fn end(&self) -> Position {
		Position::new(self.line, self.end_column)
	}

	/// Number of characters covered.
	pub const fn len(&self) -> u32 {
		self.end_column - self.start_column
	}

	/// Returns true if the span covers no characters.
	pub const fn is_empty(&self) -> bool {
		self.start_column == self.end_column
	}

	/// Returns true if `range` lies entirely within this span, edges included.
	pub fn contains(&self, range: &TextRange) -> bool {
		self.start() <= range.start && range.end <= self.end()
	}

	/// Returns true if `range` touches this span.
	///
	/// A point matches with closed containment, so a cursor directly before
	/// or after the span counts. A selection is half-open and must share at
	/// least one character with the span.
	pub fn intersects(&self, range: &TextRange) -> bool {
		if range.is_point() {
			return self.start() <= range.start && range.start <= self.end();
		}
		range.start < self.end() && self.start() < range.end
	}
}

impl fmt::Display for Span {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}-{}", self.line, self.start_column, self.end_column)
	}
}

/// Replacement of exactly one span with new text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
	/// The replaced span.
	pub span: Span,
	/// The text that replaces it.
	pub new_text: String,
}

impl TextEdit {
	/// Creates a new edit.
	pub fn new(span: Span, new_text: impl Into<String>) -> Self {
		Self {
			span,
			new_text: new_text.into(),
		}
	}
}
