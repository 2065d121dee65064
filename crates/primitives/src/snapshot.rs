use std::ops::Range;

use ropey::{Rope, RopeSlice};

use crate::span::{Span, TextEdit};

/// Immutable copy of a whole document at one version.
///
/// Cloning is cheap: the rope shares its chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSnapshot {
	version: u64,
	text: Rope,
}

impl DocumentSnapshot {
	/// Creates a snapshot of `text` at `version`.
	pub fn new(version: u64, text: Rope) -> Self {
		Self { version, text }
	}

	/// Creates a snapshot from a string slice.
	pub fn from_text(version: u64, text: &str) -> Self {
		Self::new(version, Rope::from_str(text))
	}

	/// Host-assigned document version.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Full document text.
	pub fn text(&self) -> &Rope {
		&self.text
	}

	/// Number of lines, including the empty line after a trailing newline.
	pub fn line_count(&self) -> usize {
		self.text.len_lines()
	}

	/// Returns the content of 1-based `line` without its terminator.
	pub fn line(&self, line: u32) -> Option<String> {
		self.line_slice(line).map(String::from)
	}

	/// Iterates `(line_number, content)` pairs in document order.
	pub fn lines(&self) -> impl Iterator<Item = (u32, String)> + '_ {
		self.text
			.lines()
			.enumerate()
			.map(|(idx, slice)| (idx as u32 + 1, String::from(strip_terminator(slice))))
	}

	/// Converts a span to an absolute char range, if it lies inside the document.
	pub fn char_range(&self, span: Span) -> Option<Range<usize>> {
		if span.line == 0 || span.start_column == 0 {
			return None;
		}
		let content = self.line_slice(span.line)?;
		let end = span.end_column as usize - 1;
		if end > content.len_chars() {
			return None;
		}
		let line_start = self.text.line_to_char(span.line as usize - 1);
		Some(line_start + span.start_column as usize - 1..line_start + end)
	}

	/// Text currently covered by `span`.
	pub fn span_text(&self, span: Span) -> Option<String> {
		let range = self.char_range(span)?;
		Some(String::from(self.text.slice(range)))
	}

	/// Returns the snapshot produced by applying `edit`, at `version + 1`.
	pub fn with_edit(&self, edit: &TextEdit) -> Option<Self> {
		let range = self.char_range(edit.span)?;
		let mut text = self.text.clone();
		text.remove(range.clone());
		text.insert(range.start, &edit.new_text);
		Some(Self::new(self.version + 1, text))
	}

	fn line_slice(&self, line: u32) -> Option<RopeSlice<'_>> {
		let idx = (line as usize).checked_sub(1)?;
		if idx >= self.text.len_lines() {
			return None;
		}
		Some(strip_terminator(self.text.line(idx)))
	}
}

fn strip_terminator(line: RopeSlice<'_>) -> RopeSlice<'_> {
	let len = line.len_chars();
	let last = len.checked_sub(1).map(|idx| line.char(idx));
	let cut = match last {
		Some('\n') if len >= 2 && line.char(len - 2) == '\r' => 2,
		Some('\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}') => 1,
		_ => 0,
	};
	line.slice(..len - cut)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_lines_strip_terminators() {
		let snapshot = DocumentSnapshot::from_text(1, "alpha\r\nbeta\ngamma");
		let lines: Vec<_> = snapshot.lines().collect();
		assert_eq!(
			lines,
			vec![
				(1, "alpha".to_string()),
				(2, "beta".to_string()),
				(3, "gamma".to_string())
			]
		);
	}

	#[test]
	fn test_trailing_newline_yields_empty_last_line() {
		let snapshot = DocumentSnapshot::from_text(1, "one\n");
		assert_eq!(snapshot.line_count(), 2);
		assert_eq!(snapshot.line(2).as_deref(), Some(""));
		assert_eq!(snapshot.line(3), None);
	}

	#[test]
	fn test_span_text_uses_char_columns() {
		let snapshot = DocumentSnapshot::from_text(1, "héllo wörld\nnext");
		assert_eq!(snapshot.span_text(Span::new(1, 7, 12)).as_deref(), Some("wörld"));
		assert_eq!(snapshot.span_text(Span::new(2, 1, 5)).as_deref(), Some("next"));
	}

	#[test]
	fn test_span_past_line_end_is_rejected() {
		let snapshot = DocumentSnapshot::from_text(1, "short\nline");
		assert_eq!(snapshot.char_range(Span::new(1, 4, 8)), None);
		assert_eq!(snapshot.char_range(Span::new(0, 1, 2)), None);
		assert_eq!(snapshot.char_range(Span::new(5, 1, 2)), None);
	}

	#[test]
	fn test_with_edit_replaces_span_and_bumps_version() {
		let snapshot = DocumentSnapshot::from_text(7, "Ths is fien.\nok");
		let edited = snapshot.with_edit(&TextEdit::new(Span::new(1, 1, 4), "This")).unwrap();
		assert_eq!(edited.version(), 8);
		assert_eq!(edited.text().to_string(), "This is fien.\nok");
	}
}
