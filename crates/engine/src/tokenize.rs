//! Line tokenizers.
//!
//! A tokenizer turns one line of text into the words the classifier should
//! see. It holds no mutable state, so tokenizing the same line twice yields
//! the same tokens.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::DEFAULT_MIN_WORD_LEN;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[A-Za-z']+").expect("word pattern compiles"));

/// A word-like substring of one line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
	/// The word itself. Never empty.
	pub word: String,
	/// 0-based char offset of the word within its line.
	pub offset: usize,
}

impl Token {
	/// Creates a token.
	pub fn new(word: impl Into<String>, offset: usize) -> Self {
		Self {
			word: word.into(),
			offset,
		}
	}

	/// Length of the word in chars.
	pub fn char_len(&self) -> usize {
		self.word.chars().count()
	}
}

/// Splits a line into tokens.
pub trait Tokenizer: Send + Sync {
	/// Returns every token of `line` in order.
	fn tokenize(&self, line: &str) -> Vec<Token>;

	/// Lazily yields the tokens of `line`.
	///
	/// The default collects [`tokenize`](Self::tokenize); implementations that
	/// can stream should override it.
	fn tokens<'a>(&'a self, line: &'a str) -> Box<dyn Iterator<Item = Token> + 'a> {
		Box::new(self.tokenize(line).into_iter())
	}
}

/// Maximal runs of ASCII letters and apostrophes, dropping short matches.
#[derive(Debug, Clone, Copy)]
pub struct DefaultTokenizer {
	min_len: usize,
}

impl Default for DefaultTokenizer {
	fn default() -> Self {
		Self::with_min_len(DEFAULT_MIN_WORD_LEN)
	}
}

impl DefaultTokenizer {
	/// Drops words shorter than `min_len` chars. A zero is treated as one.
	pub fn with_min_len(min_len: usize) -> Self {
		Self { min_len: min_len.max(1) }
	}
}

impl Tokenizer for DefaultTokenizer {
	fn tokenize(&self, line: &str) -> Vec<Token> {
		self.tokens(line).collect()
	}

	fn tokens<'a>(&'a self, line: &'a str) -> Box<dyn Iterator<Item = Token> + 'a> {
		// Matches are ASCII, so their byte length is their char length.
		let mut chars_seen = 0;
		let mut bytes_seen = 0;
		Box::new(WORD_RE.find_iter(line).filter_map(move |m| {
			chars_seen += line[bytes_seen..m.start()].chars().count();
			bytes_seen = m.start();
			if m.len() < self.min_len {
				return None;
			}
			Some(Token::new(m.as_str(), chars_seen))
		}))
	}
}

/// Adapts a host function into a [`Tokenizer`].
pub struct FnTokenizer<F> {
	tokenize: F,
}

impl<F> FnTokenizer<F>
where
	F: Fn(&str) -> Vec<Token> + Send + Sync,
{
	/// Wraps `tokenize`.
	pub fn new(tokenize: F) -> Self {
		Self { tokenize }
	}
}

impl<F> Tokenizer for FnTokenizer<F>
where
	F: Fn(&str) -> Vec<Token> + Send + Sync,
{
	fn tokenize(&self, line: &str) -> Vec<Token> {
		(self.tokenize)(line)
			.into_iter()
			.filter(|token| !token.word.is_empty())
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn words(line: &str) -> Vec<(String, usize)> {
		DefaultTokenizer::default()
			.tokenize(line)
			.into_iter()
			.map(|token| (token.word, token.offset))
			.collect()
	}

	#[test]
	fn test_punctuation_is_excluded() {
		assert_eq!(
			words("Ths is fien."),
			vec![("Ths".to_string(), 0), ("is".to_string(), 4), ("fien".to_string(), 7)]
		);
	}

	#[test]
	fn test_single_letters_are_dropped() {
		assert_eq!(words("a b cd e"), vec![("cd".to_string(), 4)]);
	}

	#[test]
	fn test_apostrophes_stay_inside_words() {
		assert_eq!(words("don't stop"), vec![("don't".to_string(), 0), ("stop".to_string(), 6)]);
	}

	#[test]
	fn test_offsets_count_chars_not_bytes() {
		// "é" is two bytes but one column.
		assert_eq!(words("é ab çd"), vec![("ab".to_string(), 2)]);
		assert_eq!(words("ééé word"), vec![("word".to_string(), 4)]);
	}

	#[test]
	fn test_min_len_override() {
		let tokenizer = DefaultTokenizer::with_min_len(4);
		let found: Vec<_> = tokenizer.tokenize("one three seven").into_iter().map(|t| t.word).collect();
		assert_eq!(found, vec!["three", "seven"]);
	}

	#[test]
	fn test_fn_tokenizer_drops_empty_words() {
		let tokenizer = FnTokenizer::new(|line: &str| {
			line.split(',')
				.scan(0, |offset, part| {
					let token = Token::new(part, *offset);
					*offset += part.chars().count() + 1;
					Some(token)
				})
				.collect()
		});
		let found = tokenizer.tokenize("alpha,,beta");
		assert_eq!(found, vec![Token::new("alpha", 0), Token::new("beta", 7)]);
	}

	proptest! {
		#[test]
		fn prop_tokenize_is_idempotent(line in "\\PC{0,64}") {
			let tokenizer = DefaultTokenizer::default();
			prop_assert_eq!(tokenizer.tokenize(&line), tokenizer.tokenize(&line));
		}

		#[test]
		fn prop_tokens_match_their_offsets(line in "[a-zA-Z' .,éü]{0,64}") {
			let chars: Vec<char> = line.chars().collect();
			for token in DefaultTokenizer::default().tokenize(&line) {
				let slice: String = chars[token.offset..token.offset + token.char_len()].iter().collect();
				prop_assert_eq!(slice, token.word.clone());
				prop_assert!(token.char_len() >= 2);
			}
		}
	}
}
