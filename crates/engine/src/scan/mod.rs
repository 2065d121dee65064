//! Scan engine.
//!
//! One scan session takes a [`DocumentSnapshot`], tokenizes it line by line,
//! classifies every token and produces an [`AnnotationSet`] in document order.
//! Tokens of one line are classified concurrently; results are zipped back
//! with their tokens, so completion order never leaks into the output.
//!
//! Sessions are identified by a generation from the shared
//! [`GenerationClock`]. Between lines a session checks whether a newer one has
//! started and, if so, moves to [`ScanState::Superseded`] and gives up. The
//! final word on staleness belongs to [`crate::store::AnnotationStore::publish`],
//! which re-checks the generation under its writer lock.

use std::sync::Arc;

use futures::future::join_all;
use spellmark_primitives::{DocumentSnapshot, Span};
use spellmark_worker::GenerationClock;
use tracing::trace;

use crate::classifier::Classifier;
use crate::config::{EngineConfig, Message, MessageBuilder, Severity};
use crate::store::{Annotation, AnnotationSet};
use crate::tokenize::{Token, Tokenizer};
use crate::Error;

/// Where a scan session is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
	/// Created, nothing read yet.
	Idle,
	/// Splitting the current line into tokens.
	TokenizingLine,
	/// Waiting on the classifier for the current line.
	AwaitingClassification,
	/// Finished; the result is ready to hand to the store.
	Publishing,
	/// A newer session started; this one's result is discarded.
	Superseded,
}

/// One pass over one document snapshot.
#[derive(Debug)]
pub struct ScanSession {
	generation: u64,
	state: ScanState,
	clock: GenerationClock,
}

impl ScanSession {
	/// Starts a session, superseding every session started before it.
	pub fn begin(clock: &GenerationClock) -> Self {
		Self {
			generation: clock.next(),
			state: ScanState::Idle,
			clock: clock.clone(),
		}
	}

	/// Generation of this session.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Current state.
	pub fn state(&self) -> ScanState {
		self.state
	}

	/// Most recently started generation on the shared clock.
	pub fn latest(&self) -> u64 {
		self.clock.latest()
	}

	/// Moves to `Superseded` if a newer session has started.
	fn check_superseded(&mut self) -> bool {
		if self.state != ScanState::Superseded && !self.clock.is_current(self.generation) {
			self.transition(ScanState::Superseded);
		}
		self.state == ScanState::Superseded
	}

	fn transition(&mut self, next: ScanState) {
		trace!(generation = self.generation, from = ?self.state, to = ?next, "spell.scan.state");
		self.state = next;
	}
}

/// A token the classifier could not judge.
#[derive(Debug)]
pub struct ClassifyFailure {
	/// Where the token sits.
	pub span: Span,
	/// The classifier error, with the word attached.
	pub error: Error,
}

/// Output of a completed scan.
#[derive(Debug)]
pub struct ScanResult {
	/// Annotations in document order.
	pub annotations: AnnotationSet,
	/// Tokens skipped because classification failed.
	pub failures: Vec<ClassifyFailure>,
	/// Tokens sent to the classifier.
	pub tokens_checked: usize,
}

/// Turns snapshots into annotation sets.
#[derive(Clone)]
pub struct Scanner {
	tokenizer: Arc<dyn Tokenizer>,
	classifier: Arc<dyn Classifier>,
	messages: Arc<dyn MessageBuilder>,
	severity: Severity,
	cap: usize,
}

impl Scanner {
	/// Creates a scanner. A cap of zero is treated as one.
	pub fn new(
		tokenizer: Arc<dyn Tokenizer>,
		classifier: Arc<dyn Classifier>,
		messages: Arc<dyn MessageBuilder>,
		severity: Severity,
		cap: usize,
	) -> Self {
		Self {
			tokenizer,
			classifier,
			messages,
			severity,
			cap: cap.max(1),
		}
	}

	pub(crate) fn from_config(config: &EngineConfig) -> Self {
		Self::new(
			Arc::clone(&config.tokenizer),
			Arc::clone(&config.classifier),
			Arc::clone(&config.messages),
			config.settings.severity,
			config.settings.max_annotations,
		)
	}

	/// Annotation cap.
	pub fn cap(&self) -> usize {
		self.cap
	}

	/// Scans `snapshot` for `session`.
	///
	/// Returns `None` if the session was superseded before it finished. Stops
	/// early once `cap` annotations exist; the set is then marked truncated.
	pub async fn run(&self, snapshot: &DocumentSnapshot, session: &mut ScanSession) -> Option<ScanResult> {
		let mut annotations = Vec::new();
		let mut failures = Vec::new();
		let mut tokens_checked = 0;
		let mut truncated = false;

		let mut lines = snapshot.lines().peekable();
		'lines: while let Some((line, text)) = lines.next() {
			if session.check_superseded() {
				return None;
			}

			session.transition(ScanState::TokenizingLine);
			let mut tokens: Vec<Token> = self.tokenizer.tokens(&text).collect();
			// Host tokenizers may yield in any order.
			tokens.sort_by_key(|token| token.offset);
			if tokens.is_empty() {
				continue;
			}

			session.transition(ScanState::AwaitingClassification);
			let verdicts = join_all(tokens.iter().map(|token| self.classifier.is_correct(&token.word))).await;
			tokens_checked += tokens.len();

			let count = tokens.len();
			for (idx, (token, verdict)) in tokens.into_iter().zip(verdicts).enumerate() {
				let span = token_span(line, &token);
				match verdict {
					Ok(true) => {}
					Ok(false) => {
						annotations.push(Annotation {
							message: self.messages.build(Message::Hover { word: &token.word }),
							word: token.word,
							span,
							severity: self.severity,
						});
						if annotations.len() >= self.cap {
							truncated = idx + 1 < count || lines.peek().is_some();
							break 'lines;
						}
					}
					Err(source) => failures.push(ClassifyFailure {
						span,
						error: Error::Classify { word: token.word, source },
					}),
				}
			}
		}

		if session.check_superseded() {
			return None;
		}
		session.transition(ScanState::Publishing);

		Some(ScanResult {
			annotations: AnnotationSet::new(annotations, snapshot.version(), truncated),
			failures,
			tokens_checked,
		})
	}
}

fn token_span(line: u32, token: &Token) -> Span {
	let start = token.offset as u32 + 1;
	Span::new(line, start, start + token.char_len() as u32)
}
