//! Quick-fix protocol.
//!
//! [`FixHandler::query_actions`] answers "what can be done here" for a
//! document location with at most one annotation's worth of actions:
//! one replacement per suggestion in the classifier's order, then ignore and
//! add-to-dictionary when the host configured them. [`FixHandler::apply`]
//! executes an action the user picked.
//!
//! Replacements go through the host as a single edit, so one undo step
//! reverts one fix. Ignore and add-word run the host callback and report
//! [`FixEffect::DictionaryChanged`]; the caller is expected to re-scan
//! right away, since the classifier's answers have changed.

use std::fmt;
use std::sync::Arc;

use spellmark_primitives::{TextEdit, TextRange};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::classifier::Classifier;
use crate::config::{EngineConfig, Message, MessageBuilder, WordFn};
use crate::host::TextSurface;
use crate::store::{Annotation, AnnotationStore};
use crate::{Error, Result};

/// Command id for replacing a word with a suggestion.
pub const REPLACE_COMMAND: &str = "spellmark.replace";
/// Command id for ignoring a word.
pub const IGNORE_COMMAND: &str = "spellmark.ignore";
/// Command id for adding a word to the dictionary.
pub const ADD_WORD_COMMAND: &str = "spellmark.addWord";

/// What an action does when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
	/// Replace the word with a suggestion.
	Replace,
	/// Tell the host to ignore the word.
	Ignore,
	/// Tell the host to add the word to its dictionary.
	AddWord,
}

impl ActionKind {
	/// Every kind, in the order actions are offered.
	pub const ALL: [ActionKind; 3] = [ActionKind::Replace, ActionKind::Ignore, ActionKind::AddWord];

	/// Command id the host dispatches this kind through.
	pub const fn command(self) -> &'static str {
		match self {
			Self::Replace => REPLACE_COMMAND,
			Self::Ignore => IGNORE_COMMAND,
			Self::AddWord => ADD_WORD_COMMAND,
		}
	}

	/// Stable name for logs and errors.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Replace => "replace",
			Self::Ignore => "ignore",
			Self::AddWord => "add-word",
		}
	}
}

impl fmt::Display for ActionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One offered fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
	/// What applying it does.
	pub kind: ActionKind,
	/// User-facing label.
	pub label: String,
	/// The annotation the action targets.
	pub annotation: Annotation,
	/// Replacement text for [`ActionKind::Replace`], the word otherwise.
	pub payload: String,
}

impl ActionDescriptor {
	/// Command id the host should invoke for this action.
	pub fn command(&self) -> &'static str {
		self.kind.command()
	}
}

/// What a successfully applied action changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixEffect {
	/// A replacement edit went through; the host's change notification
	/// drives the next scan.
	Edited,
	/// The host dictionary changed; annotations need an immediate re-scan.
	DictionaryChanged,
}

/// Builds and executes quick fixes against the published annotations.
pub struct FixHandler {
	classifier: Arc<dyn Classifier>,
	messages: Arc<dyn MessageBuilder>,
	ignore: Option<WordFn>,
	add_word: Option<WordFn>,
	store: Arc<AnnotationStore>,
	surface: Arc<dyn TextSurface>,
	gate: tokio::sync::Mutex<()>,
}

impl fmt::Debug for FixHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FixHandler")
			.field("ignore", &self.ignore.is_some())
			.field("add_word", &self.add_word.is_some())
			.field("store", &self.store)
			.finish_non_exhaustive()
	}
}

impl FixHandler {
	pub(crate) fn new(config: &EngineConfig, store: Arc<AnnotationStore>, surface: Arc<dyn TextSurface>) -> Self {
		Self {
			classifier: Arc::clone(&config.classifier),
			messages: Arc::clone(&config.messages),
			ignore: config.ignore.clone(),
			add_word: config.add_word.clone(),
			store,
			surface,
			gate: tokio::sync::Mutex::new(()),
		}
	}

	/// Lists fixes for the first annotation touching `range`.
	///
	/// Returns `None` when no annotation touches the range or when `cancel`
	/// fires before the suggestions arrive. A failing suggestion source is
	/// reported to the host and yields no replacement actions; ignore and
	/// add-word are still offered.
	pub async fn query_actions(&self, range: TextRange, cancel: &CancellationToken) -> Option<Vec<ActionDescriptor>> {
		let annotation = self.store.query_at(&range)?;

		let suggestions = tokio::select! {
			biased;
			_ = cancel.cancelled() => None,
			suggestions = self.classifier.suggestions(&annotation.word) => Some(suggestions),
		};
		let Some(suggestions) = suggestions.filter(|_| !cancel.is_cancelled()) else {
			debug!(word = %annotation.word, "spell.fix.query_cancelled");
			return None;
		};

		let suggestions = suggestions.unwrap_or_else(|source| {
			let error = Error::Classify {
				word: annotation.word.clone(),
				source,
			};
			warn!(error = %error, "spell.fix.suggest_failed");
			self.surface.report_error(&error);
			Vec::new()
		});

		let mut actions = Vec::with_capacity(suggestions.len() + 2);
		for suggestion in suggestions {
			actions.push(ActionDescriptor {
				kind: ActionKind::Replace,
				label: self.messages.build(Message::ApplySuggestion {
					word: &annotation.word,
					suggestion: &suggestion,
				}),
				annotation: annotation.clone(),
				payload: suggestion,
			});
		}
		if self.ignore.is_some() {
			actions.push(self.word_action(ActionKind::Ignore, &annotation));
		}
		if self.add_word.is_some() {
			actions.push(self.word_action(ActionKind::AddWord, &annotation));
		}

		debug!(word = %annotation.word, span = %annotation.span, count = actions.len(), "spell.fix.actions");
		Some(actions)
	}

	fn word_action(&self, kind: ActionKind, annotation: &Annotation) -> ActionDescriptor {
		let word = annotation.word.as_str();
		let message = match kind {
			ActionKind::AddWord => Message::AddWordLabel { word },
			_ => Message::IgnoreLabel { word },
		};
		ActionDescriptor {
			kind,
			label: self.messages.build(message),
			annotation: annotation.clone(),
			payload: annotation.word.clone(),
		}
	}

	/// Executes `action`.
	pub async fn apply(&self, action: &ActionDescriptor) -> Result<FixEffect> {
		match action.kind {
			ActionKind::Replace => self.apply_replace(&action.annotation, &action.payload),
			ActionKind::Ignore => self.run_word_callback(action.kind, self.ignore.as_ref(), &action.payload).await,
			ActionKind::AddWord => self.run_word_callback(action.kind, self.add_word.as_ref(), &action.payload).await,
		}
	}

	/// Replaces the annotated word with `replacement` as one host edit.
	///
	/// Fails with [`Error::StaleAnnotation`] if the document no longer holds
	/// the word at the annotated span.
	pub fn apply_replace(&self, annotation: &Annotation, replacement: &str) -> Result<FixEffect> {
		let snapshot = self.surface.snapshot();
		if snapshot.span_text(annotation.span).as_deref() != Some(annotation.word.as_str()) {
			debug!(word = %annotation.word, span = %annotation.span, "spell.fix.stale");
			return Err(Error::StaleAnnotation(annotation.span));
		}

		self.surface
			.apply_edit(TextEdit::new(annotation.span, replacement))
			.map_err(Error::Host)?;
		debug!(word = %annotation.word, replacement, span = %annotation.span, "spell.fix.replaced");
		Ok(FixEffect::Edited)
	}

	/// Runs an ignore or add-word callback. Calls never overlap.
	async fn run_word_callback(&self, kind: ActionKind, callback: Option<&WordFn>, word: &str) -> Result<FixEffect> {
		let Some(callback) = callback else {
			return Err(Error::MissingOption(match kind {
				ActionKind::AddWord => "add_word",
				_ => "ignore",
			}));
		};

		let _gate = self.gate.lock().await;
		callback(word).resolve().await.map_err(|source| Error::Callback {
			kind,
			word: word.to_string(),
			source,
		})?;
		debug!(kind = %kind, word, "spell.fix.dictionary_changed");
		Ok(FixEffect::DictionaryChanged)
	}
}
