//! Engine configuration.
//!
//! Configuration has two layers:
//!
//! - [`Settings`]: plain data (owner tag, debounce interval, annotation cap,
//!   severity, language scope). Deserializable from TOML so hosts can keep it
//!   next to their other editor settings.
//! - [`SpellcheckerOptions`]: the builder that carries the host callbacks
//!   (`check`, `suggest`, and the optional tokenizer, ignore, add-word and
//!   message hooks) on top of a [`Settings`] value.
//!
//! ```toml
//! owner = "prose"
//! debounce_ms = 250
//! max_annotations = 200
//! severity = "warning"
//! languages = ["markdown", "plaintext"]
//! ```

mod messages;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use self::messages::{DefaultMessages, Message, MessageBuilder};
use crate::classifier::{CallbackClassifier, Classifier, Reply};
use crate::tokenize::{DefaultTokenizer, FnTokenizer, Token, Tokenizer};
use crate::{Error, Result};

/// Owner tag used for published markers unless configured otherwise.
pub const DEFAULT_OWNER: &str = "spellchecker";

/// Default trailing-edge debounce between the last edit and a scan.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Default ceiling on annotations published by one scan.
pub const MAX_ANNOTATIONS: usize = 500;

/// Shortest word the default tokenizer emits.
pub const DEFAULT_MIN_WORD_LEN: usize = 2;

/// Marker severity forwarded to the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	/// Rendered as an error.
	Error,
	/// Rendered as a warning.
	Warning,
	/// Rendered as information.
	#[default]
	Info,
	/// Rendered as a hint.
	Hint,
}

/// Restricts which documents register the quick-fix protocol.
///
/// An empty selector matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageSelector {
	languages: Vec<String>,
}

impl LanguageSelector {
	/// Matches every document.
	pub fn all() -> Self {
		Self::default()
	}

	/// Matches documents whose language id is one of `languages`.
	pub fn languages<I, S>(languages: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			languages: languages.into_iter().map(Into::into).collect(),
		}
	}

	/// Returns true if the selector places no restriction.
	pub fn is_all(&self) -> bool {
		self.languages.is_empty()
	}

	/// Returns true if a document with `language_id` is in scope.
	///
	/// Documents without a language id only match an unrestricted selector.
	pub fn matches(&self, language_id: Option<&str>) -> bool {
		if self.is_all() {
			return true;
		}
		language_id.is_some_and(|id| self.languages.iter().any(|lang| lang == id))
	}
}

/// Data-only engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Namespace for published markers.
	pub owner: String,
	/// Debounce interval in milliseconds.
	pub debounce_ms: u64,
	/// Maximum annotations per scan.
	pub max_annotations: usize,
	/// Shortest word the default tokenizer emits.
	pub min_word_len: usize,
	/// Marker severity.
	pub severity: Severity,
	/// Documents that get the quick-fix protocol.
	pub languages: LanguageSelector,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			owner: DEFAULT_OWNER.to_string(),
			debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
			max_annotations: MAX_ANNOTATIONS,
			min_word_len: DEFAULT_MIN_WORD_LEN,
			severity: Severity::default(),
			languages: LanguageSelector::default(),
		}
	}
}

impl Settings {
	/// Parses settings from TOML text. Missing keys take their defaults.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a TOML settings file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| Error::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	/// Debounce interval as a [`Duration`].
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}

/// Host callback deciding whether a word is spelled correctly.
pub type CheckFn = Arc<dyn Fn(&str) -> Reply<bool> + Send + Sync>;
/// Host callback producing ordered corrections for a word.
pub type SuggestFn = Arc<dyn Fn(&str) -> Reply<Vec<String>> + Send + Sync>;
/// Host callback that records a word (ignore or add-to-dictionary).
pub type WordFn = Arc<dyn Fn(&str) -> Reply<()> + Send + Sync>;

/// Builder for a [`crate::Spellchecker`].
///
/// `check` and `suggest` (or a complete [`Classifier`]) are required;
/// [`crate::Spellchecker::new`] fails without them.
#[derive(Default)]
pub struct SpellcheckerOptions {
	check: Option<CheckFn>,
	suggest: Option<SuggestFn>,
	classifier: Option<Arc<dyn Classifier>>,
	tokenizer: Option<Arc<dyn Tokenizer>>,
	ignore: Option<WordFn>,
	add_word: Option<WordFn>,
	messages: Option<Arc<dyn MessageBuilder>>,
	settings: Settings,
}

impl std::fmt::Debug for SpellcheckerOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SpellcheckerOptions")
			.field("check", &self.check.is_some())
			.field("suggest", &self.suggest.is_some())
			.field("classifier", &self.classifier.is_some())
			.field("tokenizer", &self.tokenizer.is_some())
			.field("ignore", &self.ignore.is_some())
			.field("add_word", &self.add_word.is_some())
			.field("settings", &self.settings)
			.finish()
	}
}

impl SpellcheckerOptions {
	/// Starts from default settings and no callbacks.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the spelling predicate.
	pub fn check<F>(mut self, check: F) -> Self
	where
		F: Fn(&str) -> Reply<bool> + Send + Sync + 'static,
	{
		self.check = Some(Arc::new(check));
		self
	}

	/// Sets the suggestion source.
	pub fn suggest<F>(mut self, suggest: F) -> Self
	where
		F: Fn(&str) -> Reply<Vec<String>> + Send + Sync + 'static,
	{
		self.suggest = Some(Arc::new(suggest));
		self
	}

	/// Supplies a complete classifier instead of `check`/`suggest` callbacks.
	pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
		self.classifier = Some(classifier);
		self
	}

	/// Replaces the default tokenizer with a function.
	pub fn tokenize<F>(mut self, tokenize: F) -> Self
	where
		F: Fn(&str) -> Vec<Token> + Send + Sync + 'static,
	{
		self.tokenizer = Some(Arc::new(FnTokenizer::new(tokenize)));
		self
	}

	/// Replaces the default tokenizer.
	pub fn tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
		self.tokenizer = Some(tokenizer);
		self
	}

	/// Enables the ignore action.
	pub fn ignore<F>(mut self, ignore: F) -> Self
	where
		F: Fn(&str) -> Reply<()> + Send + Sync + 'static,
	{
		self.ignore = Some(Arc::new(ignore));
		self
	}

	/// Enables the add-to-dictionary action.
	pub fn add_word<F>(mut self, add_word: F) -> Self
	where
		F: Fn(&str) -> Reply<()> + Send + Sync + 'static,
	{
		self.add_word = Some(Arc::new(add_word));
		self
	}

	/// Overrides user-facing messages.
	pub fn message_builder(mut self, messages: impl MessageBuilder + 'static) -> Self {
		self.messages = Some(Arc::new(messages));
		self
	}

	/// Replaces all data settings.
	pub fn settings(mut self, settings: Settings) -> Self {
		self.settings = settings;
		self
	}

	/// Sets the marker severity.
	pub fn severity(mut self, severity: Severity) -> Self {
		self.settings.severity = severity;
		self
	}

	/// Restricts the quick-fix protocol to some languages.
	pub fn language_selector(mut self, selector: LanguageSelector) -> Self {
		self.settings.languages = selector;
		self
	}

	/// Overrides the debounce interval.
	pub fn debounce_interval(mut self, interval: Duration) -> Self {
		self.settings.debounce_ms = interval.as_millis() as u64;
		self
	}

	/// Validates the options and resolves defaults.
	pub(crate) fn resolve(self) -> Result<EngineConfig> {
		let classifier: Arc<dyn Classifier> = match self.classifier {
			Some(classifier) => classifier,
			None => {
				let check = self.check.ok_or(Error::MissingOption("check"))?;
				let suggest = self.suggest.ok_or(Error::MissingOption("suggest"))?;
				Arc::new(CallbackClassifier::new(check, suggest))
			}
		};
		let tokenizer = self
			.tokenizer
			.unwrap_or_else(|| Arc::new(DefaultTokenizer::with_min_len(self.settings.min_word_len)));

		Ok(EngineConfig {
			classifier,
			tokenizer,
			ignore: self.ignore,
			add_word: self.add_word,
			messages: self.messages.unwrap_or_else(|| Arc::new(DefaultMessages)),
			settings: self.settings,
		})
	}
}

/// Validated configuration with every default filled in.
#[derive(Clone)]
pub(crate) struct EngineConfig {
	pub(crate) classifier: Arc<dyn Classifier>,
	pub(crate) tokenizer: Arc<dyn Tokenizer>,
	pub(crate) ignore: Option<WordFn>,
	pub(crate) add_word: Option<WordFn>,
	pub(crate) messages: Arc<dyn MessageBuilder>,
	pub(crate) settings: Settings,
}

impl EngineConfig {
	pub(crate) fn has_ignore(&self) -> bool {
		self.ignore.is_some()
	}

	pub(crate) fn has_add_word(&self) -> bool {
		self.add_word.is_some()
	}
}
