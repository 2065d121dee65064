//! Error types for the spellchecking engine.

use std::path::PathBuf;

use spellmark_primitives::Span;
use thiserror::Error;

use crate::fix::ActionKind;

/// Errors produced by the engine.
///
/// Only [`Error::MissingOption`] and the settings variants are fatal, and
/// only at construction. Everything else is reported and the engine keeps
/// running.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// A required option was not supplied.
	#[error("missing required option `{0}`")]
	MissingOption(&'static str),

	/// Settings text could not be parsed.
	#[error("invalid settings: {0}")]
	Settings(#[from] toml::de::Error),

	/// A settings file could not be read.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The `check` or `suggest` callback failed for a word.
	#[error("classifier failed for `{word}`: {source}")]
	Classify {
		/// The word being classified.
		word: String,
		/// The host's failure.
		source: anyhow::Error,
	},

	/// An `ignore` or `addWord` callback failed.
	#[error("{kind} callback failed for `{word}`: {source}")]
	Callback {
		/// Which fix was being applied.
		kind: ActionKind,
		/// The word the fix targeted.
		word: String,
		/// The host's failure.
		source: anyhow::Error,
	},

	/// The host rejected a text edit.
	#[error("host rejected edit: {0}")]
	Host(anyhow::Error),

	/// The document no longer holds the flagged word at the annotated span.
	#[error("annotation at {0} no longer matches the document")]
	StaleAnnotation(Span),
}

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
