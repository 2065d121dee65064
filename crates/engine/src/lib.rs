//! Incremental spellchecking overlay for editor surfaces.
//!
//! A [`Spellchecker`] attaches to a host [`TextSurface`], scans its text for
//! misspelled words, publishes them as problem markers and serves quick
//! fixes for them. The host supplies the dictionary through two callbacks,
//! `check` and `suggest`, which may answer synchronously or asynchronously
//! (see [`Reply`]).
//!
//! The moving parts:
//!
//! - [`tokenize`]: splits one line into [`Token`]s.
//! - [`classifier`]: adapts host callbacks to the async [`Classifier`] trait.
//! - [`scan`]: turns a document snapshot into an ordered [`AnnotationSet`],
//!   abandoning the work if a newer scan starts.
//! - [`store`]: holds the published set and renders it, dropping stale scans.
//! - [`debounce`]: coalesces bursts of edits into one scan.
//! - [`fix`]: builds and applies quick fixes.
//! - [`lifecycle`]: wires everything to a surface and tears it down.
//!
//! Scans run on the ambient tokio runtime when there is one.
#![warn(missing_docs)]

pub mod classifier;
pub mod config;
pub mod debounce;
mod error;
pub mod fix;
pub mod host;
pub mod lifecycle;
pub mod scan;
pub mod store;
pub mod tokenize;

#[cfg(test)]
mod test_support;

pub use classifier::{CallbackClassifier, Classifier, Reply};
pub use config::{DEFAULT_DEBOUNCE, DEFAULT_OWNER, LanguageSelector, MAX_ANNOTATIONS, Message, MessageBuilder, Settings, Severity, SpellcheckerOptions};
pub use error::{Error, Result};
pub use fix::{ADD_WORD_COMMAND, ActionDescriptor, ActionKind, IGNORE_COMMAND, REPLACE_COMMAND};
pub use host::{ChangeListener, CodeActionProvider, CommandHandler, Disposable, TextSurface};
pub use lifecycle::{LifecycleState, ScanOutcome, ScanReport, Spellchecker};
pub use spellmark_primitives::{DocumentSnapshot, Position, Span, TextEdit, TextRange};
pub use store::{Annotation, AnnotationSet, MarkerSink, OwnerTag};
pub use tokenize::{DefaultTokenizer, Token, Tokenizer};
pub use tokio_util::sync::CancellationToken;
