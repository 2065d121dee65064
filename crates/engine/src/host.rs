//! Contracts between the engine and the editor surface hosting it.
//!
//! The engine never owns the buffer, the undo stack or the renderer. It
//! reaches them through [`TextSurface`], and hands the host back small
//! trait objects ([`ChangeListener`], [`CodeActionProvider`],
//! [`CommandHandler`]) for the host to call. Every registration returns a
//! [`Disposable`] that the engine releases on disposal.

use std::sync::Arc;

use async_trait::async_trait;
use spellmark_primitives::{DocumentSnapshot, TextEdit, TextRange};
use tokio_util::sync::CancellationToken;

use crate::config::LanguageSelector;
use crate::fix::ActionDescriptor;
use crate::store::MarkerSink;
use crate::{Error, Result};

/// Handle to a host registration.
pub trait Disposable: Send {
	/// Releases the registration. Must be safe to call more than once.
	fn dispose(&mut self);
}

/// Notified after every document mutation.
pub trait ChangeListener: Send + Sync {
	/// The document changed and is now at `version`.
	fn on_change(&self, version: u64);
}

/// Answers quick-fix queries for a document location.
#[async_trait]
pub trait CodeActionProvider: Send + Sync {
	/// Returns the fixes available at `range`, or `None` if there are none.
	///
	/// Returns `None` as well once `cancel` fires; a cancelled query never
	/// yields stale actions.
	async fn provide_code_actions(&self, range: TextRange, cancel: CancellationToken) -> Option<Vec<ActionDescriptor>>;
}

/// Executes a command the host invokes when the user picks an action.
#[async_trait]
pub trait CommandHandler: Send + Sync {
	/// Runs `action`.
	async fn execute(&self, action: ActionDescriptor) -> Result<()>;
}

/// The editor surface a spellchecker is attached to.
///
/// Markers are rendered through the [`MarkerSink`] supertrait.
pub trait TextSurface: MarkerSink + Send + Sync + 'static {
	/// Full document text at its current version.
	fn snapshot(&self) -> DocumentSnapshot;

	/// Language id of the document, if the host knows it.
	fn language_id(&self) -> Option<String> {
		None
	}

	/// Subscribes to document mutations.
	fn on_did_change(&self, listener: Arc<dyn ChangeListener>) -> Box<dyn Disposable>;

	/// Applies `edit` as a single undoable transaction.
	fn apply_edit(&self, edit: TextEdit) -> anyhow::Result<()>;

	/// Registers a quick-fix provider for documents matching `selector`.
	fn register_code_action_provider(&self, selector: &LanguageSelector, provider: Arc<dyn CodeActionProvider>) -> Box<dyn Disposable>;

	/// Registers the handler for command `id`.
	fn register_command(&self, id: &'static str, handler: Arc<dyn CommandHandler>) -> Box<dyn Disposable>;

	/// Receives errors the engine recovered from.
	fn report_error(&self, error: &Error) {
		tracing::warn!(error = %error, "spell.host.unreported_error");
	}
}
