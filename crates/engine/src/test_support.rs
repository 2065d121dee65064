//! In-memory [`TextSurface`] for tests.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use spellmark_primitives::{DocumentSnapshot, Position, TextEdit, TextRange};
use tokio_util::sync::CancellationToken;

use crate::config::LanguageSelector;
use crate::fix::ActionDescriptor;
use crate::host::{ChangeListener, CodeActionProvider, CommandHandler, Disposable, TextSurface};
use crate::store::{Annotation, MarkerSink, OwnerTag};
use crate::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Registration {
	Listener,
	Provider,
	Command,
}

#[derive(Default)]
struct MockState {
	snapshot: DocumentSnapshot,
	undo: Vec<DocumentSnapshot>,
	edits: Vec<TextEdit>,
	listeners: Vec<(u64, Arc<dyn ChangeListener>)>,
	providers: Vec<(u64, LanguageSelector, Arc<dyn CodeActionProvider>)>,
	commands: HashMap<&'static str, (u64, Arc<dyn CommandHandler>)>,
	markers: HashMap<String, Vec<Annotation>>,
	renders: usize,
	errors: Vec<String>,
	next_id: u64,
}

/// Editor surface backed by a rope, recording everything the engine does.
pub(crate) struct MockSurface {
	this: Weak<MockSurface>,
	language: Option<String>,
	reject_edits: bool,
	state: Mutex<MockState>,
}

impl MockSurface {
	pub(crate) fn new(text: &str) -> Arc<Self> {
		Self::build(text, None, false)
	}

	pub(crate) fn with_language(text: &str, language: &str) -> Arc<Self> {
		Self::build(text, Some(language.to_string()), false)
	}

	pub(crate) fn rejecting_edits(text: &str) -> Arc<Self> {
		Self::build(text, None, true)
	}

	fn build(text: &str, language: Option<String>, reject_edits: bool) -> Arc<Self> {
		Arc::new_cyclic(|this| Self {
			this: this.clone(),
			language,
			reject_edits,
			state: Mutex::new(MockState {
				snapshot: DocumentSnapshot::from_text(1, text),
				..MockState::default()
			}),
		})
	}

	/// Replaces the whole document, as typing would, and notifies listeners.
	pub(crate) fn set_text(&self, text: &str) {
		let version = {
			let mut state = self.state.lock();
			let next = DocumentSnapshot::from_text(state.snapshot.version() + 1, text);
			let previous = std::mem::replace(&mut state.snapshot, next);
			state.undo.push(previous);
			state.snapshot.version()
		};
		self.notify(version);
	}

	/// Reverts the most recent mutation.
	pub(crate) fn undo(&self) -> bool {
		let version = {
			let mut state = self.state.lock();
			let Some(previous) = state.undo.pop() else {
				return false;
			};
			let version = state.snapshot.version() + 1;
			state.snapshot = DocumentSnapshot::new(version, previous.text().clone());
			version
		};
		self.notify(version);
		true
	}

	fn notify(&self, version: u64) {
		let listeners: Vec<_> = self.state.lock().listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
		for listener in listeners {
			listener.on_change(version);
		}
	}

	pub(crate) fn text(&self) -> String {
		self.state.lock().snapshot.text().to_string()
	}

	pub(crate) fn edits(&self) -> Vec<TextEdit> {
		self.state.lock().edits.clone()
	}

	pub(crate) fn markers(&self, owner: &str) -> Vec<Annotation> {
		self.state.lock().markers.get(owner).cloned().unwrap_or_default()
	}

	pub(crate) fn marker_words(&self, owner: &str) -> Vec<String> {
		self.markers(owner).into_iter().map(|a| a.word).collect()
	}

	pub(crate) fn render_count(&self) -> usize {
		self.state.lock().renders
	}

	pub(crate) fn errors(&self) -> Vec<String> {
		self.state.lock().errors.clone()
	}

	pub(crate) fn listener_count(&self) -> usize {
		self.state.lock().listeners.len()
	}

	pub(crate) fn provider_count(&self) -> usize {
		self.state.lock().providers.len()
	}

	pub(crate) fn command_ids(&self) -> Vec<&'static str> {
		let mut ids: Vec<_> = self.state.lock().commands.keys().copied().collect();
		ids.sort_unstable();
		ids
	}

	/// Asks the first registered provider for fixes at a point.
	pub(crate) async fn code_actions_at(&self, line: u32, column: u32) -> Option<Vec<ActionDescriptor>> {
		let provider = self.state.lock().providers.first().map(|(_, _, p)| Arc::clone(p))?;
		let range = TextRange::point(Position::new(line, column));
		provider.provide_code_actions(range, CancellationToken::new()).await
	}

	/// Dispatches `action` through its registered command.
	pub(crate) async fn execute(&self, action: ActionDescriptor) -> Result<()> {
		let handler = self
			.state
			.lock()
			.commands
			.get(action.command())
			.map(|(_, handler)| Arc::clone(handler))
			.ok_or_else(|| Error::Host(anyhow::anyhow!("unknown command {}", action.command())))?;
		handler.execute(action).await
	}

	fn register(&self, kind: Registration, insert: impl FnOnce(&mut MockState, u64)) -> Box<dyn Disposable> {
		let mut state = self.state.lock();
		state.next_id += 1;
		let id = state.next_id;
		insert(&mut state, id);
		Box::new(MockSubscription {
			surface: self.this.clone(),
			kind,
			id,
		})
	}
}

impl MarkerSink for MockSurface {
	fn set_markers(&self, owner: &OwnerTag, markers: &[Annotation]) {
		let mut state = self.state.lock();
		state.renders += 1;
		state.markers.insert(owner.to_string(), markers.to_vec());
	}
}

impl TextSurface for MockSurface {
	fn snapshot(&self) -> DocumentSnapshot {
		self.state.lock().snapshot.clone()
	}

	fn language_id(&self) -> Option<String> {
		self.language.clone()
	}

	fn on_did_change(&self, listener: Arc<dyn ChangeListener>) -> Box<dyn Disposable> {
		self.register(Registration::Listener, |state, id| state.listeners.push((id, listener)))
	}

	fn apply_edit(&self, edit: TextEdit) -> anyhow::Result<()> {
		if self.reject_edits {
			anyhow::bail!("document is read-only");
		}
		let version = {
			let mut state = self.state.lock();
			let next = state
				.snapshot
				.with_edit(&edit)
				.ok_or_else(|| anyhow::anyhow!("edit {} is out of range", edit.span))?;
			let previous = std::mem::replace(&mut state.snapshot, next);
			state.undo.push(previous);
			state.edits.push(edit);
			state.snapshot.version()
		};
		self.notify(version);
		Ok(())
	}

	fn register_code_action_provider(&self, selector: &LanguageSelector, provider: Arc<dyn CodeActionProvider>) -> Box<dyn Disposable> {
		let selector = selector.clone();
		self.register(Registration::Provider, |state, id| state.providers.push((id, selector, provider)))
	}

	fn register_command(&self, id: &'static str, handler: Arc<dyn CommandHandler>) -> Box<dyn Disposable> {
		self.register(Registration::Command, |state, key| {
			state.commands.insert(id, (key, handler));
		})
	}

	fn report_error(&self, error: &Error) {
		self.state.lock().errors.push(error.to_string());
	}
}

struct MockSubscription {
	surface: Weak<MockSurface>,
	kind: Registration,
	id: u64,
}

impl Disposable for MockSubscription {
	fn dispose(&mut self) {
		let Some(surface) = self.surface.upgrade() else {
			return;
		};
		let mut state = surface.state.lock();
		let id = self.id;
		match self.kind {
			Registration::Listener => state.listeners.retain(|(key, _)| *key != id),
			Registration::Provider => state.providers.retain(|(key, _, _)| *key != id),
			Registration::Command => state.commands.retain(|_, (key, _)| *key != id),
		}
	}
}

/// Polls `condition` until it holds or `timeout` elapses.
pub(crate) async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
	let deadline = tokio::time::Instant::now() + timeout;
	loop {
		if condition() {
			return true;
		}
		if tokio::time::Instant::now() >= deadline {
			return false;
		}
		tokio::time::sleep(Duration::from_millis(5)).await;
	}
}
