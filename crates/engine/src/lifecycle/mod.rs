//! Spellchecker lifecycle.
//!
//! [`Spellchecker::new`] validates options, subscribes to document changes,
//! registers the quick-fix provider and commands, and kicks off one
//! undebounced scan. From then on every change notification goes through the
//! debouncer, and every scan publishes through the store's generation check.
//!
//! [`Spellchecker::dispose`] tears everything down in one step: pending
//! timers are cancelled, in-flight scans are superseded, markers are cleared
//! and every host registration is released. Dropping the spellchecker
//! disposes it.

mod invariants;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use spellmark_primitives::TextRange;
use spellmark_worker::{GenerationClock, TaskClass, spawn};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, SpellcheckerOptions};
use crate::debounce::{DebounceTarget, Debouncer};
use crate::fix::{ActionDescriptor, ActionKind, FixEffect, FixHandler};
use crate::host::{ChangeListener, CodeActionProvider, CommandHandler, Disposable, TextSurface};
use crate::scan::{ScanSession, Scanner};
use crate::store::{AnnotationSet, AnnotationStore, OwnerTag, PublishOutcome};
use crate::Result;

/// Whether a spellchecker is still attached to its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
	/// Scanning and serving fixes.
	Active,
	/// Torn down; every operation is a no-op.
	Disposed,
}

/// Summary of a published scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
	/// Generation of the scan session.
	pub generation: u64,
	/// Document version the scan read.
	pub version: u64,
	/// Annotations published.
	pub annotations: usize,
	/// True if the scan stopped at the annotation cap.
	pub truncated: bool,
	/// Tokens sent to the classifier.
	pub tokens_checked: usize,
	/// Tokens skipped because classification failed.
	pub failures: usize,
}

/// How a scan ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
	/// The scan's annotations are now visible.
	Published(ScanReport),
	/// A newer scan started; this one's result was discarded.
	Superseded,
	/// The spellchecker was disposed.
	Disposed,
}

impl ScanOutcome {
	/// The report, if the scan published.
	pub fn report(&self) -> Option<&ScanReport> {
		match self {
			Self::Published(report) => Some(report),
			_ => None,
		}
	}
}

struct Inner {
	this: Weak<Inner>,
	surface: Arc<dyn TextSurface>,
	scanner: Scanner,
	store: Arc<AnnotationStore>,
	fixes: FixHandler,
	clock: GenerationClock,
	debouncer: Debouncer,
	fixes_enabled: bool,
	disposed: AtomicBool,
}

impl Inner {
	fn is_disposed(&self) -> bool {
		self.disposed.load(Ordering::Acquire)
	}

	async fn process(&self) -> ScanOutcome {
		if self.is_disposed() {
			return ScanOutcome::Disposed;
		}

		let mut session = ScanSession::begin(&self.clock);
		let snapshot = self.surface.snapshot();
		debug!(generation = session.generation(), version = snapshot.version(), "spell.lifecycle.scan_start");

		let Some(result) = self.scanner.run(&snapshot, &mut session).await else {
			debug!(generation = session.generation(), "spell.lifecycle.scan_superseded");
			return ScanOutcome::Superseded;
		};

		let report = ScanReport {
			generation: session.generation(),
			version: result.annotations.version(),
			annotations: result.annotations.len(),
			truncated: result.annotations.is_truncated(),
			tokens_checked: result.tokens_checked,
			failures: result.failures.len(),
		};
		match self.store.publish(session.generation(), session.latest(), result.annotations) {
			PublishOutcome::Published => {
				for failure in &result.failures {
					warn!(span = %failure.span, error = %failure.error, "spell.lifecycle.classify_failed");
					self.surface.report_error(&failure.error);
				}
				ScanOutcome::Published(report)
			}
			PublishOutcome::Superseded => ScanOutcome::Superseded,
			PublishOutcome::Closed => ScanOutcome::Disposed,
		}
	}

	fn spawn_process(&self, class: TaskClass) {
		let Some(this) = self.this.upgrade() else {
			return;
		};
		if this.is_disposed() {
			return;
		}
		spawn(class, async move {
			this.process().await;
		});
	}

	async fn query_actions(&self, range: TextRange, cancel: &CancellationToken) -> Option<Vec<ActionDescriptor>> {
		if self.is_disposed() || !self.fixes_enabled {
			return None;
		}
		let actions = self.fixes.query_actions(range, cancel).await?;
		// Disposal while suggestions were pending invalidates the annotation.
		if self.is_disposed() {
			return None;
		}
		Some(actions)
	}

	async fn apply(&self, action: &ActionDescriptor) -> Result<()> {
		if self.is_disposed() {
			return Ok(());
		}
		match self.fixes.apply(action).await? {
			FixEffect::Edited => {}
			FixEffect::DictionaryChanged => {
				self.process().await;
			}
		}
		Ok(())
	}
}

impl DebounceTarget for Inner {
	fn fire(&self) {
		self.spawn_process(TaskClass::Background);
	}
}

struct ChangeRelay(Weak<Inner>);

impl ChangeListener for ChangeRelay {
	fn on_change(&self, version: u64) {
		if let Some(inner) = self.0.upgrade()
			&& !inner.is_disposed()
		{
			debug!(version, "spell.lifecycle.change");
			inner.debouncer.notify();
		}
	}
}

struct ActionRelay(Weak<Inner>);

#[async_trait]
impl CodeActionProvider for ActionRelay {
	async fn provide_code_actions(&self, range: TextRange, cancel: CancellationToken) -> Option<Vec<ActionDescriptor>> {
		let inner = self.0.upgrade()?;
		inner.query_actions(range, &cancel).await
	}
}

struct CommandRelay {
	inner: Weak<Inner>,
	kind: ActionKind,
}

#[async_trait]
impl CommandHandler for CommandRelay {
	async fn execute(&self, action: ActionDescriptor) -> Result<()> {
		let Some(inner) = self.inner.upgrade() else {
			return Ok(());
		};
		if action.kind != self.kind {
			warn!(expected = %self.kind, got = %action.kind, "spell.lifecycle.command_mismatch");
			return Ok(());
		}
		inner.apply(&action).await
	}
}

/// Spellchecking overlay attached to one editor surface.
pub struct Spellchecker {
	inner: Arc<Inner>,
	subscriptions: Mutex<Vec<Box<dyn Disposable>>>,
}

impl fmt::Debug for Spellchecker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Spellchecker")
			.field("owner", self.inner.store.owner())
			.field("state", &self.state())
			.field("generation", &self.inner.clock.latest())
			.finish_non_exhaustive()
	}
}

impl Spellchecker {
	/// Attaches a spellchecker to `surface`.
	///
	/// Fails with [`crate::Error::MissingOption`] if `check` or `suggest` is missing.
	/// On success the first scan is already running.
	pub fn new(surface: Arc<dyn TextSurface>, options: SpellcheckerOptions) -> Result<Self> {
		let config = options.resolve()?;
		let inner = Self::build_inner(surface, &config);

		let mut subscriptions = vec![inner.surface.on_did_change(Arc::new(ChangeRelay(Arc::downgrade(&inner))))];
		if inner.fixes_enabled {
			let provider = Arc::new(ActionRelay(Arc::downgrade(&inner)));
			subscriptions.push(inner.surface.register_code_action_provider(&config.settings.languages, provider));
			for kind in ActionKind::ALL {
				let registered = match kind {
					ActionKind::Replace => true,
					ActionKind::Ignore => config.has_ignore(),
					ActionKind::AddWord => config.has_add_word(),
				};
				if registered {
					let handler = Arc::new(CommandRelay {
						inner: Arc::downgrade(&inner),
						kind,
					});
					subscriptions.push(inner.surface.register_command(kind.command(), handler));
				}
			}
		}

		info!(
			owner = %inner.store.owner(),
			debounce_ms = config.settings.debounce_ms,
			fixes = inner.fixes_enabled,
			"spell.lifecycle.attached"
		);
		inner.spawn_process(TaskClass::Interactive);

		Ok(Self {
			inner,
			subscriptions: Mutex::new(subscriptions),
		})
	}

	fn build_inner(surface: Arc<dyn TextSurface>, config: &EngineConfig) -> Arc<Inner> {
		let sink = Arc::clone(&surface);
		let store = Arc::new(AnnotationStore::new(OwnerTag::new(config.settings.owner.clone()), sink));
		let fixes_enabled = config.settings.languages.matches(surface.language_id().as_deref());
		let interval = config.settings.debounce();

		Arc::new_cyclic(|this: &Weak<Inner>| {
			let target: Weak<dyn DebounceTarget> = this.clone();
			Inner {
				this: this.clone(),
				scanner: Scanner::from_config(config),
				fixes: FixHandler::new(config, Arc::clone(&store), Arc::clone(&surface)),
				store,
				surface,
				clock: GenerationClock::new(),
				debouncer: Debouncer::new(interval, target),
				fixes_enabled,
				disposed: AtomicBool::new(false),
			}
		})
	}

	/// Scans the document now, bypassing the debounce.
	pub async fn process(&self) -> ScanOutcome {
		self.inner.process().await
	}

	/// Records a document change. The scan follows once edits go quiet.
	///
	/// Hosts that deliver changes through [`TextSurface::on_did_change`]
	/// never need to call this.
	pub fn notify_change(&self) {
		if !self.inner.is_disposed() {
			self.inner.debouncer.notify();
		}
	}

	/// Fixes available at `range`.
	pub async fn query_actions(&self, range: TextRange, cancel: &CancellationToken) -> Option<Vec<ActionDescriptor>> {
		self.inner.query_actions(range, cancel).await
	}

	/// Executes a fix. Ignore and add-word re-scan before returning.
	pub async fn apply(&self, action: &ActionDescriptor) -> Result<()> {
		self.inner.apply(action).await
	}

	/// Currently published annotations.
	pub fn annotations(&self) -> Arc<AnnotationSet> {
		self.inner.store.snapshot()
	}

	/// Owner tag markers are published under.
	pub fn owner(&self) -> &OwnerTag {
		self.inner.store.owner()
	}

	/// Current lifecycle state.
	pub fn state(&self) -> LifecycleState {
		if self.inner.is_disposed() {
			LifecycleState::Disposed
		} else {
			LifecycleState::Active
		}
	}

	/// Detaches from the surface. Idempotent.
	pub fn dispose(&self) {
		if self.inner.disposed.swap(true, Ordering::AcqRel) {
			return;
		}
		let superseding = self.inner.clock.next();
		self.inner.debouncer.close();
		self.inner.store.close();

		let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
		let released = subscriptions.len();
		for mut subscription in subscriptions {
			subscription.dispose();
		}
		info!(owner = %self.inner.store.owner(), generation = superseding, released, "spell.lifecycle.disposed");
	}
}

impl Drop for Spellchecker {
	fn drop(&mut self) {
		self.dispose();
	}
}
