//! Published problem spans.
//!
//! [`AnnotationStore`] is the only mutable state shared between scans, fix
//! queries and the host renderer. It is never patched: every publish swaps
//! the whole [`AnnotationSet`], so readers see either the old set or the new
//! one and nothing in between.
//!
//! Rendering happens after the writer lock is released. Every swap takes a
//! render sequence number under the lock, and a render older than the last
//! one the host saw is skipped, so the host never goes back to an older set.
//!
//! # Publication rule
//!
//! A set produced by scan generation `g` is accepted only when `g` is the
//! most recently started generation and is not older than the last published
//! one. Older sessions that finish late are dropped instead of clobbering
//! fresher results.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, ReentrantMutex};
use spellmark_primitives::{Span, TextRange};
use tracing::{debug, trace};

use crate::config::Severity;

/// Namespace for markers published by one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerTag(String);

impl OwnerTag {
	/// Creates an owner tag.
	pub fn new(tag: impl Into<String>) -> Self {
		Self(tag.into())
	}

	/// The tag as a string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for OwnerTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A misspelled word and where it sits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
	/// The flagged word.
	pub word: String,
	/// Its single-line span; the span is exactly as wide as the word.
	pub span: Span,
	/// Hover message.
	pub message: String,
	/// Marker severity.
	pub severity: Severity,
}

/// One scan's annotations, in (line, column) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSet {
	annotations: Vec<Annotation>,
	version: u64,
	truncated: bool,
}

impl AnnotationSet {
	/// Creates a set from annotations already in document order.
	pub fn new(annotations: Vec<Annotation>, version: u64, truncated: bool) -> Self {
		debug_assert!(annotations.windows(2).all(|pair| pair[0].span.start() <= pair[1].span.start()));
		Self {
			annotations,
			version,
			truncated,
		}
	}

	/// Document version the set was computed from.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// True if the scan stopped at the annotation cap.
	pub fn is_truncated(&self) -> bool {
		self.truncated
	}

	/// Number of annotations.
	pub fn len(&self) -> usize {
		self.annotations.len()
	}

	/// Returns true if nothing is flagged.
	pub fn is_empty(&self) -> bool {
		self.annotations.is_empty()
	}

	/// The annotations as a slice.
	pub fn as_slice(&self) -> &[Annotation] {
		&self.annotations
	}

	/// Iterates annotations in document order.
	pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
		self.annotations.iter()
	}

	/// First annotation, in document order, whose span touches `range`.
	///
	/// A cursor matches a span it sits inside or at either edge of, so a
	/// cursor right after a word still finds that word. A selection matches
	/// only spans it shares a character with.
	pub fn find(&self, range: &TextRange) -> Option<&Annotation> {
		self.annotations.iter().find(|annotation| annotation.span.intersects(range))
	}
}

impl<'a> IntoIterator for &'a AnnotationSet {
	type Item = &'a Annotation;
	type IntoIter = std::slice::Iter<'a, Annotation>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Receives every set the store publishes, for rendering.
///
/// Called without the store's writer lock held; an implementation may call
/// back into the store.
pub trait MarkerSink: Send + Sync {
	/// Replaces all markers under `owner` with `markers`.
	fn set_markers(&self, owner: &OwnerTag, markers: &[Annotation]);
}

/// Result of [`AnnotationStore::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
	/// The set is now visible.
	Published,
	/// A newer session started or already published.
	Superseded,
	/// The store was closed by disposal.
	Closed,
}

#[derive(Debug, Default)]
struct WriterState {
	published_generation: u64,
	render_seq: u64,
	closed: bool,
}

impl WriterState {
	fn next_render(&mut self) -> u64 {
		self.render_seq += 1;
		self.render_seq
	}
}

/// Holds the currently published [`AnnotationSet`] for one owner.
pub struct AnnotationStore {
	owner: OwnerTag,
	current: ArcSwap<AnnotationSet>,
	writer: Mutex<WriterState>,
	/// Last render sequence handed to the sink.
	rendered: ReentrantMutex<Cell<u64>>,
	sink: Arc<dyn MarkerSink>,
}

impl fmt::Debug for AnnotationStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnnotationStore")
			.field("owner", &self.owner)
			.field("len", &self.current.load().len())
			.field("writer", &*self.writer.lock())
			.finish()
	}
}

impl AnnotationStore {
	/// Creates an empty store that renders through `sink`.
	pub fn new(owner: OwnerTag, sink: Arc<dyn MarkerSink>) -> Self {
		Self {
			owner,
			current: ArcSwap::from_pointee(AnnotationSet::default()),
			writer: Mutex::new(WriterState::default()),
			rendered: ReentrantMutex::new(Cell::new(0)),
			sink,
		}
	}

	/// Owner tag markers are published under.
	pub fn owner(&self) -> &OwnerTag {
		&self.owner
	}

	/// Publishes `set` from session `generation` if it is still the newest.
	///
	/// `latest` is the most recently started generation, read by the caller
	/// just before publishing. The swap happens under the writer lock; the
	/// render follows once the lock is released.
	pub fn publish(&self, generation: u64, latest: u64, set: AnnotationSet) -> PublishOutcome {
		let mut writer = self.writer.lock();
		if writer.closed {
			return PublishOutcome::Closed;
		}
		if generation != latest || generation < writer.published_generation {
			trace!(generation, latest, published = writer.published_generation, "spell.store.reject_stale");
			return PublishOutcome::Superseded;
		}

		writer.published_generation = generation;
		let seq = writer.next_render();
		let set = Arc::new(set);
		self.current.store(Arc::clone(&set));
		drop(writer);

		debug!(owner = %self.owner, generation, count = set.len(), truncated = set.is_truncated(), "spell.store.published");
		self.render(seq, set.as_slice());
		PublishOutcome::Published
	}

	fn render(&self, seq: u64, markers: &[Annotation]) {
		let rendered = self.rendered.lock();
		if seq <= rendered.get() {
			trace!(owner = %self.owner, seq, rendered = rendered.get(), "spell.store.skip_render");
			return;
		}
		rendered.set(seq);
		self.sink.set_markers(&self.owner, markers);
	}

	/// Snapshot of the published set.
	pub fn snapshot(&self) -> Arc<AnnotationSet> {
		self.current.load_full()
	}

	/// First published annotation touching `range`.
	pub fn query_at(&self, range: &TextRange) -> Option<Annotation> {
		self.current.load().find(range).cloned()
	}

	/// Removes every annotation and clears the host's markers.
	pub fn clear(&self) {
		let mut writer = self.writer.lock();
		if writer.closed {
			return;
		}
		let seq = writer.next_render();
		self.current.store(Arc::new(AnnotationSet::default()));
		drop(writer);
		self.render(seq, &[]);
	}

	/// Clears the store and rejects all later publishes. Idempotent.
	pub fn close(&self) {
		let mut writer = self.writer.lock();
		if writer.closed {
			return;
		}
		writer.closed = true;
		let seq = writer.next_render();
		self.current.store(Arc::new(AnnotationSet::default()));
		drop(writer);
		self.render(seq, &[]);
	}

	/// Returns true once [`close`](Self::close) has run.
	pub fn is_closed(&self) -> bool {
		self.writer.lock().closed
	}
}
