//! Classifier adapter.
//!
//! Host dictionaries may answer synchronously or asynchronously. Callbacks
//! return a [`Reply`], which is either an immediate result or a deferred one;
//! [`CallbackClassifier`] normalizes both into the async [`Classifier`]
//! contract the scan engine and fix handler consume.
//!
//! Nothing is cached here. If lookups are expensive, the host dictionary
//! caches.

use std::future::Future;

use async_trait::async_trait;
use spellmark_primitives::BoxFutureStatic;

use crate::config::{CheckFn, SuggestFn};

/// Result of a host callback, available now or later.
pub enum Reply<T> {
	/// The callback answered synchronously.
	Ready(anyhow::Result<T>),
	/// The callback answers when the future resolves.
	Deferred(BoxFutureStatic<anyhow::Result<T>>),
}

impl<T> Reply<T> {
	/// Immediate success.
	pub fn ready(value: T) -> Self {
		Self::Ready(Ok(value))
	}

	/// Immediate failure.
	pub fn failed(error: impl Into<anyhow::Error>) -> Self {
		Self::Ready(Err(error.into()))
	}

	/// Answer produced by a future.
	pub fn deferred<F>(fut: F) -> Self
	where
		F: Future<Output = anyhow::Result<T>> + Send + 'static,
	{
		Self::Deferred(Box::pin(fut))
	}

	/// Waits for the answer.
	pub async fn resolve(self) -> anyhow::Result<T> {
		match self {
			Self::Ready(result) => result,
			Self::Deferred(fut) => fut.await,
		}
	}
}

impl<T> std::fmt::Debug for Reply<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Ready(result) => f.debug_tuple("Ready").field(&result.is_ok()).finish(),
			Self::Deferred(_) => f.write_str("Deferred"),
		}
	}
}

/// Decides spelling and proposes corrections.
#[async_trait]
pub trait Classifier: Send + Sync {
	/// Returns true if `word` is spelled correctly.
	async fn is_correct(&self, word: &str) -> anyhow::Result<bool>;

	/// Returns corrections for `word`, best first.
	async fn suggestions(&self, word: &str) -> anyhow::Result<Vec<String>>;
}

/// [`Classifier`] backed by host `check`/`suggest` callbacks.
pub struct CallbackClassifier {
	check: CheckFn,
	suggest: SuggestFn,
}

impl CallbackClassifier {
	/// Wraps the two callbacks.
	pub fn new(check: CheckFn, suggest: SuggestFn) -> Self {
		Self { check, suggest }
	}
}

#[async_trait]
impl Classifier for CallbackClassifier {
	async fn is_correct(&self, word: &str) -> anyhow::Result<bool> {
		(self.check)(word).resolve().await
	}

	async fn suggestions(&self, word: &str) -> anyhow::Result<Vec<String>> {
		(self.suggest)(word).resolve().await
	}
}
