use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation clock for scan sessions.
///
/// Generation `0` is never handed out, so it can stand for "nothing started yet".
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	latest: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a clock whose first [`next`](Self::next) call returns generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a new generation and returns it.
	pub fn next(&self) -> u64 {
		self.latest.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Returns the most recently started generation.
	pub fn latest(&self) -> u64 {
		self.latest.load(Ordering::Acquire)
	}

	/// Returns true if no newer generation has started since `generation`.
	pub fn is_current(&self, generation: u64) -> bool {
		self.latest() == generation
	}
}
