//! Trailing-edge debounce for mutation notifications.
//!
//! The [`Debouncer`] owns exactly one timer slot. Every [`Debouncer::notify`]
//! aborts whatever timer is pending and arms a fresh one, so only the last
//! notification inside an interval ever reaches the target. After
//! [`Debouncer::close`] nothing is armed again and the pending timer is gone.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use spellmark_worker::{TaskClass, spawn};
use tokio::task::JoinHandle;
use tracing::trace;

/// Receives the debounced trigger.
pub trait DebounceTarget: Send + Sync {
	/// Called once the interval has elapsed without another notification.
	fn fire(&self);
}

#[derive(Debug, Default)]
struct TimerSlot {
	pending: Option<JoinHandle<()>>,
	armed: u64,
	closed: bool,
}

/// Single-slot trailing-edge debouncer.
#[derive(Debug)]
pub struct Debouncer {
	interval: Duration,
	slot: Mutex<TimerSlot>,
	target: Weak<dyn DebounceTarget>,
}

impl Debouncer {
	/// Creates a debouncer that fires `target` `interval` after the last notification.
	///
	/// The target is held weakly; if it is gone when a timer elapses, nothing happens.
	pub fn new(interval: Duration, target: Weak<dyn DebounceTarget>) -> Self {
		Self {
			interval,
			slot: Mutex::new(TimerSlot::default()),
			target,
		}
	}

	/// Configured interval.
	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Restarts the timer.
	pub fn notify(&self) {
		let mut slot = self.slot.lock();
		if slot.closed {
			return;
		}
		if let Some(previous) = slot.pending.take() {
			previous.abort();
		}

		slot.armed += 1;
		let armed = slot.armed;
		let interval = self.interval;
		let target = self.target.clone();
		trace!(armed, interval_ms = interval.as_millis() as u64, "spell.debounce.arm");
		slot.pending = Some(spawn(TaskClass::Timer, async move {
			tokio::time::sleep(interval).await;
			if let Some(target) = target.upgrade() {
				trace!(armed, "spell.debounce.fire");
				target.fire();
			}
		}));
	}

	/// Drops the pending timer, if any. Returns true if one was still waiting.
	pub fn cancel(&self) -> bool {
		let mut slot = self.slot.lock();
		match slot.pending.take() {
			Some(handle) => {
				let waiting = !handle.is_finished();
				handle.abort();
				waiting
			}
			None => false,
		}
	}

	/// Cancels the pending timer and ignores all later notifications. Idempotent.
	pub fn close(&self) {
		let mut slot = self.slot.lock();
		slot.closed = true;
		if let Some(handle) = slot.pending.take() {
			handle.abort();
		}
	}

	/// Returns true while a timer is armed and has not fired.
	pub fn is_pending(&self) -> bool {
		self.slot.lock().pending.as_ref().is_some_and(|handle| !handle.is_finished())
	}
}

impl Drop for Debouncer {
	fn drop(&mut self) {
		if let Some(handle) = self.slot.get_mut().pending.take() {
			handle.abort();
		}
	}
}

#[cfg(test)]
mod tests;
