use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::time::sleep;

use super::*;

#[derive(Default)]
struct CountingTarget {
	fired: AtomicUsize,
}

impl DebounceTarget for CountingTarget {
	fn fire(&self) {
		self.fired.fetch_add(1, Ordering::SeqCst);
	}
}

impl CountingTarget {
	fn count(&self) -> usize {
		self.fired.load(Ordering::SeqCst)
	}
}

fn debouncer(interval_ms: u64) -> (Debouncer, Arc<CountingTarget>) {
	let target = Arc::new(CountingTarget::default());
	let weak = Arc::downgrade(&target);
	let weak: Weak<dyn DebounceTarget> = weak;
	(Debouncer::new(Duration::from_millis(interval_ms), weak), target)
}

#[tokio::test(start_paused = true)]
async fn test_fires_once_after_interval() {
	let (debouncer, target) = debouncer(500);

	debouncer.notify();
	assert!(debouncer.is_pending());
	sleep(Duration::from_millis(499)).await;
	assert_eq!(target.count(), 0);

	sleep(Duration::from_millis(2)).await;
	assert_eq!(target.count(), 1);
	assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_only_last_notification_survives() {
	let (debouncer, target) = debouncer(500);

	for _ in 0..5 {
		debouncer.notify();
		sleep(Duration::from_millis(300)).await;
	}
	assert_eq!(target.count(), 0);

	sleep(Duration::from_millis(201)).await;
	assert_eq!(target.count(), 1);

	sleep(Duration::from_secs(5)).await;
	assert_eq!(target.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_separate_bursts_fire_separately() {
	let (debouncer, target) = debouncer(100);

	debouncer.notify();
	sleep(Duration::from_millis(150)).await;
	debouncer.notify();
	sleep(Duration::from_millis(150)).await;

	assert_eq!(target.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_prevents_fire() {
	let (debouncer, target) = debouncer(100);

	debouncer.notify();
	assert!(debouncer.cancel());
	assert!(!debouncer.cancel());
	sleep(Duration::from_millis(500)).await;

	assert_eq!(target.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_close_ignores_later_notifications() {
	let (debouncer, target) = debouncer(100);

	debouncer.notify();
	debouncer.close();
	debouncer.close();
	debouncer.notify();
	assert!(!debouncer.is_pending());
	sleep(Duration::from_millis(500)).await;

	assert_eq!(target.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_target_is_skipped() {
	let (debouncer, target) = debouncer(100);

	debouncer.notify();
	drop(target);
	sleep(Duration::from_millis(500)).await;

	assert!(!debouncer.is_pending());
}
